//! Export pipeline for named-file content packages.
//!
//! Satchel turns a domain item — anything holding a display name and a list
//! of logically-named files — into a single portable zip archive at a
//! destination directory, without ever overwriting a prior export of the
//! same item.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  Exporter                                        │
//! │                                                  │
//! │  NameResolver ──► ExportStore::create_safely ──► │
//! │  ArchiveBuilder ──► commit ──► reveal            │
//! │                                                  │
//! │     ▲ bytes                    ▲ names/sinks     │
//! │  ┌──┴──────────┐        ┌──────┴──────┐          │
//! │  │ ContentStore│        │ ExportStore │          │
//! │  └─────────────┘        └─────────────┘          │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Naming is recomputed from the live destination contents on every call:
//! collisions with existing files *and directories* get a `" (n)"`
//! disambiguator, and names over [`MAX_FILENAME_LENGTH`] characters are
//! truncated on the stem. Archives are staged to a temporary sibling and
//! only renamed into place once fully written, so a failed export leaves
//! nothing behind.
//!
//! # Quick Start
//!
//! ```no_run
//! use satchel::{ContentPackage, ContentRef, DirContentStore, DirExportStore,
//!               Exporter, NamedFile};
//!
//! # fn example() -> satchel::Result<()> {
//! let content = DirContentStore::new("./data/files");
//! let exports = DirExportStore::new("./data/exports")?;
//! let exporter = Exporter::beatmap(content, exports);
//!
//! let package = ContentPackage::new(
//!     "My Beatmap",
//!     vec![NamedFile::new("audio.mp3", ContentRef::from_hash("4a3b..."))],
//! );
//!
//! let path = exporter.export(&package)?;
//! println!("exported to {}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! I/O is synchronous and blocking throughout; there is no internal
//! parallelism, cancellation, or retry.

mod archive;
mod error;
mod export;
mod item;
mod naming;
mod store;

pub use archive::write_archive;
pub use error::{ExportError, Result};
pub use export::Exporter;
pub use item::{ContentPackage, ContentRef, Exportable, NamedFile};
pub use naming::{next_available_filename, sanitize_filename, MAX_FILENAME_LENGTH};
pub use store::{ArchiveSink, ContentStore, DirContentStore, DirExportStore, ExportStore, SafeFile};
