//! Store collaborators at the pipeline boundary.
//!
//! Two traits: [`ContentStore`] resolves a [`ContentRef`] to readable bytes,
//! [`ExportStore`] owns the destination directory where finished archives
//! land. Local filesystem implementations of both live here as well.
//!
//! [`ContentRef`]: crate::item::ContentRef

mod content;
mod export_dir;

pub use content::{ContentStore, DirContentStore};
pub use export_dir::{ArchiveSink, DirExportStore, ExportStore, SafeFile};
