//! The export pipeline: naming, safe creation, archive assembly,
//! presentation hand-off.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::archive::write_archive;
use crate::error::Result;
use crate::item::Exportable;
use crate::naming::{next_available_filename, sanitize_filename, split_extension};
use crate::store::{ArchiveSink, ContentStore, ExportStore};

/// Exports items to single-file zip packages at a destination store.
///
/// One value per package kind; the kind only differs in the filename
/// extension carried by the finished archive.
pub struct Exporter<C, E> {
    content: C,
    exports: E,
    extension: &'static str,
}

impl<C, E> Exporter<C, E>
where
    C: ContentStore,
    E: ExportStore,
{
    /// Create an exporter producing archives with the given extension
    /// (including the leading dot).
    pub fn new(content: C, exports: E, extension: &'static str) -> Self {
        Self {
            content,
            exports,
            extension,
        }
    }

    /// Exporter for beatmap packages (`.osz`).
    pub fn beatmap(content: C, exports: E) -> Self {
        Self::new(content, exports, ".osz")
    }

    /// Exporter for skin packages (`.osk`).
    pub fn skin(content: C, exports: E) -> Self {
        Self::new(content, exports, ".osk")
    }

    /// Exporter for replay packages (`.osr`).
    pub fn replay(content: C, exports: E) -> Self {
        Self::new(content, exports, ".osr")
    }

    /// The filename extension this exporter produces.
    pub fn extension(&self) -> &'static str {
        self.extension
    }

    /// Export `item` to a zip package at the destination store and return
    /// the path it was stored under.
    ///
    /// The destination filename is recomputed from the live destination
    /// contents on every call. Two concurrent exports of the same item can
    /// resolve the same name; the safe-creation commit then falls back to a
    /// unique suffix rather than overwrite (the enumerate/create window is
    /// deliberately not locked).
    pub fn export(&self, item: &impl Exportable) -> Result<PathBuf> {
        let path = self.export_without_reveal(item)?;
        self.exports.reveal(&path);
        Ok(path)
    }

    /// [`export`](Self::export) minus the presentation hand-off.
    pub fn export_without_reveal(&self, item: &impl Exportable) -> Result<PathBuf> {
        let base = format!("{}{}", sanitize_filename(item.display_name()), self.extension);
        let filename = self.resolve_destination_name(&base)?;
        debug!("Resolved destination name {:?}", filename);

        let sink = self.exports.create_safely(&filename)?;
        let sink = write_archive(item.files(), &self.content, sink)?;
        let path = sink.commit()?;

        info!(
            "Exported {:?} ({} files) to {:?}",
            item.display_name(),
            item.files().len(),
            path
        );
        Ok(path)
    }

    /// Gather names occupied at the destination and resolve the first free
    /// one derived from `base`.
    fn resolve_destination_name(&self, base: &str) -> Result<String> {
        let (stem, ext) = split_extension(base);

        // Only files matching "{stem}*{ext}" can collide with a
        // disambiguated candidate of base; directories can collide under
        // any name, so they are taken unfiltered.
        let pattern = format!("{}*{}", stem, ext);
        let mut existing: HashSet<String> =
            self.exports.files_matching(&pattern)?.into_iter().collect();
        existing.extend(self.exports.directories()?);

        Ok(next_available_filename(&existing, base))
    }
}
