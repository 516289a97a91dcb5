//! Exportable item model.
//!
//! An exportable item is anything that can name itself and enumerate the
//! logically-named files it consists of. The pipeline never sees the domain
//! type behind it, only this capability contract.

use std::fmt;

/// Opaque locator resolvable to file bytes by a [`ContentStore`].
///
/// For local stores this is a relative path below the store root.
///
/// [`ContentStore`]: crate::store::ContentStore
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentRef(String);

impl ContentRef {
    /// Create a reference from a raw locator string.
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Build the content-addressed locator for a hash digest:
    /// `{h[0]}/{h[0..2]}/{h}`.
    ///
    /// This mirrors the fan-out layout hash-keyed file stores use to keep
    /// directory sizes bounded.
    pub fn from_hash(hash: &str) -> Self {
        let first = &hash[..1.min(hash.len())];
        let second = &hash[..2.min(hash.len())];
        Self(format!("{}/{}/{}", first, second, hash))
    }

    /// The raw locator string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A logical filename paired with the reference to its content.
///
/// The filename is the name the file carries *inside* the exported archive
/// and may contain `/`-separated subpaths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFile {
    /// Name inside the archive. Must be non-empty.
    pub filename: String,
    /// Locator for the file bytes.
    pub content: ContentRef,
}

impl NamedFile {
    pub fn new(filename: impl Into<String>, content: ContentRef) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

/// Capability contract for anything the pipeline can export.
pub trait Exportable {
    /// Human-readable name the archive filename is derived from.
    fn display_name(&self) -> &str;

    /// The files making up this item, in archive order.
    fn files(&self) -> &[NamedFile];
}

/// A plain owned package of named files.
///
/// The simplest [`Exportable`]; used by the CLI and anywhere the file list
/// is assembled up front rather than borrowed from a domain model.
#[derive(Debug, Clone)]
pub struct ContentPackage {
    name: String,
    files: Vec<NamedFile>,
}

impl ContentPackage {
    pub fn new(name: impl Into<String>, files: Vec<NamedFile>) -> Self {
        Self {
            name: name.into(),
            files,
        }
    }
}

impl Exportable for ContentPackage {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn files(&self) -> &[NamedFile] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hash_layout() {
        let r = ContentRef::from_hash("4a3bdeadbeef");
        assert_eq!(r.as_str(), "4/4a/4a3bdeadbeef");
    }

    #[test]
    fn test_from_hash_short_input() {
        // Degenerate digests should not panic.
        let r = ContentRef::from_hash("a");
        assert_eq!(r.as_str(), "a/a/a");
    }

    #[test]
    fn test_package_capability() {
        let pkg = ContentPackage::new(
            "My Beatmap",
            vec![NamedFile::new("audio.mp3", ContentRef::new("4/4a/4a3b"))],
        );
        assert_eq!(pkg.display_name(), "My Beatmap");
        assert_eq!(pkg.files().len(), 1);
        assert_eq!(pkg.files()[0].filename, "audio.mp3");
    }
}
