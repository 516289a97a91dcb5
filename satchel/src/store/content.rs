//! Content store: resolving content references to byte streams.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{ExportError, Result};
use crate::item::ContentRef;

/// Read-side collaborator mapping a [`ContentRef`] to its bytes.
pub trait ContentStore {
    /// The readable stream type this store hands out.
    type Reader: Read;

    /// Open a read stream for the referenced content.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NotFound`] if the reference does not resolve.
    fn open(&self, reference: &ContentRef) -> Result<Self::Reader>;
}

/// Local filesystem content store.
///
/// References are relative paths below the base directory. Hash-keyed
/// stores produce such references via [`ContentRef::from_hash`].
#[derive(Debug, Clone)]
pub struct DirContentStore {
    base_path: PathBuf,
}

impl DirContentStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the base path for this store.
    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }
}

impl ContentStore for DirContentStore {
    type Reader = File;

    fn open(&self, reference: &ContentRef) -> Result<File> {
        let fs_path = self.base_path.join(reference.as_str());
        debug!("Opening content at {:?}", fs_path);

        match File::open(&fs_path) {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExportError::NotFound(reference.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_open_and_read() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("4/4a")).unwrap();
        std::fs::write(temp.path().join("4/4a/4a3b"), b"hello world").unwrap();

        let store = DirContentStore::new(temp.path());
        let mut reader = store.open(&ContentRef::from_hash("4a3b")).unwrap();

        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"hello world");
    }

    #[test]
    fn test_open_not_found() {
        let temp = TempDir::new().unwrap();
        let store = DirContentStore::new(temp.path());

        let result = store.open(&ContentRef::new("missing/ref"));
        assert!(matches!(result.unwrap_err(), ExportError::NotFound(_)));
    }
}
