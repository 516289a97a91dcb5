//! Export error types.

use std::io;
use thiserror::Error;

/// Export operation errors.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error on either store
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Content reference unresolvable
    #[error("Content not found: {0}")]
    NotFound(String),

    /// Archive assembly error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A named file carried an empty logical filename
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

impl ExportError {
    /// Check if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExportError::NotFound(_))
            || matches!(self, ExportError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}
