//! Streaming zip assembly from a content store.

use std::io::{self, Seek, Write};

use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ExportError, Result};
use crate::item::NamedFile;
use crate::store::ContentStore;

/// Write one zip entry per named file into `sink`, in input order.
///
/// Entry names are taken verbatim, so `/`-separated subpaths become archive
/// directory structure and duplicate logical names produce duplicate
/// entries (the zip format permits this). Bytes are streamed one file at a
/// time; the first read failure aborts the build before the central
/// directory is written, so no complete archive is ever produced from a
/// partial read.
///
/// Returns the sink after the archive has been finalized and flushed.
pub fn write_archive<C, W>(files: &[NamedFile], store: &C, sink: W) -> Result<W>
where
    C: ContentStore,
    W: Write + Seek,
{
    let mut zip = ZipWriter::new(sink);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        if file.filename.is_empty() {
            return Err(ExportError::InvalidFilename(file.content.to_string()));
        }

        let mut reader = store.open(&file.content)?;
        zip.start_file(file.filename.as_str(), options)?;
        let written = io::copy(&mut reader, &mut zip)?;
        debug!("Added {} ({} bytes)", file.filename, written);
    }

    Ok(zip.finish()?)
}
