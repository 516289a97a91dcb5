//! Export store: the destination directory for finished archives.

use std::fs;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ExportError, Result};
use crate::naming::split_extension;

/// A writable destination stream that only becomes visible on commit.
pub trait ArchiveSink: Write + Seek {
    /// Finish the write and publish the file under its final name.
    fn commit(self) -> Result<PathBuf>;
}

/// Write-side collaborator owning the destination directory.
pub trait ExportStore {
    /// The sink type handed out by [`create_safely`](ExportStore::create_safely).
    type Sink: ArchiveSink;

    /// Names of files at the destination root matching `pattern`.
    ///
    /// The pattern language is a single `*` wildcard, the only shape the
    /// pipeline emits (`"{stem}*{ext}"`).
    fn files_matching(&self, pattern: &str) -> Result<Vec<String>>;

    /// Names of all directories at the destination root.
    fn directories(&self) -> Result<Vec<String>>;

    /// Open a scoped destination stream for `name`.
    ///
    /// The stream never silently overwrites an existing file: on a
    /// commit-time collision it disambiguates itself with a unique suffix.
    /// Anything short of a commit leaves no file at the final name.
    fn create_safely(&self, name: &str) -> Result<Self::Sink>;

    /// Reveal a finished export in the host environment. Best-effort;
    /// failures are logged and swallowed.
    fn reveal(&self, path: &Path);
}

/// Safely-created destination file.
///
/// Bytes go to a uniquely-named temporary sibling; [`commit`](ArchiveSink::commit)
/// renames it to the final name. Dropping without committing removes the
/// temporary.
pub struct SafeFile {
    temp: NamedTempFile,
    final_path: PathBuf,
}

impl Write for SafeFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.temp.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.temp.flush()
    }
}

impl Seek for SafeFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.temp.seek(pos)
    }
}

impl ArchiveSink for SafeFile {
    fn commit(self) -> Result<PathBuf> {
        let SafeFile { temp, final_path } = self;

        match temp.persist_noclobber(&final_path) {
            Ok(_) => Ok(final_path),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                // Another writer took the name between enumeration and
                // commit. Fall back to a unique suffix rather than clobber.
                let fallback = with_unique_suffix(&final_path);
                debug!(
                    "Destination {:?} taken at commit time, using {:?}",
                    final_path, fallback
                );
                e.file
                    .persist_noclobber(&fallback)
                    .map_err(|e| ExportError::Io(e.error))?;
                Ok(fallback)
            }
            Err(e) => Err(ExportError::Io(e.error)),
        }
    }
}

/// Insert a `_{uuid}` disambiguator between stem and extension.
fn with_unique_suffix(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, ext) = split_extension(&name);
    path.with_file_name(format!("{}_{}{}", stem, Uuid::new_v4(), ext))
}

/// Local filesystem export store.
#[derive(Debug, Clone)]
pub struct DirExportStore {
    root: PathBuf,
}

impl DirExportStore {
    /// Open an export store rooted at `root`, creating the directory if
    /// needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Get the destination root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_names(&self, want_dirs: bool) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() == want_dirs {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }
}

impl ExportStore for DirExportStore {
    type Sink = SafeFile;

    fn files_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let mut names = self.entry_names(false)?;
        names.retain(|n| matches_pattern(pattern, n));
        Ok(names)
    }

    fn directories(&self) -> Result<Vec<String>> {
        self.entry_names(true)
    }

    fn create_safely(&self, name: &str) -> Result<SafeFile> {
        let temp = NamedTempFile::new_in(&self.root)?;
        debug!("Staging {:?} for {:?}", temp.path(), name);
        Ok(SafeFile {
            temp,
            final_path: self.root.join(name),
        })
    }

    fn reveal(&self, path: &Path) {
        if let Err(e) = open_file_browser(path) {
            warn!("Could not reveal {:?} externally: {}", path, e);
        }
    }
}

/// Match a name against a pattern containing at most one `*` wildcard.
fn matches_pattern(pattern: &str, name: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == name,
        Some((prefix, suffix)) => {
            name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
        }
    }
}

#[cfg(target_os = "macos")]
fn open_file_browser(path: &Path) -> io::Result<()> {
    Command::new("open").arg("-R").arg(path).spawn().map(|_| ())
}

#[cfg(target_os = "windows")]
fn open_file_browser(path: &Path) -> io::Result<()> {
    Command::new("explorer")
        .arg(format!("/select,{}", path.display()))
        .spawn()
        .map(|_| ())
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_file_browser(path: &Path) -> io::Result<()> {
    // No portable "select in file browser" on these platforms; open the
    // containing directory instead.
    let dir = path.parent().unwrap_or(path);
    Command::new("xdg-open").arg(dir).spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (DirExportStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = DirExportStore::new(temp.path().join("exports")).unwrap();
        (store, temp)
    }

    #[test]
    fn test_commit_publishes_file() {
        let (store, _temp) = store();

        let mut sink = store.create_safely("pack.osz").unwrap();
        sink.write_all(b"archive bytes").unwrap();
        let path = sink.commit().unwrap();

        assert_eq!(path, store.root().join("pack.osz"));
        assert_eq!(fs::read(&path).unwrap(), b"archive bytes");
    }

    #[test]
    fn test_drop_without_commit_leaves_nothing() {
        let (store, _temp) = store();

        {
            let mut sink = store.create_safely("pack.osz").unwrap();
            sink.write_all(b"partial").unwrap();
        }

        assert!(!store.root().join("pack.osz").exists());
        // The staged temporary is gone too.
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 0);
    }

    #[test]
    fn test_commit_collision_appends_unique_suffix() {
        let (store, _temp) = store();
        fs::write(store.root().join("pack.osz"), b"earlier export").unwrap();

        let mut sink = store.create_safely("pack.osz").unwrap();
        sink.write_all(b"new export").unwrap();
        let path = sink.commit().unwrap();

        assert_ne!(path, store.root().join("pack.osz"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("pack_"));
        assert!(name.ends_with(".osz"));
        // The earlier export is untouched.
        assert_eq!(fs::read(store.root().join("pack.osz")).unwrap(), b"earlier export");
        assert_eq!(fs::read(&path).unwrap(), b"new export");
    }

    #[test]
    fn test_files_matching_filters_on_pattern() {
        let (store, _temp) = store();
        fs::write(store.root().join("My Beatmap.osz"), b"").unwrap();
        fs::write(store.root().join("My Beatmap (1).osz"), b"").unwrap();
        fs::write(store.root().join("Other.osz"), b"").unwrap();
        fs::write(store.root().join("My Beatmap.osk"), b"").unwrap();

        let mut names = store.files_matching("My Beatmap*.osz").unwrap();
        names.sort();
        assert_eq!(names, vec!["My Beatmap (1).osz", "My Beatmap.osz"]);
    }

    #[test]
    fn test_directories_excludes_files() {
        let (store, _temp) = store();
        fs::write(store.root().join("file.osz"), b"").unwrap();
        fs::create_dir(store.root().join("unpacked")).unwrap();

        assert_eq!(store.directories().unwrap(), vec!["unpacked"]);
        let files = store.files_matching("*").unwrap();
        assert_eq!(files, vec!["file.osz"]);
    }

    #[test]
    fn test_matches_pattern_shapes() {
        assert!(matches_pattern("a*.osz", "a.osz"));
        assert!(matches_pattern("a*.osz", "a (1).osz"));
        assert!(!matches_pattern("a*.osz", "b.osz"));
        assert!(!matches_pattern("a*.osz", "a.osk"));
        // Overlapping prefix/suffix must not double-count characters.
        assert!(!matches_pattern("ab*ba", "aba"));
        assert!(matches_pattern("exact", "exact"));
        assert!(!matches_pattern("exact", "exact2"));
    }
}
