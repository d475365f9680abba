//! File-system access used by a resize.
//!
//! [`FileStore`] covers the handful of calls a resize makes outside the codec:
//! existence and writability pre-checks, the verbatim copy for images that
//! already fit, the single write of encoded bytes, and the optional removal
//! of the source. [`LocalFileStore`] is the `std::fs` implementation.
//!
//! Writes and copies land in a temp file next to the output and are renamed
//! over it, so a failure never leaves a truncated output (or, when the output
//! is the source, a truncated source).

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub trait FileStore {
    fn exists(&self, path: &Path) -> bool;

    /// Whether an existing file or directory accepts writes.
    fn is_writable(&self, path: &Path) -> bool;

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Whether both paths name the same file, however they are spelled.
    fn same_file(&self, a: &Path, b: &Path) -> bool;

    /// An output path is usable when neither the file itself nor its parent
    /// directory exists read-only.
    fn output_writable(&self, output: &Path) -> bool {
        if self.exists(output) && !self.is_writable(output) {
            return false;
        }
        match output.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) if self.exists(dir) => self.is_writable(dir),
            _ => true,
        }
    }
}

/// [`FileStore`] backed by the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_writable(&self, path: &Path) -> bool {
        fs::metadata(path)
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.same_file(from, to) {
            return Ok(());
        }
        let staged = staging_file(to)?;
        // fs::copy also carries over the source permissions
        fs::copy(from, staged.path())?;
        persist(staged, to)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut staged = staging_file(path)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        let permissions = match fs::metadata(path) {
            Ok(existing) => existing.permissions(),
            Err(_) => new_file_permissions(&staged)?,
        };
        fs::set_permissions(staged.path(), permissions)?;
        persist(staged, path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn same_file(&self, a: &Path, b: &Path) -> bool {
        if a == b {
            return true;
        }
        match (fs::canonicalize(a), fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// Temp file in the target's directory, so the final rename stays on one
/// file system.
fn staging_file(target: &Path) -> io::Result<NamedTempFile> {
    match target.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new_in("."),
    }
}

fn persist(staged: NamedTempFile, target: &Path) -> io::Result<()> {
    staged.persist(target).map(|_| ()).map_err(|e| e.error)
}

/// Temp files are created owner-only; a fresh output gets ordinary file
/// permissions instead.
#[cfg(unix)]
fn new_file_permissions(_staged: &NamedTempFile) -> io::Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions(staged: &NamedTempFile) -> io::Result<fs::Permissions> {
    Ok(staged.as_file().metadata()?.permissions())
}
