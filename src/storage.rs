//! File storage abstraction.
//!
//! [`Conductor`](crate::Conductor) never touches `std::fs` directly; it goes
//! through [`FileSystem`] so the parsing and update logic can be exercised
//! against [`MockFileSystem`](crate::testing::MockFileSystem) in tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConductorError, Result};

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".tmp";

/// Abstraction for file system operations.
///
/// # Example
///
/// ```rust,ignore
/// use conductor::storage::FileSystem;
///
/// fn read_plan(fs: &impl FileSystem, track_dir: &Path) -> Result<Option<String>> {
///     fs.read_optional(&track_dir.join("plan.md"))
/// }
/// ```
pub trait FileSystem {
    /// Read file contents as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or can't be read.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace a file's contents.
    ///
    /// Creates parent directories if needed. Readers never observe a
    /// partially written file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be written.
    fn write(&mut self, path: &Path, content: &str) -> Result<()>;

    /// Check if a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    fn create_dir_all(&mut self, path: &Path) -> Result<()>;

    /// Read a file, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but can't be read.
    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        if !self.exists(path) {
            return Ok(None);
        }
        self.read_to_string(path).map(Some)
    }
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Create a new local file system handle.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(TMP_SUFFIX);
        path.with_file_name(name)
    }
}

impl FileSystem for LocalFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .map_err(|e| ConductorError::storage(path, format!("failed to read: {e}")))
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                self.create_dir_all(parent)?;
            }
        }

        let tmp_path = Self::tmp_path(path);
        let write_tmp = || -> std::io::Result<()> {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(content.as_bytes())?;
            tmp_file.sync_all()?;
            fs::rename(&tmp_path, path)
        };

        write_tmp().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            ConductorError::storage(path, format!("failed to write: {e}"))
        })?;

        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| {
            ConductorError::storage(path, format!("failed to create directory: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents_and_reads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("conductor/tracks/a/plan.md");
        let mut fs = LocalFileSystem::new();

        fs.write(&path, "## P\n- [ ] a\n").unwrap();
        assert!(fs.exists(&path));
        assert_eq!(fs.read_to_string(&path).unwrap(), "## P\n- [ ] a\n");
        assert!(!LocalFileSystem::tmp_path(&path).exists());
    }

    #[test]
    fn test_write_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tracks.md");
        let mut fs = LocalFileSystem::new();

        fs.write(&path, "first, longer content").unwrap();
        fs.write(&path, "second").unwrap();
        assert_eq!(fs.read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_read_optional_missing() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFileSystem::new();
        assert_eq!(fs.read_optional(&temp.path().join("nope.md")).unwrap(), None);
    }

    #[test]
    fn test_read_missing_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFileSystem::new();
        let err = fs.read_to_string(&temp.path().join("nope.md")).unwrap_err();
        assert!(matches!(err, ConductorError::Storage { .. }));
    }

    #[test]
    fn test_tmp_path_is_sibling() {
        let tmp = LocalFileSystem::tmp_path(Path::new("/p/conductor/tracks.md"));
        assert_eq!(tmp, PathBuf::from("/p/conductor/tracks.md.tmp"));
    }
}
