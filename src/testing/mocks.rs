//! Mock implementations for testing.
//!
//! Provides controllable test doubles for the storage and clock traits.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::clock::Clock;
use crate::error::{ConductorError, Result};
use crate::storage::FileSystem;

/// Mock implementation of file system.
///
/// # Example
///
/// ```rust
/// use conductor::storage::FileSystem;
/// use conductor::testing::MockFileSystem;
/// use std::path::Path;
///
/// let mut fs = MockFileSystem::new();
/// fs.write(Path::new("tracks.md"), "content").unwrap();
/// assert_eq!(fs.read_to_string(Path::new("tracks.md")).unwrap(), "content");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    writes: usize,
}

impl MockFileSystem {
    /// Create a new empty mock file system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single file.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        self.files
            .insert(path.as_ref().to_path_buf(), content.to_string());
        self
    }

    /// Add a directory.
    #[must_use]
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.directories.insert(path.as_ref().to_path_buf());
        self
    }

    /// Content of a file, if present.
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// Number of `write` calls made so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ConductorError::storage(path, "file not found"))
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        self.files.insert(path.to_path_buf(), content.to_string());
        self.writes += 1;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.directories.insert(ancestor.to_path_buf());
        }
        Ok(())
    }
}

/// Clock that always returns the same instant.
///
/// # Example
///
/// ```rust
/// use conductor::clock::Clock;
/// use conductor::testing::FixedClock;
///
/// let clock = FixedClock::ymd(2026, 1, 15);
/// assert_eq!(clock.now().format("%Y%m%d").to_string(), "20260115");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Clock fixed at the given instant.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Clock fixed at midnight UTC on the given date.
    ///
    /// Falls back to the Unix epoch for an invalid date.
    #[must_use]
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        let now = Utc
            .with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .unwrap_or_default();
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
