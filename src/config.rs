//! Configuration for Conductor.
//!
//! Read from `conductor.json` in the project root. Every field is optional;
//! a missing file yields [`ConductorConfig::default`].
//!
//! ```json
//! {
//!   "conductorDir": "conductor",
//!   "tracksDir": "conductor/tracks",
//!   "commitAbbrevLen": 7
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConductorError, Result};
use crate::storage::FileSystem;
use crate::update::DEFAULT_COMMIT_ABBREV_LEN;

/// Name of the configuration file in the project root.
pub const CONFIG_FILE: &str = "conductor.json";

/// Accepted range for `commitAbbrevLen`.
const ABBREV_RANGE: std::ops::RangeInclusive<usize> = 4..=40;

/// Project layout and update settings. Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConductorConfig {
    #[serde(default = "default_conductor_dir")]
    pub conductor_dir: PathBuf,

    #[serde(default = "default_tracks_dir")]
    pub tracks_dir: PathBuf,

    /// Home for finished tracks; created during setup.
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// Files that must exist for setup to count as complete.
    #[serde(default = "default_required_files")]
    pub required_files: Vec<PathBuf>,

    /// Number of hash characters appended to completed tasks.
    #[serde(default = "default_commit_abbrev_len")]
    pub commit_abbrev_len: usize,
}

fn default_conductor_dir() -> PathBuf {
    PathBuf::from("conductor")
}

fn default_tracks_dir() -> PathBuf {
    PathBuf::from("conductor/tracks")
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("conductor/archive")
}

fn default_required_files() -> Vec<PathBuf> {
    ["conductor/product.md", "conductor/tech-stack.md", "conductor/workflow.md"]
        .into_iter()
        .map(PathBuf::from)
        .collect()
}

fn default_commit_abbrev_len() -> usize {
    DEFAULT_COMMIT_ABBREV_LEN
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            conductor_dir: default_conductor_dir(),
            tracks_dir: default_tracks_dir(),
            archive_dir: default_archive_dir(),
            required_files: default_required_files(),
            commit_abbrev_len: default_commit_abbrev_len(),
        }
    }
}

impl ConductorConfig {
    /// Load configuration for a project, falling back to defaults when the
    /// file is absent.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file exists but is not valid JSON or
    /// fails validation.
    pub fn load(fs: &impl FileSystem, project_dir: &Path) -> Result<Self> {
        let path = Self::config_path(project_dir);
        let Some(content) = fs.read_optional(&path)? else {
            debug!("No {} in {}, using defaults", CONFIG_FILE, project_dir.display());
            return Ok(Self::default());
        };

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ConductorError::config_with_path(format!("failed to parse: {e}"), path.clone())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the configuration file for a project.
    #[must_use]
    pub fn config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_FILE)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns a config error describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !ABBREV_RANGE.contains(&self.commit_abbrev_len) {
            return Err(ConductorError::config(format!(
                "commitAbbrevLen must be between {} and {}, got {}",
                ABBREV_RANGE.start(),
                ABBREV_RANGE.end(),
                self.commit_abbrev_len
            )));
        }
        for (name, dir) in [
            ("conductorDir", &self.conductor_dir),
            ("tracksDir", &self.tracks_dir),
            ("archiveDir", &self.archive_dir),
        ] {
            if dir.is_absolute() {
                return Err(ConductorError::config(format!(
                    "{name} must be relative to the project root: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Path of the tracks document, relative to the project root.
    #[must_use]
    pub fn tracks_file(&self) -> PathBuf {
        self.conductor_dir.join("tracks.md")
    }

    /// Path of the setup-state record, relative to the project root.
    #[must_use]
    pub fn setup_state_file(&self) -> PathBuf {
        self.conductor_dir.join("setup_state.json")
    }
}
