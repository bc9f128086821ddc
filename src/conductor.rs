//! Project workspace facade.
//!
//! [`Conductor`] owns the project root, the configuration and the injected
//! [`FileSystem`] and [`Clock`]. Each operation re-reads the documents it
//! needs from storage; nothing is cached between calls.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ConductorConfig;
use crate::error::{ConductorError, Result};
use crate::metadata::{ProjectKind, SetupState, TrackMetadata, TrackType, BROWNFIELD_INDICATORS};
use crate::plan::{self, Task};
use crate::status::Status;
use crate::storage::{FileSystem, LocalFileSystem};
use crate::templates::{self, PhaseTemplate};
use crate::tracks::{self, Track, TrackCounts};
use crate::update::{self, LineSelector, Rewrite, UpdateOutcome};

/// Number of description words used in a generated track id.
const TRACK_ID_WORDS: usize = 3;

/// Message reported while the required files are missing.
pub const NOT_SET_UP_MESSAGE: &str = "Conductor is not set up. Run `conductor setup` first.";

/// Snapshot of the project's track progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub setup_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub tracks: TrackCounts,
    /// First track in progress, else first pending track.
    pub current_track: Option<Track>,
    pub progress_percentage: f64,
}

/// Entry point for reading and updating a project's conductor documents.
///
/// # Example
///
/// ```rust,ignore
/// use conductor::{Conductor, Status};
///
/// let mut conductor = Conductor::open(".")?;
/// for track in conductor.tracks()? {
///     println!("{} {}", track.status, track.description);
/// }
/// conductor.update_track_status("User authentication", Status::Complete)?;
/// ```
#[derive(Debug, Clone)]
pub struct Conductor<F = LocalFileSystem, C = SystemClock> {
    root: PathBuf,
    config: ConductorConfig,
    fs: F,
    clock: C,
}

impl Conductor<LocalFileSystem, SystemClock> {
    /// Open a project on the local disk, loading `conductor.json` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let fs = LocalFileSystem::new();
        let config = ConductorConfig::load(&fs, &root)?;
        Ok(Self::new(root, config, fs, SystemClock))
    }
}

impl<F: FileSystem, C: Clock> Conductor<F, C> {
    /// Create a conductor over explicit collaborators.
    pub fn new(root: impl Into<PathBuf>, config: ConductorConfig, fs: F, clock: C) -> Self {
        Self {
            root: root.into(),
            config,
            fs,
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ConductorConfig {
        &self.config
    }

    /// The underlying storage.
    pub fn fs(&self) -> &F {
        &self.fs
    }

    // =========================================================================
    // Paths
    // =========================================================================

    pub fn tracks_file(&self) -> PathBuf {
        self.root.join(self.config.tracks_file())
    }

    pub fn track_dir(&self, track_id: &str) -> PathBuf {
        self.root.join(&self.config.tracks_dir).join(track_id)
    }

    pub fn plan_file(&self, track_id: &str) -> PathBuf {
        self.track_dir(track_id).join("plan.md")
    }

    pub fn spec_file(&self, track_id: &str) -> PathBuf {
        self.track_dir(track_id).join("spec.md")
    }

    pub fn metadata_file(&self, track_id: &str) -> PathBuf {
        self.track_dir(track_id).join("metadata.json")
    }

    fn setup_state_file(&self) -> PathBuf {
        self.root.join(self.config.setup_state_file())
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Whether every required file exists.
    pub fn is_setup_complete(&self) -> bool {
        self.config
            .required_files
            .iter()
            .all(|file| self.fs.exists(&self.root.join(file)))
    }

    /// Read the setup-state record, `None` if setup never recorded a step.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but can't be read or parsed.
    pub fn setup_state(&self) -> Result<Option<SetupState>> {
        match self.fs.read_optional(&self.setup_state_file())? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Record the last setup step that completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the record can't be written.
    pub fn save_setup_state(&mut self, last_successful_step: &str) -> Result<()> {
        let state = SetupState {
            last_successful_step: last_successful_step.to_string(),
        };
        let path = self.setup_state_file();
        self.fs.write(&path, &serde_json::to_string(&state)?)?;
        debug!("Saved setup state: {}", last_successful_step);
        Ok(())
    }

    /// Classify the project as greenfield or brownfield.
    pub fn detect_project_kind(&self) -> ProjectKind {
        let found = BROWNFIELD_INDICATORS
            .iter()
            .find(|indicator| self.fs.exists(&self.root.join(indicator)));
        match found {
            Some(indicator) => {
                debug!("Brownfield project: found {}", indicator);
                ProjectKind::Brownfield
            }
            None => ProjectKind::Greenfield,
        }
    }

    /// Create the conductor directory layout.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory can't be created.
    pub fn create_directories(&mut self) -> Result<()> {
        let dirs = [
            self.config.conductor_dir.clone(),
            self.config.conductor_dir.join("code_styleguides"),
            self.config.tracks_dir.clone(),
            self.config.archive_dir.clone(),
        ];
        for dir in dirs {
            self.fs.create_dir_all(&self.root.join(dir))?;
        }
        Ok(())
    }

    /// Write placeholder content for each missing required file and an
    /// empty `tracks.md`. Existing files are left alone.
    ///
    /// Returns the paths that were created.
    ///
    /// # Errors
    ///
    /// Returns an error if a file can't be written.
    pub fn scaffold_documents(&mut self) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for file in self.config.required_files.clone() {
            let path = self.root.join(&file);
            if self.fs.exists(&path) {
                continue;
            }
            let title = file
                .file_stem()
                .map(|s| s.to_string_lossy().replace(['-', '_'], " "))
                .unwrap_or_default();
            self.fs.write(&path, &format!("# {}\n\nTBD\n", title_case(&title)))?;
            created.push(path);
        }

        let tracks_path = self.tracks_file();
        if !self.fs.exists(&tracks_path) {
            self.fs.write(&tracks_path, &templates::tracks_header())?;
            created.push(tracks_path);
        }
        Ok(created)
    }

    // =========================================================================
    // Tracks
    // =========================================================================

    /// Derive a track id from the first words of a description and today's date.
    ///
    /// Words that are not purely alphanumeric are dropped.
    pub fn generate_track_id(&self, description: &str) -> String {
        let short_name = description
            .to_lowercase()
            .split_whitespace()
            .take(TRACK_ID_WORDS)
            .filter(|w| w.chars().all(char::is_alphanumeric))
            .collect::<Vec<_>>()
            .join("_");
        let short_name = if short_name.is_empty() {
            "track".to_string()
        } else {
            short_name
        };
        format!("{}_{}", short_name, self.clock.now().format("%Y%m%d"))
    }

    /// All tracks in `tracks.md`, empty if the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but can't be read.
    pub fn tracks(&self) -> Result<Vec<Track>> {
        Ok(self
            .fs
            .read_optional(&self.tracks_file())?
            .map(|content| tracks::parse_tracks(&content))
            .unwrap_or_default())
    }

    /// First track that is not complete.
    ///
    /// # Errors
    ///
    /// Returns an error if `tracks.md` exists but can't be read.
    pub fn next_pending_track(&self) -> Result<Option<Track>> {
        Ok(tracks::next_pending_track(&self.tracks()?).cloned())
    }

    /// Create a track directory with its metadata record.
    ///
    /// # Errors
    ///
    /// Returns [`ConductorError::TrackExists`] if the track already has
    /// metadata, or a storage error.
    pub fn create_track(&mut self, description: &str, track_type: TrackType) -> Result<String> {
        let description = normalize_description(description)?;
        let track_id = self.generate_track_id(&description);
        let metadata_path = self.metadata_file(&track_id);
        if self.fs.exists(&metadata_path) {
            return Err(ConductorError::TrackExists { track_id });
        }

        self.fs.create_dir_all(&self.track_dir(&track_id))?;
        let metadata = TrackMetadata::new(&track_id, track_type, description, self.clock.now());
        self.fs
            .write(&metadata_path, &serde_json::to_string_pretty(&metadata)?)?;

        info!("Created track {}", track_id);
        Ok(track_id)
    }

    /// Create a track and scaffold its documents.
    ///
    /// Writes the metadata record, `spec.md` and `plan.md` from templates,
    /// and finally appends the track to `tracks.md` (creating it with a
    /// header if needed). A track whose metadata exists but which is not yet
    /// listed in `tracks.md` is picked up again instead of rejected.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Conductor::create_track`], or a storage error.
    pub fn add_track(
        &mut self,
        description: &str,
        track_type: TrackType,
        phases: &[PhaseTemplate],
    ) -> Result<String> {
        let track_id = match self.create_track(description, track_type) {
            Ok(track_id) => track_id,
            Err(ConductorError::TrackExists { track_id }) => {
                if self.is_track_listed(&track_id)? {
                    return Err(ConductorError::TrackExists { track_id });
                }
                warn!("Resuming unlisted track {}", track_id);
                track_id
            }
            Err(e) => return Err(e),
        };
        let description = normalize_description(description)?;

        let spec = templates::spec_document(&description, &[]);
        self.fs.write(&self.spec_file(&track_id), &spec)?;

        let plan = templates::plan_document(&track_id, &description, phases);
        self.fs.write(&self.plan_file(&track_id), &plan)?;

        let tracks_path = self.tracks_file();
        let mut tracks_doc = self
            .fs
            .read_optional(&tracks_path)?
            .unwrap_or_else(templates::tracks_header);
        tracks_doc.push_str(&templates::track_entry(
            &self.config.tracks_dir,
            &track_id,
            &description,
        ));
        self.fs.write(&tracks_path, &tracks_doc)?;

        Ok(track_id)
    }

    fn is_track_listed(&self, track_id: &str) -> Result<bool> {
        Ok(self
            .tracks()?
            .iter()
            .any(|track| track.anchor.as_deref() == Some(track_id)))
    }

    /// Read a track's metadata record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but can't be read or parsed.
    pub fn track_metadata(&self, track_id: &str) -> Result<Option<TrackMetadata>> {
        match self.fs.read_optional(&self.metadata_file(track_id))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Set the status of the first track heading containing `description`.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures; a missing document or
    /// unmatched description is reported through the outcome.
    pub fn update_track_status(&mut self, description: &str, status: Status) -> Result<UpdateOutcome> {
        self.rewrite_tracks(LineSelector::Contains(description), status)
    }

    /// Set the status of the track whose heading carries `track_id` as anchor.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures.
    pub fn update_track_status_by_anchor(
        &mut self,
        track_id: &str,
        status: Status,
    ) -> Result<UpdateOutcome> {
        self.rewrite_tracks(LineSelector::Anchor(track_id), status)
    }

    fn rewrite_tracks(&mut self, selector: LineSelector<'_>, status: Status) -> Result<UpdateOutcome> {
        let path = self.tracks_file();
        self.rewrite_document(&path, |content| {
            update::rewrite_track_status(content, selector, status)
        })
    }

    // =========================================================================
    // Plans
    // =========================================================================

    /// Tasks of a track's plan, empty if the plan does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan exists but can't be read.
    pub fn plan_tasks(&self, track_id: &str) -> Result<Vec<Task>> {
        Ok(self
            .fs
            .read_optional(&self.plan_file(track_id))?
            .map(|content| plan::parse_plan(&content))
            .unwrap_or_default())
    }

    /// First pending task of a track's plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan exists but can't be read.
    pub fn next_pending_task(&self, track_id: &str) -> Result<Option<Task>> {
        Ok(plan::next_pending_task(&self.plan_tasks(track_id)?).cloned())
    }

    /// Set the status of the first plan line containing `description`.
    ///
    /// When completing with a commit hash, the abbreviated hash is appended.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures.
    pub fn update_task_status(
        &mut self,
        track_id: &str,
        description: &str,
        status: Status,
        commit: Option<&str>,
    ) -> Result<UpdateOutcome> {
        self.rewrite_plan(track_id, LineSelector::Contains(description), status, commit)
    }

    /// Set the status of the plan line carrying `anchor`.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures.
    pub fn update_task_status_by_anchor(
        &mut self,
        track_id: &str,
        anchor: &str,
        status: Status,
        commit: Option<&str>,
    ) -> Result<UpdateOutcome> {
        self.rewrite_plan(track_id, LineSelector::Anchor(anchor), status, commit)
    }

    fn rewrite_plan(
        &mut self,
        track_id: &str,
        selector: LineSelector<'_>,
        status: Status,
        commit: Option<&str>,
    ) -> Result<UpdateOutcome> {
        let path = self.plan_file(track_id);
        let abbrev_len = self.config.commit_abbrev_len;
        self.rewrite_document(&path, |content| {
            update::rewrite_task_status(content, selector, status, commit, abbrev_len)
        })
    }

    /// Read-modify-write cycle shared by all updates.
    fn rewrite_document<R>(&mut self, path: &Path, rewrite: R) -> Result<UpdateOutcome>
    where
        R: FnOnce(&str) -> Rewrite,
    {
        let Some(content) = self.fs.read_optional(path)? else {
            debug!("Document not found: {}", path.display());
            return Ok(UpdateOutcome::MissingDocument);
        };

        let Rewrite { outcome, content } = rewrite(&content);
        match (&outcome, content) {
            (UpdateOutcome::Updated { line }, Some(new_content)) => {
                self.fs.write(path, &new_content)?;
                info!("Updated {} line {}", path.display(), line);
            }
            (UpdateOutcome::NoMatch, _) => {
                warn!("No matching status line in {}", path.display());
            }
            (outcome, _) => {
                debug!("{} left unchanged: {:?}", path.display(), outcome);
            }
        }
        Ok(outcome)
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Summarize track progress.
    ///
    /// # Errors
    ///
    /// Returns an error if `tracks.md` exists but can't be read.
    pub fn project_status(&self) -> Result<StatusReport> {
        let timestamp = self.clock.now();
        if !self.is_setup_complete() {
            return Ok(StatusReport {
                setup_complete: false,
                message: Some(NOT_SET_UP_MESSAGE.to_string()),
                timestamp,
                tracks: TrackCounts::default(),
                current_track: None,
                progress_percentage: 0.0,
            });
        }

        let all = self.tracks()?;
        let counts = TrackCounts::tally(&all);
        Ok(StatusReport {
            setup_complete: true,
            message: None,
            timestamp,
            tracks: counts,
            current_track: tracks::current_track(&all).cloned(),
            progress_percentage: counts.progress_percentage(),
        })
    }
}

/// Collapse whitespace so a description fits on one heading line.
fn normalize_description(description: &str) -> Result<String> {
    let normalized = description.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(anyhow::anyhow!("Track description must not be empty").into());
    }
    Ok(normalized)
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
