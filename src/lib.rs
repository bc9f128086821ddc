//! Conductor - track and plan status tracking
//!
//! Reads and updates the markdown documents of a context-driven development
//! workflow: a `tracks.md` listing tracks (features, bugs, chores) and a
//! `plan.md` per track listing phase-grouped tasks, each carrying a status
//! marker (`[ ]`, `[~]`, `[x]`).
//!
//! # Architecture
//!
//! - [`status`] - Marker codec
//! - [`tracks`] - Tracks document parser
//! - [`plan`] - Plan document parser
//! - [`update`] - In-place marker rewrites
//! - [`anchor`] - Stable line ids for exact-match updates
//! - [`conductor`] - Project facade over storage and clock
//! - [`storage`], [`clock`] - Injected collaborators
//! - [`templates`], [`metadata`] - Generated documents and JSON records
//! - [`config`] - `conductor.json` loading
//! - [`error`] - Custom error types
//! - [`testing`] - In-memory test doubles
//!
//! # Example
//!
//! ```
//! use conductor::{parse_plan, rewrite_task_status, LineSelector, Status};
//!
//! let plan = "## Phase 1\n- [ ] Build login\n- [x] Write tests\n";
//! let rewrite = rewrite_task_status(
//!     plan,
//!     LineSelector::Contains("Build login"),
//!     Status::Complete,
//!     Some("abcdef1234567"),
//!     7,
//! );
//! let updated = rewrite.content.unwrap();
//! assert_eq!(updated, "## Phase 1\n- [x] Build login [abcdef1]\n- [x] Write tests\n");
//! assert!(parse_plan(&updated).iter().all(|t| t.status == Status::Complete));
//! ```

pub mod anchor;
pub mod clock;
pub mod conductor;
pub mod config;
pub mod error;
pub mod metadata;
pub mod plan;
pub mod status;
pub mod storage;
pub mod templates;
pub mod testing;
pub mod tracks;
pub mod update;

// Re-export commonly used types
pub use error::{ConductorError, Result};

pub use conductor::{Conductor, StatusReport};
pub use config::ConductorConfig;
pub use metadata::{ProjectKind, SetupState, TrackMetadata, TrackType};
pub use plan::{next_pending_task, parse_plan, phase_progress, PhaseProgress, Task};
pub use status::Status;
pub use templates::PhaseTemplate;
pub use tracks::{current_track, next_pending_track, parse_tracks, Track, TrackCounts};
pub use update::{rewrite_task_status, rewrite_track_status, LineSelector, Rewrite, UpdateOutcome};

pub use clock::{Clock, SystemClock};
pub use storage::{FileSystem, LocalFileSystem};
