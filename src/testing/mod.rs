//! Testing infrastructure for Conductor.
//!
//! In-memory doubles for the injected collaborators:
//! - [`MockFileSystem`] implements [`FileSystem`](crate::storage::FileSystem)
//! - [`FixedClock`] implements [`Clock`](crate::clock::Clock)
//!
//! # Example
//!
//! ```rust
//! use conductor::testing::{FixedClock, MockFileSystem};
//! use conductor::{Conductor, ConductorConfig};
//!
//! let fs = MockFileSystem::new()
//!     .with_file("/p/conductor/tracks.md", "# Tracks\n---\n## [ ] Track: Login\n");
//! let conductor = Conductor::new("/p", ConductorConfig::default(), fs, FixedClock::ymd(2026, 1, 1));
//! assert_eq!(conductor.tracks().unwrap().len(), 1);
//! ```

pub mod mocks;

pub use mocks::*;
