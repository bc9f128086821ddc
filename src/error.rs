//! Custom error types for Conductor.
//!
//! Missing documents and unmatched lines are not errors: the core reports
//! them through return values (`UpdateOutcome`, `Option`, empty `Vec`).
//! This type covers the genuine failures around it: storage I/O, corrupt
//! JSON records, bad user input and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Conductor operations
#[derive(Error, Debug)]
pub enum ConductorError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Unrecognized status name
    #[error("Invalid status: {value} (expected pending, in_progress or complete)")]
    InvalidStatus { value: String },

    /// Unrecognized track type
    #[error("Invalid track type: {value} (expected feature, bug or chore)")]
    InvalidTrackType { value: String },

    /// Track directory already holds a metadata record
    #[error("Track already exists: {track_id}")]
    TrackExists { track_id: String },

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// Storage operation failed on a specific path
    #[error("Storage error on {path}: {message}")]
    Storage { path: PathBuf, message: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConductorError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create a storage error for a path
    pub fn storage(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Storage {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error was caused by user input rather than the environment
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidStatus { .. } | Self::InvalidTrackType { .. } | Self::TrackExists { .. }
        )
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidStatus { .. } | Self::InvalidTrackType { .. } => 2,
            Self::TrackExists { .. } => 3,
            Self::Config { .. } => 7,
            _ => 1,
        }
    }
}

/// Type alias for Conductor results
pub type Result<T> = std::result::Result<T, ConductorError>;
