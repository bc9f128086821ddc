//! JSON records stored next to the markdown documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConductorError;

/// Status written into a freshly created metadata record.
pub const INITIAL_TRACK_STATUS: &str = "new";

/// Kind of work a track represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    #[default]
    Feature,
    Bug,
    Chore,
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackType::Feature => write!(f, "feature"),
            TrackType::Bug => write!(f, "bug"),
            TrackType::Chore => write!(f, "chore"),
        }
    }
}

impl FromStr for TrackType {
    type Err = ConductorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feature" | "feat" => Ok(TrackType::Feature),
            "bug" | "fix" => Ok(TrackType::Bug),
            "chore" => Ok(TrackType::Chore),
            _ => Err(ConductorError::InvalidTrackType {
                value: s.to_string(),
            }),
        }
    }
}

/// `metadata.json` of a track, written once when the track is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub track_id: String,
    #[serde(rename = "type")]
    pub track_type: TrackType,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub description: String,
}

impl TrackMetadata {
    /// Metadata for a track created at `now`.
    #[must_use]
    pub fn new(
        track_id: impl Into<String>,
        track_type: TrackType,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            track_id: track_id.into(),
            track_type,
            status: INITIAL_TRACK_STATUS.to_string(),
            created_at: now,
            updated_at: now,
            description: description.into(),
        }
    }
}

/// `setup_state.json`, used to resume an interrupted setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupState {
    pub last_successful_step: String,
}

/// Whether the project already had code before Conductor was set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// Nothing there yet.
    Greenfield,
    /// Existing sources, manifests or version control.
    Brownfield,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::Greenfield => write!(f, "greenfield"),
            ProjectKind::Brownfield => write!(f, "brownfield"),
        }
    }
}

/// Entries whose presence in the project root marks it as brownfield.
pub const BROWNFIELD_INDICATORS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "package.json",
    "pom.xml",
    "requirements.txt",
    "go.mod",
    "Cargo.toml",
    "src",
    "app",
    "lib",
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_metadata_json_shape() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap();
        let meta = TrackMetadata::new("dark_mode_20260115", TrackType::Bug, "Dark mode", now);
        let json: serde_json::Value = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["track_id"], "dark_mode_20260115");
        assert_eq!(json["type"], "bug");
        assert_eq!(json["status"], "new");
        assert_eq!(json["created_at"], "2026-01-15T09:30:00Z");
        assert_eq!(json["updated_at"], json["created_at"]);
        assert_eq!(json["description"], "Dark mode");

        let back: TrackMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn test_track_type_from_str() {
        assert_eq!("Feature".parse::<TrackType>().unwrap(), TrackType::Feature);
        assert_eq!("fix".parse::<TrackType>().unwrap(), TrackType::Bug);
        assert!(matches!(
            "epic".parse::<TrackType>(),
            Err(ConductorError::InvalidTrackType { .. })
        ));
    }

    #[test]
    fn test_setup_state_json() {
        let state = SetupState {
            last_successful_step: "2.1_product_guide".to_string(),
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"last_successful_step":"2.1_product_guide"}"#);
    }
}
