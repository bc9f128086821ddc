//! Status markers.
//!
//! A status is written in documents as a three-character bracket token:
//!
//! | Status        | Marker |
//! |---------------|--------|
//! | `Pending`     | `[ ]`  |
//! | `InProgress`  | `[~]`  |
//! | `Complete`    | `[x]`  |
//!
//! Lines without any of these tokens decode to [`Status::Unknown`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::ConductorError;

/// Marker for a pending item.
pub const MARKER_PENDING: &str = "[ ]";
/// Marker for an item in progress.
pub const MARKER_IN_PROGRESS: &str = "[~]";
/// Marker for a completed item.
pub const MARKER_COMPLETE: &str = "[x]";

/// Markers in the order they are searched for when decoding a line.
const DECODE_ORDER: [(&str, Status); 3] = [
    (MARKER_PENDING, Status::Pending),
    (MARKER_IN_PROGRESS, Status::InProgress),
    (MARKER_COMPLETE, Status::Complete),
];

/// Status of a track or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Not started (`[ ]`)
    Pending,
    /// Being worked on (`[~]`)
    InProgress,
    /// Done (`[x]`)
    Complete,
    /// No recognized marker on the line
    Unknown,
}

/// Location of a marker inside a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    /// Byte range of the marker within the line.
    pub range: Range<usize>,
    /// Status the marker encodes.
    pub status: Status,
}

impl Status {
    /// The textual marker for this status, `None` for [`Status::Unknown`].
    #[must_use]
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Status::Pending => Some(MARKER_PENDING),
            Status::InProgress => Some(MARKER_IN_PROGRESS),
            Status::Complete => Some(MARKER_COMPLETE),
            Status::Unknown => None,
        }
    }

    /// Decode the status implied by a line.
    ///
    /// Markers are tested in priority order `[ ]`, `[~]`, `[x]`; the first
    /// one present anywhere in the line wins.
    ///
    /// # Example
    ///
    /// ```
    /// use conductor::Status;
    ///
    /// assert_eq!(Status::decode("## [~] Track: Auth"), Status::InProgress);
    /// assert_eq!(Status::decode("## Track: Auth"), Status::Unknown);
    /// ```
    #[must_use]
    pub fn decode(line: &str) -> Status {
        Self::find_marker(line).map_or(Status::Unknown, |m| m.status)
    }

    /// Find the marker that [`Status::decode`] would select.
    ///
    /// The range points at the first occurrence of that marker.
    #[must_use]
    pub fn find_marker(line: &str) -> Option<MarkerMatch> {
        DECODE_ORDER.iter().find_map(|(marker, status)| {
            line.find(marker).map(|start| MarkerMatch {
                range: start..start + marker.len(),
                status: *status,
            })
        })
    }

    /// Decode a plan list item (`- [ ] ...`, `- [~] ...`, `- [x] ...`).
    ///
    /// Returns `None` for anything that is not a status list item.
    #[must_use]
    pub fn from_list_item(line: &str) -> Option<Status> {
        Self::find_list_item_marker(line).map(|found| found.status)
    }

    /// Locate the marker of a plan list item, as a range within `line`.
    ///
    /// Only the marker directly after the `- ` prefix counts; marker-like
    /// text later in the line is ignored.
    #[must_use]
    pub fn find_list_item_marker(line: &str) -> Option<MarkerMatch> {
        let indent = line.len() - line.trim_start().len();
        let rest = line[indent..].strip_prefix("- ")?;
        let start = indent + 2;
        DECODE_ORDER
            .iter()
            .find(|(marker, _)| rest.starts_with(marker))
            .map(|(marker, status)| MarkerMatch {
                range: start..start + marker.len(),
                status: *status,
            })
    }

    /// Whether this status has a marker.
    #[must_use]
    pub fn is_known(self) -> bool {
        self != Status::Unknown
    }

    /// Snake-case name, as used in JSON records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Complete => "complete",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ConductorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "todo" => Ok(Status::Pending),
            "in_progress" | "in-progress" | "started" => Ok(Status::InProgress),
            "complete" | "completed" | "done" => Ok(Status::Complete),
            _ => Err(ConductorError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}
