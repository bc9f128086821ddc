//! Tracks document parsing.
//!
//! `conductor/tracks.md` is a header followed by `---`-separated sections,
//! one per track:
//!
//! ```text
//! # Project Tracks
//!
//! ---
//!
//! ## [~] Track: User authentication <!-- id:user_authentication_20260101 -->
//! *Link: [./conductor/tracks/user_authentication_20260101/](./conductor/tracks/user_authentication_20260101/)*
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::anchor::{find_anchor, strip_anchors};
use crate::status::Status;

/// Separator between track sections.
pub const SECTION_SEPARATOR: &str = "---";

/// Prefix of a track heading line.
pub const HEADING_PREFIX: &str = "## ";

/// Prefix of a track link line.
pub const LINK_PREFIX: &str = "*Link:";

const TRACK_LABEL: &str = "Track:";

fn link_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]").ok()).as_ref()
}

/// A track entry parsed from the tracks document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Text after the `Track:` label, or the bare heading text.
    pub description: String,
    /// Status decoded from the heading marker.
    pub status: Status,
    /// The heading line, trimmed.
    pub raw_line: String,
    /// Target of the `*Link:` line that follows the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Stable id embedded in the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

impl Track {
    fn from_heading(line: &str) -> Self {
        let text = match line.rsplit_once(TRACK_LABEL) {
            Some((_, after)) => after,
            None => line.trim_start_matches('#'),
        };

        Self {
            description: strip_anchors(text),
            status: Status::decode(line),
            raw_line: line.to_string(),
            link: None,
            anchor: find_anchor(line).map(str::to_string),
        }
    }

    /// Whether the track still needs work.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status != Status::Complete
    }
}

/// Parse all tracks from a tracks document, in document order.
///
/// The section before the first `---` is the document header and never
/// holds a track. Sections without a `## ` heading are skipped.
///
/// # Example
///
/// ```
/// use conductor::{parse_tracks, Status};
///
/// let doc = "# Project Tracks\n\n---\n\n## [~] Track: Login\n*Link: [./tracks/login/](./tracks/login/)*\n";
/// let tracks = parse_tracks(doc);
/// assert_eq!(tracks.len(), 1);
/// assert_eq!(tracks[0].description, "Login");
/// assert_eq!(tracks[0].status, Status::InProgress);
/// assert_eq!(tracks[0].link.as_deref(), Some("./tracks/login/"));
/// ```
#[must_use]
pub fn parse_tracks(content: &str) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    for section in content.split(SECTION_SEPARATOR).skip(1) {
        let section = section.trim();
        if section.is_empty() {
            continue;
        }

        for line in section.lines() {
            let line = line.trim();
            if line.starts_with(HEADING_PREFIX) {
                tracks.push(Track::from_heading(line));
            } else if line.starts_with(LINK_PREFIX) {
                if let (Some(track), Some(link)) = (tracks.last_mut(), parse_link(line)) {
                    track.link = Some(link);
                }
            }
        }
    }

    tracks
}

/// Extract the text inside the first `[...]` span of a link line.
#[must_use]
pub fn parse_link(line: &str) -> Option<String> {
    let caps = link_regex()?.captures(line)?;
    caps.get(1).map(|m| m.as_str().to_string())
}

/// First track that is not complete.
#[must_use]
pub fn next_pending_track(tracks: &[Track]) -> Option<&Track> {
    tracks.iter().find(|t| t.is_open())
}

/// Track counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCounts {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
}

impl TrackCounts {
    /// Tally a list of tracks. Unknown statuses only count towards `total`.
    #[must_use]
    pub fn tally(tracks: &[Track]) -> Self {
        let count = |status: Status| tracks.iter().filter(|t| t.status == status).count();
        Self {
            total: tracks.len(),
            completed: count(Status::Complete),
            in_progress: count(Status::InProgress),
            pending: count(Status::Pending),
        }
    }

    /// Percentage of tracks completed, `0.0` when there are none.
    #[must_use]
    pub fn progress_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

/// The track to work on now: the first in progress, else the first pending.
#[must_use]
pub fn current_track(tracks: &[Track]) -> Option<&Track> {
    tracks
        .iter()
        .find(|t| t.status == Status::InProgress)
        .or_else(|| tracks.iter().find(|t| t.status == Status::Pending))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TRACKS: &str = "# Project Tracks\n\
        \n\
        This file tracks all major tracks for the project.\n\
        \n\
        ---\n\
        \n\
        ## [~] Track: User authentication\n\
        *Link: [./conductor/tracks/user_auth_20260101/](./conductor/tracks/user_auth_20260101/)*\n\
        \n\
        ---\n\
        \n\
        ## [x] Track: Dark mode\n\
        *Link: [./conductor/tracks/dark_mode_20260102/](./conductor/tracks/dark_mode_20260102/)*\n";

    #[test]
    fn test_parse_two_tracks() {
        let tracks = parse_tracks(TWO_TRACKS);
        assert_eq!(tracks.len(), 2);

        assert_eq!(tracks[0].description, "User authentication");
        assert_eq!(tracks[0].status, Status::InProgress);
        assert_eq!(tracks[0].raw_line, "## [~] Track: User authentication");
        assert_eq!(
            tracks[0].link.as_deref(),
            Some("./conductor/tracks/user_auth_20260101/")
        );

        assert_eq!(tracks[1].description, "Dark mode");
        assert_eq!(tracks[1].status, Status::Complete);
    }

    #[test]
    fn test_header_section_is_never_a_track() {
        let doc = "## [ ] Track: Looks like a track\n---\n## [x] Track: Real\n";
        let tracks = parse_tracks(doc);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].description, "Real");
    }

    #[test]
    fn test_no_separator_means_no_tracks() {
        assert!(parse_tracks("# Project Tracks\n\n## [ ] Track: A\n").is_empty());
        assert!(parse_tracks("").is_empty());
    }

    #[test]
    fn test_section_without_heading_is_skipped() {
        let doc = "# H\n---\nJust some notes\n---\n\n---\n## [ ] Track: B\n";
        let tracks = parse_tracks(doc);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].description, "B");
    }

    #[test]
    fn test_heading_without_label_or_marker() {
        let doc = "# H\n---\n## Refactor storage\n";
        let tracks = parse_tracks(doc);
        assert_eq!(tracks[0].description, "Refactor storage");
        assert_eq!(tracks[0].status, Status::Unknown);
    }

    #[test]
    fn test_heading_without_label_keeps_marker_text() {
        let tracks = parse_tracks("# H\n---\n## [ ] Refactor storage\n");
        assert_eq!(tracks[0].description, "[ ] Refactor storage");
        assert_eq!(tracks[0].status, Status::Pending);
    }

    #[test]
    fn test_link_without_heading_is_ignored() {
        let doc = "# H\n---\n*Link: [./a/](./a/)*\n## [ ] Track: A\n";
        let tracks = parse_tracks(doc);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].link, None);
    }

    #[test]
    fn test_anchor_is_extracted_and_removed_from_description() {
        let doc = "# H\n---\n## [ ] Track: Auth <!-- id:auth_20260101 -->\n";
        let tracks = parse_tracks(doc);
        assert_eq!(tracks[0].description, "Auth");
        assert_eq!(tracks[0].anchor.as_deref(), Some("auth_20260101"));
    }

    #[test]
    fn test_reparse_is_stable() {
        let first = parse_tracks(TWO_TRACKS);
        let second = parse_tracks(&TWO_TRACKS.to_string());
        assert_eq!(first, second);
    }

    #[test]
    fn test_counts_and_current_track() {
        let tracks = parse_tracks(TWO_TRACKS);
        let counts = TrackCounts::tally(&tracks);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.pending, 0);
        assert!((counts.progress_percentage() - 50.0).abs() < f64::EPSILON);

        let current = current_track(&tracks).unwrap();
        assert_eq!(current.description, "User authentication");
    }

    #[test]
    fn test_current_track_falls_back_to_pending() {
        let doc = "# H\n---\n## [x] Track: A\n---\n## [ ] Track: B\n---\n## [ ] Track: C\n";
        let tracks = parse_tracks(doc);
        assert_eq!(current_track(&tracks).unwrap().description, "B");
        assert_eq!(next_pending_track(&tracks).unwrap().description, "B");
    }

    #[test]
    fn test_empty_counts() {
        let counts = TrackCounts::tally(&[]);
        assert_eq!(counts, TrackCounts::default());
        assert_eq!(counts.progress_percentage(), 0.0);
    }
}
