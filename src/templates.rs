//! Markdown templates for generated documents.
//!
//! Everything produced here parses back with [`parse_tracks`](crate::parse_tracks)
//! and [`parse_plan`](crate::parse_plan), and carries anchors for the
//! anchor-keyed updates.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

use crate::anchor::{anchor_token, task_anchor};
use crate::status::MARKER_PENDING;

/// A phase to scaffold into a new plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTemplate {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl PhaseTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.tasks.push(task.into());
        self
    }
}

/// Header written when `tracks.md` is first created.
#[must_use]
pub fn tracks_header() -> String {
    "# Project Tracks\n\
     \n\
     This file tracks all major tracks for the project. Each track has its own detailed plan in its respective folder.\n"
        .to_string()
}

/// Section appended to `tracks.md` for a new track.
///
/// # Example
///
/// ```
/// use conductor::templates::track_entry;
/// use std::path::Path;
///
/// let entry = track_entry(Path::new("conductor/tracks"), "login_20260101", "Login");
/// assert!(entry.contains("## [ ] Track: Login <!-- id:login_20260101 -->"));
/// assert!(entry.contains("*Link: [./conductor/tracks/login_20260101/]"));
/// ```
#[must_use]
pub fn track_entry(tracks_dir: &Path, track_id: &str, description: &str) -> String {
    let link = format!("./{}/{}/", tracks_dir.display(), track_id);
    format!(
        "\n---\n\n## {MARKER_PENDING} Track: {description} {anchor}\n*Link: [{link}]({link})*\n",
        anchor = anchor_token(track_id),
    )
}

/// `spec.md` for a new track.
#[must_use]
pub fn spec_document(description: &str, requirements: &[String]) -> String {
    let req_list = if requirements.is_empty() {
        "- TBD".to_string()
    } else {
        requirements
            .iter()
            .map(|r| format!("- {r}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "# Specification: {description}

## Overview

{description}

## Functional Requirements

{req_list}

## Non-Functional Requirements

- Performance: TBD
- Security: TBD
- Accessibility: TBD

## Acceptance Criteria

- [ ] All functional requirements implemented
- [ ] All tests passing
- [ ] Code coverage >80%
- [ ] Documentation updated

## Out of Scope

- TBD
"
    )
}

/// `plan.md` for a new track.
///
/// Each phase ends with a manual verification task. Every task line
/// carries an anchor derived from the track id, phase and text.
#[must_use]
pub fn plan_document(track_id: &str, description: &str, phases: &[PhaseTemplate]) -> String {
    let mut plan = format!(
        "# Implementation Plan: {description}

## Status Legend
- `[ ]` Pending
- `[~]` In Progress
- `[x]` Complete

"
    );

    for phase in phases {
        let _ = write!(plan, "\n## {}\n\n", phase.name);
        let verification = format!(
            "Task: Conductor - User Manual Verification '{}' (Protocol in workflow.md)",
            phase.name
        );
        for task in phase.tasks.iter().map(String::as_str).chain([verification.as_str()]) {
            let anchor = task_anchor(track_id, &phase.name, task);
            let _ = writeln!(plan, "- {MARKER_PENDING} {task} {}", anchor_token(&anchor));
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::parse_plan;
    use crate::status::Status;
    use crate::tracks::parse_tracks;

    #[test]
    fn test_header_plus_entries_parse_as_tracks() {
        let dir = Path::new("conductor/tracks");
        let mut doc = tracks_header();
        doc.push_str(&track_entry(dir, "login_20260101", "Login"));
        doc.push_str(&track_entry(dir, "dark_mode_20260102", "Dark mode"));

        let tracks = parse_tracks(&doc);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].description, "Login");
        assert_eq!(tracks[0].status, Status::Pending);
        assert_eq!(tracks[0].anchor.as_deref(), Some("login_20260101"));
        assert_eq!(
            tracks[1].link.as_deref(),
            Some("./conductor/tracks/dark_mode_20260102/")
        );
    }

    #[test]
    fn test_plan_document_parses() {
        let phases = vec![
            PhaseTemplate::new("Phase 1: Core")
                .with_task("Write tests")
                .with_task("Implement"),
            PhaseTemplate::new("Phase 2: Polish"),
        ];
        let plan = plan_document("login_20260101", "Login", &phases);
        let tasks = parse_plan(&plan);

        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].phase.as_deref(), Some("Phase 1: Core"));
        assert_eq!(tasks[0].description, "Write tests");
        assert!(tasks[0].anchor.is_some());
        assert_eq!(
            tasks[2].description,
            "Task: Conductor - User Manual Verification 'Phase 1: Core' (Protocol in workflow.md)"
        );
        assert_eq!(tasks[3].phase.as_deref(), Some("Phase 2: Polish"));
        assert!(tasks.iter().all(|t| t.status == Status::Pending));
    }

    #[test]
    fn test_plan_anchors_are_distinct() {
        let phases = vec![PhaseTemplate::new("P").with_task("A").with_task("B")];
        let tasks = parse_plan(&plan_document("t_20260101", "T", &phases));
        assert_ne!(tasks[0].anchor, tasks[1].anchor);
        assert_ne!(tasks[1].anchor, tasks[2].anchor);
    }

    #[test]
    fn test_spec_document() {
        let spec = spec_document("Login", &[]);
        assert!(spec.starts_with("# Specification: Login\n"));
        assert!(spec.contains("## Functional Requirements\n\n- TBD\n"));

        let spec = spec_document("Login", &["OAuth".to_string(), "Password reset".to_string()]);
        assert!(spec.contains("- OAuth\n- Password reset\n"));
    }

    #[test]
    fn test_spec_checklist_is_not_a_track() {
        // Acceptance criteria use markers but never count as tracks
        assert!(parse_tracks(&spec_document("Login", &[])).is_empty());
    }
}
