//! Plan document parsing.
//!
//! A track's `plan.md` groups tasks under `## <phase>` headings. Each task
//! is a status list item; completed tasks may end with the abbreviated hash
//! of the commit that finished them:
//!
//! ```text
//! ## Phase 1: Core
//! - [x] Write failing tests [abcdef1]
//! - [~] Implement parser
//! - [ ] Wire CLI
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::anchor::{find_anchor, strip_anchors};
use crate::status::Status;

/// Prefix of a phase heading line.
pub const PHASE_PREFIX: &str = "## ";

fn commit_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([0-9a-fA-F]{7,40})\]\s*$").ok())
        .as_ref()
}

/// A task parsed from a plan document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Nearest preceding phase heading, if any.
    pub phase: Option<String>,
    /// Text after the marker, trimmed.
    pub description: String,
    pub status: Status,
    /// The line exactly as it appears in the document.
    pub raw_line: String,
    /// Stable id embedded in the line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

impl Task {
    /// Abbreviated commit hash annotated at the end of the line.
    #[must_use]
    pub fn commit(&self) -> Option<&str> {
        let caps = commit_regex()?.captures(&self.raw_line)?;
        caps.get(1).map(|m| m.as_str())
    }
}

/// Parse all tasks from a plan document, in document order.
///
/// Lines that are neither phase headings nor status list items are ignored.
///
/// # Example
///
/// ```
/// use conductor::{parse_plan, Status};
///
/// let tasks = parse_plan("## Phase 1\n- [ ] Build login\n- [x] Write tests\n");
/// assert_eq!(tasks.len(), 2);
/// assert_eq!(tasks[0].phase.as_deref(), Some("Phase 1"));
/// assert_eq!(tasks[0].description, "Build login");
/// assert_eq!(tasks[1].status, Status::Complete);
/// ```
#[must_use]
pub fn parse_plan(content: &str) -> Vec<Task> {
    let mut tasks = Vec::new();
    let mut current_phase: Option<String> = None;

    for line in content.split('\n') {
        let trimmed = line.trim();

        if trimmed.starts_with(PHASE_PREFIX) {
            current_phase = Some(trimmed.trim_start_matches('#').trim().to_string());
            continue;
        }

        let Some(status) = Status::from_list_item(trimmed) else {
            continue;
        };
        let description = trimmed
            .split_once(']')
            .map_or("", |(_, rest)| rest);

        tasks.push(Task {
            phase: current_phase.clone(),
            description: strip_anchors(description),
            status,
            raw_line: line.to_string(),
            anchor: find_anchor(line).map(str::to_string),
        });
    }

    tasks
}

/// First task still pending.
#[must_use]
pub fn next_pending_task(tasks: &[Task]) -> Option<&Task> {
    tasks.iter().find(|t| t.status == Status::Pending)
}

/// Task counts for one phase of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseProgress {
    pub phase: Option<String>,
    pub total: usize,
    pub completed: usize,
}

impl PhaseProgress {
    /// Whether every task in the phase is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Group tasks by phase, keeping the order in which phases first appear.
#[must_use]
pub fn phase_progress(tasks: &[Task]) -> Vec<PhaseProgress> {
    let mut phases: Vec<PhaseProgress> = Vec::new();
    for task in tasks {
        let idx = match phases.iter().position(|p| p.phase == task.phase) {
            Some(idx) => idx,
            None => {
                phases.push(PhaseProgress {
                    phase: task.phase.clone(),
                    total: 0,
                    completed: 0,
                });
                phases.len() - 1
            }
        };
        phases[idx].total += 1;
        if task.status == Status::Complete {
            phases[idx].completed += 1;
        }
    }
    phases
}
