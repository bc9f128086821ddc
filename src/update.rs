//! In-place status marker rewrites.
//!
//! Every function here is a pure text transform: it takes the whole
//! document, finds the first line matching a [`LineSelector`], and swaps
//! that line's marker for the requested one. All other bytes of the
//! document, including line endings and a missing or present trailing
//! newline, are left untouched.

use serde::Serialize;

use crate::anchor::has_anchor;
use crate::status::{MarkerMatch, Status};
use crate::tracks::HEADING_PREFIX;

/// Default length of the commit hash annotation.
pub const DEFAULT_COMMIT_ABBREV_LEN: usize = 7;

/// How the target line is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSelector<'a> {
    /// First line containing this text.
    Contains(&'a str),
    /// First line carrying exactly this anchor id.
    Anchor(&'a str),
}

impl LineSelector<'_> {
    /// Whether a line is selected.
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        match self {
            LineSelector::Contains(text) => line.contains(text),
            LineSelector::Anchor(id) => has_anchor(line, id),
        }
    }
}

/// Result of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The marker on `line` (1-based) was rewritten.
    Updated { line: usize },
    /// The line on `line` already had the requested marker; nothing to write.
    Unchanged { line: usize },
    /// No line matched the selector.
    NoMatch,
    /// The target document does not exist.
    MissingDocument,
    /// The requested status has no marker.
    InvalidStatus,
}

impl UpdateOutcome {
    /// Whether the target line now carries the requested status.
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(
            self,
            UpdateOutcome::Updated { .. } | UpdateOutcome::Unchanged { .. }
        )
    }

    /// Whether the document content changed and has to be written back.
    #[must_use]
    pub fn needs_write(&self) -> bool {
        matches!(self, UpdateOutcome::Updated { .. })
    }
}

/// A computed rewrite: the outcome plus the new content when it changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub outcome: UpdateOutcome,
    /// New document text, present only for [`UpdateOutcome::Updated`].
    pub content: Option<String>,
}

impl Rewrite {
    fn without_change(outcome: UpdateOutcome) -> Self {
        Self {
            outcome,
            content: None,
        }
    }
}

/// Replace the marker selected by [`Status::decode`] with `marker`.
///
/// Returns `None` when the line has no marker.
#[must_use]
pub fn replace_marker(line: &str, marker: &str) -> Option<String> {
    Status::find_marker(line).map(|found| splice_marker(line, &found, marker))
}

/// Replace the status marker of a task line.
///
/// List items (`- [ ] ...`) have the marker right after the `- ` prefix
/// replaced; any other line falls back to [`replace_marker`].
#[must_use]
pub fn replace_task_marker(line: &str, marker: &str) -> Option<String> {
    match Status::find_list_item_marker(line) {
        Some(found) => Some(splice_marker(line, &found, marker)),
        None => replace_marker(line, marker),
    }
}

fn splice_marker(line: &str, found: &MarkerMatch, marker: &str) -> String {
    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..found.range.start]);
    out.push_str(marker);
    out.push_str(&line[found.range.end..]);
    out
}

/// Rewrite the first line for which `edit` returns a replacement.
fn rewrite_first<F>(content: &str, mut edit: F) -> Rewrite
where
    F: FnMut(&str) -> Option<String>,
{
    let lines: Vec<&str> = content.split('\n').collect();

    for (idx, line) in lines.iter().enumerate() {
        let Some(new_line) = edit(line) else {
            continue;
        };

        if new_line == *line {
            return Rewrite::without_change(UpdateOutcome::Unchanged { line: idx + 1 });
        }

        let mut out = String::with_capacity(content.len() + new_line.len());
        for (i, original) in lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(if i == idx { new_line.as_str() } else { *original });
        }

        return Rewrite {
            outcome: UpdateOutcome::Updated { line: idx + 1 },
            content: Some(out),
        };
    }

    Rewrite::without_change(UpdateOutcome::NoMatch)
}

/// Set the status of a track heading in a tracks document.
///
/// The target is the first `## ` heading that matches `selector` and carries
/// a marker.
///
/// # Example
///
/// ```
/// use conductor::update::{rewrite_track_status, LineSelector};
/// use conductor::Status;
///
/// let doc = "# Tracks\n---\n## [ ] Track: Login\n";
/// let rewrite = rewrite_track_status(doc, LineSelector::Contains("Login"), Status::InProgress);
/// assert_eq!(rewrite.content.as_deref(), Some("# Tracks\n---\n## [~] Track: Login\n"));
/// ```
#[must_use]
pub fn rewrite_track_status(content: &str, selector: LineSelector<'_>, status: Status) -> Rewrite {
    let Some(marker) = status.marker() else {
        return Rewrite::without_change(UpdateOutcome::InvalidStatus);
    };

    rewrite_first(content, |line| {
        if !line.trim().starts_with(HEADING_PREFIX) || !selector.matches(line) {
            return None;
        }
        replace_marker(line, marker)
    })
}

/// Set the status of a task in a plan document.
///
/// The target is the first line that matches `selector` and carries a
/// marker. On list items the marker after the `- ` prefix is the one
/// replaced, so marker-like text in the description is left alone.
///
/// When the new status is [`Status::Complete`] and a commit hash is given,
/// ` [<abbrev>]` is appended to the line using the first `abbrev_len`
/// characters of the hash, unless the line already ends with that
/// annotation. A trailing `\r` stays at the end of the line.
#[must_use]
pub fn rewrite_task_status(
    content: &str,
    selector: LineSelector<'_>,
    status: Status,
    commit: Option<&str>,
    abbrev_len: usize,
) -> Rewrite {
    let Some(marker) = status.marker() else {
        return Rewrite::without_change(UpdateOutcome::InvalidStatus);
    };
    let annotation = commit
        .map(str::trim)
        .filter(|c| !c.is_empty() && status == Status::Complete)
        .map(|c| format!("[{}]", abbreviate(c, abbrev_len)));

    rewrite_first(content, |line| {
        if !selector.matches(line) {
            return None;
        }
        let mut new_line = replace_task_marker(line, marker)?;
        if let Some(annotation) = &annotation {
            let cr = new_line.ends_with('\r');
            if cr {
                new_line.pop();
            }
            if !new_line.trim_end().ends_with(annotation.as_str()) {
                new_line.push(' ');
                new_line.push_str(annotation);
            }
            if cr {
                new_line.push('\r');
            }
        }
        Some(new_line)
    })
}

/// First `len` characters of a commit hash.
#[must_use]
pub fn abbreviate(commit: &str, len: usize) -> &str {
    match commit.char_indices().nth(len) {
        Some((idx, _)) => &commit[..idx],
        None => commit,
    }
}
