//! Stable line anchors.
//!
//! Generated track headings and plan tasks carry a hidden HTML comment
//! `<!-- id:<anchor> -->`. Markdown renderers hide it, and it gives the
//! updater an exact key to match instead of a free-text substring.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Length of generated task anchors, in hex characters.
const TASK_ANCHOR_LEN: usize = 8;

fn anchor_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<!--\s*id:([A-Za-z0-9_.\-]+)\s*-->").ok())
        .as_ref()
}

/// Render the anchor token for an id.
///
/// # Example
///
/// ```
/// use conductor::anchor::anchor_token;
///
/// assert_eq!(anchor_token("auth_20260101"), "<!-- id:auth_20260101 -->");
/// ```
#[must_use]
pub fn anchor_token(id: &str) -> String {
    format!("<!-- id:{id} -->")
}

/// Extract the first anchor id on a line.
#[must_use]
pub fn find_anchor(line: &str) -> Option<&str> {
    let caps = anchor_regex()?.captures(line)?;
    caps.get(1).map(|m| m.as_str())
}

/// Whether the line carries exactly this anchor id.
#[must_use]
pub fn has_anchor(line: &str, id: &str) -> bool {
    anchor_regex().is_some_and(|re| {
        re.captures_iter(line)
            .any(|caps| caps.get(1).is_some_and(|m| m.as_str() == id))
    })
}

/// Remove anchor tokens from text and trim the result.
///
/// Whitespace on either side of a removed token collapses to one space.
#[must_use]
pub fn strip_anchors(text: &str) -> String {
    match anchor_regex() {
        Some(re) if re.is_match(text) => {
            let parts: Vec<&str> = re
                .split(text)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect();
            parts.join(" ")
        }
        _ => text.trim().to_string(),
    }
}

/// Derive a short deterministic anchor for a plan task.
///
/// The same track, phase and description always produce the same id.
#[must_use]
pub fn task_anchor(track_id: &str, phase: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(track_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(phase.as_bytes());
    hasher.update([0u8]);
    hasher.update(description.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("t{}", &digest[..TASK_ANCHOR_LEN])
}
