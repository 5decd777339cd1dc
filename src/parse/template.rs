//! Template hole extraction (§4.D "Template detection", §6 "Template syntax").

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `{{ ... }}` with a non-greedy body that forbids nested braces —
/// `[^{}]*` means a `{` or `}` inside a hole ends the match early, which is
/// exactly the "nested braces forbidden" rule (§4.D).
static HOLE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("valid hole pattern"));

/// A single `{{ ... }}` occurrence in a template string.
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    /// The trimmed expression text inside the braces.
    pub body: String,
    /// Byte offset of the opening `{` in the original template.
    pub start: usize,
    /// Byte offset one past the closing `}` in the original template.
    pub end: usize,
}

/// True if `text` contains at least one non-empty hole — the signal the
/// orchestrator uses to pick template mode over direct mode (§4.G).
pub fn has_template_holes(text: &str) -> bool {
    extract_holes(text).next().is_some()
}

/// Extracts holes in source order. Empty or whitespace-only holes are
/// skipped (§4.D "Empty holes are ignored" — they pass through as literal
/// text).
pub fn extract_holes(text: &str) -> impl Iterator<Item = Hole> + '_ {
    HOLE_PATTERN.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0).expect("capture 0 always present");
        let body = caps.get(1).map(|m| m.as_str()).unwrap_or_default().trim();
        if body.is_empty() {
            None
        } else {
            Some(Hole {
                body: body.to_owned(),
                start: whole.start(),
                end: whole.end(),
            })
        }
    })
}
