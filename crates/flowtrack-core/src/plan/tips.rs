//! Tip pool handling: pulling numbered tips out of advice text and cleaning
//! them up for display next to plan items.

use crate::domain::AdvisoryState;

/// Used when no advice has been cached yet.
pub const FALLBACK_TIPS: [&str; 5] = [
    "Start with the highest-priority task before checking messages.",
    "Work in 25-minute focus blocks with short breaks between blocks.",
    "Break each task into one clear first step to remove friction.",
    "Batch similar tasks together to reduce context switching.",
    "Mark one task done before starting another to keep momentum.",
];

/// At most this many tips are kept from one advice text.
pub const MAX_EXTRACTED_TIPS: usize = 5;

/// Strips `N.` list numbering. With `require_space`, at least one whitespace
/// character must follow the dot.
fn strip_numbering(line: &str, require_space: bool) -> Option<&str> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let body = rest.trim_start();
    if require_space && body.len() == rest.len() {
        return None;
    }
    Some(body)
}

/// Removes markdown bold markers and leading numbering.
pub fn clean_tip(raw: &str) -> String {
    let unbolded = raw.replace("**", "");
    let trimmed = unbolded.trim();
    strip_numbering(trimmed, false)
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Numbered lines (`1. ...`) of an advice text, cleaned, at most
/// [`MAX_EXTRACTED_TIPS`].
pub fn extract_tips(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| strip_numbering(line, true))
        .map(|body| body.replace("**", "").trim().to_string())
        .filter(|tip| !tip.is_empty())
        .take(MAX_EXTRACTED_TIPS)
        .collect()
}

/// Latest tips first, then the base tips, cleaned and without blanks.
/// May be empty; the plan builder substitutes [`FALLBACK_TIPS`] then.
pub fn tip_pool(state: &AdvisoryState) -> Vec<String> {
    state
        .latest_tips
        .iter()
        .chain(state.base_tips.iter())
        .map(|tip| clean_tip(tip))
        .filter(|tip| !tip.is_empty())
        .collect()
}
