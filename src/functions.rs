use once_cell::sync::Lazy;
use regex::Regex;

static DOTTED_LEADERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\.{3,}\s*\d*$").unwrap());

/// Trim and collapse internal whitespace.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Key used for duplicate and title matching.
pub fn match_key(text: &str) -> String {
    normalize_text(text).to_lowercase()
}

/// Display form of a heading: table-of-contents dot leaders and their page
/// number are dropped.
pub fn clean_heading_text(text: &str) -> String {
    let normalized = normalize_text(text);
    let cleaned = DOTTED_LEADERS.replace(&normalized, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        normalized
    } else {
        cleaned.to_string()
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
