//! Structural heading patterns: section numbering and section keywords.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::functions::word_count;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternTag {
    None,
    /// "1. Introduction", "2 Methods", "IV. Scope"
    NumberedMajor,
    /// "1.1 Overview"
    NumberedMinor,
    /// "1.1.1 Details" and deeper
    NumberedDeep,
    /// "Chapter 3", "Appendix A", or a standalone "Abstract"
    ChapterKeyword,
}

/// Ordered (matcher, tag) pairs; the first matching row wins.
pub static PATTERN_TABLE: Lazy<Vec<(Regex, PatternTag)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"^(?:\d{1,2}\.?|[IVXLC]{1,6}\.)\s+\p{Lu}").unwrap(),
            PatternTag::NumberedMajor,
        ),
        (
            Regex::new(r"^\d{1,2}\.\d{1,2}\.?\s+\S").unwrap(),
            PatternTag::NumberedMinor,
        ),
        (
            Regex::new(r"^\d{1,2}(?:\.\d{1,2}){2,}\.?\s+\S").unwrap(),
            PatternTag::NumberedDeep,
        ),
        (
            Regex::new(r"(?i)^(?:chapter|section|part|appendix)\s+(?:\d+|[ivxlc]+|[a-z])\b").unwrap(),
            PatternTag::ChapterKeyword,
        ),
        (
            Regex::new(
                r"(?i)^(?:abstract|introduction|conclusions?|references|bibliography|acknowledge?ments|summary|executive summary|table of contents|appendix)\s*:?$",
            )
            .unwrap(),
            PatternTag::ChapterKeyword,
        ),
    ]
});

/// Tag normalized text with the first matching pattern.
///
/// Texts longer than `max_words` read as prose and are never tagged.
pub fn match_pattern(text: &str, max_words: usize) -> PatternTag {
    if word_count(text) > max_words {
        return PatternTag::None;
    }

    PATTERN_TABLE
        .iter()
        .find(|(regex, _)| regex.is_match(text))
        .map(|(_, tag)| *tag)
        .unwrap_or(PatternTag::None)
}
