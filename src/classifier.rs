//! Threshold ladder mapping heading signals to a hierarchy level.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::patterns::PatternTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        };
        f.write_str(name)
    }
}

/// One rung of the ladder. A rule fires when any of its conditions holds.
#[derive(Debug, Clone, Copy)]
pub struct LevelRule {
    pub min_ratio: f64,
    pub tags: &'static [PatternTag],
    pub bold: bool,
    pub level: HeadingLevel,
}

impl LevelRule {
    fn matches(&self, size_ratio: f64, tag: PatternTag, is_bold: bool) -> bool {
        size_ratio >= self.min_ratio || self.tags.contains(&tag) || (self.bold && is_bold)
    }
}

/// Evaluated top to bottom, first match wins. A ratio of 1.5 also satisfies
/// the H3 rung and must still resolve to H2.
///
/// Numbering three or more levels deep ("1.2.3") goes to the H3 rung through
/// its own tag. It would otherwise read as a numbered subsection and land on H2.
pub const LADDER: [LevelRule; 3] = [
    LevelRule {
        min_ratio: 1.8,
        tags: &[PatternTag::NumberedMajor, PatternTag::ChapterKeyword],
        bold: false,
        level: HeadingLevel::H1,
    },
    LevelRule {
        min_ratio: 1.4,
        tags: &[PatternTag::NumberedMinor],
        bold: false,
        level: HeadingLevel::H2,
    },
    LevelRule {
        min_ratio: 1.2,
        tags: &[PatternTag::NumberedDeep],
        bold: true,
        level: HeadingLevel::H3,
    },
];

/// Classify a candidate. `None` means the candidate is rejected.
pub fn classify_level(size_ratio: f64, tag: PatternTag, is_bold: bool) -> Option<HeadingLevel> {
    LADDER
        .iter()
        .find(|rule| rule.matches(size_ratio, tag, is_bold))
        .map(|rule| rule.level)
}
