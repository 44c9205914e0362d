//! Final outline structure and its assembly from classified candidates.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::classifier::HeadingLevel;
use crate::functions::{clean_heading_text, match_key};
use crate::scorer::HeadingCandidate;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct DocumentOutline {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

impl DocumentOutline {
    /// The result for documents without text or that failed extraction.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// De-duplicate, order and bind the title. Rejected candidates are dropped.
pub fn assemble_outline(title: String, candidates: Vec<HeadingCandidate<'_>>) -> DocumentOutline {
    let mut seen: HashSet<(String, usize)> = HashSet::new();

    let mut headings: Vec<(usize, OutlineEntry)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let level = candidate.tentative_level?;
            // Keyed on the emitted text so leader variants collapse together
            let text = clean_heading_text(&candidate.normalized_text);
            if !seen.insert((match_key(&text), candidate.run.page)) {
                return None;
            }
            Some((
                candidate.run.order_index,
                OutlineEntry {
                    level,
                    text,
                    page: candidate.run.page,
                },
            ))
        })
        .collect();

    headings.sort_by_key(|(order_index, entry)| (entry.page, *order_index));

    DocumentOutline {
        title,
        outline: headings.into_iter().map(|(_, entry)| entry).collect(),
    }
}
