//! Multi-signal heading scoring.
//!
//! Font size alone is not enough: some documents set headings in the body
//! size and rely on explicit numbering, so pattern matches and boldness can
//! carry a candidate that has no size advantage.

use crate::classifier::{classify_level, HeadingLevel};
use crate::config::OutlineConfig;
use crate::filter::FilteredRun;
use crate::font_utils::TextRun;
use crate::patterns::{match_pattern, PatternTag};
use crate::stats::DocumentStats;
use crate::title::TitleSelection;

const SIZE_WEIGHT: f64 = 2.0;
const BOLD_BONUS: f64 = 0.5;
const FIRST_ON_PAGE_BONUS: f64 = 0.25;

fn pattern_bonus(tag: PatternTag) -> f64 {
    match tag {
        PatternTag::NumberedMajor | PatternTag::ChapterKeyword => 1.0,
        PatternTag::NumberedMinor => 0.75,
        PatternTag::NumberedDeep => 0.5,
        PatternTag::None => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate<'a> {
    pub run: &'a TextRun,
    pub normalized_text: String,
    pub size_ratio: f64,
    pub pattern_tag: PatternTag,
    pub score: f64,
    /// `None` marks a rejected candidate
    pub tentative_level: Option<HeadingLevel>,
}

impl HeadingCandidate<'_> {
    pub fn is_rejected(&self) -> bool {
        self.tentative_level.is_none()
    }
}

/// Score every filtered run except the title and assign its tentative level.
pub fn score_candidates<'a>(
    candidates: Vec<FilteredRun<'a>>,
    stats: &DocumentStats,
    title: &TitleSelection,
    config: &OutlineConfig,
) -> Vec<HeadingCandidate<'a>> {
    let mut last_page = 0;

    candidates
        .into_iter()
        .filter(|c| !title.excludes(c.run.page, &c.normalized_text))
        .map(|FilteredRun { run, normalized_text }| {
            let first_on_page = run.page != last_page;
            last_page = run.page;

            let size_ratio = stats.size_ratio(run.font_size);
            let pattern_tag = match_pattern(&normalized_text, config.max_pattern_words);

            let mut score = size_ratio * SIZE_WEIGHT + pattern_bonus(pattern_tag);
            if run.is_bold {
                score += BOLD_BONUS;
            }
            if first_on_page {
                score += FIRST_ON_PAGE_BONUS;
            }

            let outright_reject = size_ratio < 1.0 && pattern_tag == PatternTag::None && !run.is_bold;
            let tentative_level = if outright_reject {
                None
            } else {
                classify_level(size_ratio, pattern_tag, run.is_bold)
            };

            if let Some(level) = tentative_level {
                log::debug!(
                    "{} p{} ratio={:.2} tag={:?} bold={} score={:.2}: {}",
                    level,
                    run.page,
                    size_ratio,
                    pattern_tag,
                    run.is_bold,
                    score,
                    normalized_text
                );
            }

            HeadingCandidate {
                run,
                normalized_text,
                size_ratio,
                pattern_tag,
                score,
                tentative_level,
            }
        })
        .collect()
}
