//! Document title selection: metadata first, then the typography of the
//! first pages.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::config::OutlineConfig;
use crate::filter::FilteredRun;
use crate::functions::{match_key, normalize_text};
use crate::patterns::{match_pattern, PatternTag};

static FILE_NAME_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(pdf|docx?|pptx?|xlsx?|txt|rtf|odt|tex|indd)$").unwrap());
static EXPORT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^microsoft (word|powerpoint|excel) - ").unwrap());

const PLACEHOLDER_TITLES: &[&str] = &[
    "untitled",
    "untitled document",
    "document",
    "title",
    "no title",
    "none",
    "null",
];

const FIRST_BLOCK_BONUS: f64 = 1.5;
const MAX_TITLE_LINES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    Metadata,
    Content,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleSelection {
    pub text: String,
    pub source: TitleSource,
    /// (page, match key) pairs that must not reappear as headings
    excluded: Vec<(usize, String)>,
}

impl TitleSelection {
    fn none() -> Self {
        Self {
            text: String::new(),
            source: TitleSource::None,
            excluded: Vec::new(),
        }
    }

    /// True when a heading candidate is the title itself.
    pub fn excludes(&self, page: usize, normalized_text: &str) -> bool {
        let key = match_key(normalized_text);
        self.excluded.iter().any(|(p, k)| *p == page && *k == key)
    }
}

/// Generic metadata values that authoring tools write instead of a real title.
pub fn is_placeholder_title(title: &str, file_stem: Option<&str>) -> bool {
    let lower = title.to_lowercase();
    PLACEHOLDER_TITLES.contains(&lower.as_str())
        || EXPORT_PREFIX.is_match(title)
        || FILE_NAME_TITLE.is_match(title)
        || file_stem.is_some_and(|stem| stem.eq_ignore_ascii_case(title))
}

fn metadata_title(raw: Option<&str>, config: &OutlineConfig, file_stem: Option<&str>) -> Option<String> {
    let title = normalize_text(raw?);
    if title.is_empty() || title.chars().count() > config.max_heading_chars {
        return None;
    }
    if is_placeholder_title(&title, file_stem) {
        log::debug!("Ignoring placeholder metadata title: {}", title);
        return None;
    }
    Some(title)
}

fn size_key(size: f64) -> i64 {
    (size * 10.0).round() as i64
}

/// Pick the title from metadata or, failing that, from the first pages.
pub fn extract_title(
    raw_metadata_title: Option<&str>,
    candidates: &[FilteredRun<'_>],
    config: &OutlineConfig,
    file_stem: Option<&str>,
) -> TitleSelection {
    if let Some(title) = metadata_title(raw_metadata_title, config, file_stem) {
        let key = match_key(&title);
        return TitleSelection {
            excluded: (1..=config.title_pages).map(|page| (page, key.clone())).collect(),
            text: title,
            source: TitleSource::Metadata,
        };
    }

    title_from_content(candidates, config)
}

fn title_from_content(candidates: &[FilteredRun<'_>], config: &OutlineConfig) -> TitleSelection {
    let early: Vec<&FilteredRun<'_>> = candidates
        .iter()
        .filter(|c| c.run.page <= config.title_pages)
        .collect();

    // Distinct sizes per page, largest first
    let mut sizes_by_page: BTreeMap<usize, Vec<i64>> = BTreeMap::new();
    for candidate in &early {
        let sizes = sizes_by_page.entry(candidate.run.page).or_default();
        let key = size_key(candidate.run.font_size);
        if !sizes.contains(&key) {
            sizes.push(key);
        }
    }
    for sizes in sizes_by_page.values_mut() {
        sizes.sort_unstable_by(|a, b| b.cmp(a));
    }

    let mut scores = Vec::with_capacity(early.len());
    let mut last_page = 0;
    for candidate in &early {
        let page = candidate.run.page;
        let first_on_page = page != last_page;
        last_page = page;

        // Largest size on the page ranks 1.0, the smallest 1/n
        let sizes = &sizes_by_page[&page];
        let rank = sizes
            .iter()
            .position(|&s| s == size_key(candidate.run.font_size))
            .unwrap_or(sizes.len() - 1);
        let size_rank = (sizes.len() - rank) as f64 / sizes.len() as f64;
        let first_block = if first_on_page { FIRST_BLOCK_BONUS } else { 1.0 };
        let not_pattern = match match_pattern(&candidate.normalized_text, config.max_pattern_words) {
            PatternTag::None => 1.0,
            _ => 0.0,
        };

        scores.push(size_rank * first_block * not_pattern);
    }

    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }
    let Some((best_idx, best_score)) = best.filter(|(_, score)| *score > 0.0) else {
        return TitleSelection::none();
    };
    // Nothing stands out when every candidate scores the same
    if scores.len() > 1 && scores.iter().all(|&score| score == best_score) {
        log::debug!("All {} title candidates tied at {:.2}", scores.len(), best_score);
        return TitleSelection::none();
    }

    // Titles set over several lines continue in the same size directly below
    let mut parts = vec![early[best_idx]];
    for next in early.iter().skip(best_idx + 1).take(MAX_TITLE_LINES - 1) {
        let prev = parts[parts.len() - 1];
        let drop = prev.run.bbox.y0 - next.run.bbox.y0;
        let continues = next.run.page == prev.run.page
            && size_key(next.run.font_size) == size_key(prev.run.font_size)
            && next.run.is_bold == prev.run.is_bold
            && drop > 0.0
            && drop <= prev.run.font_size * 2.0
            && match_pattern(&next.normalized_text, config.max_pattern_words) == PatternTag::None;
        if !continues {
            break;
        }
        parts.push(*next);
    }

    let text = parts
        .iter()
        .map(|p| p.normalized_text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    log::debug!("Title from page {} scored {:.2}: {}", parts[0].run.page, best_score, text);

    TitleSelection {
        text,
        source: TitleSource::Content,
        excluded: parts
            .iter()
            .map(|p| (p.run.page, match_key(&p.normalized_text)))
            .collect(),
    }
}
