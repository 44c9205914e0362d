//! Removes runs that cannot be headings.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::OutlineConfig;
use crate::font_utils::{ExtractedDocument, PageGeometry, TextRun};
use crate::functions::normalize_text;

/// A run that survived filtering, with its normalized text.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRun<'a> {
    pub run: &'a TextRun,
    pub normalized_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum MarginBand {
    Top,
    Bottom,
}

fn margin_band(run: &TextRun, geometry: PageGeometry, fraction: f64) -> Option<MarginBand> {
    let band = geometry.height() * fraction;
    if run.bbox.y0 >= geometry.top - band {
        Some(MarginBand::Top)
    } else if run.bbox.y0 <= geometry.bottom + band {
        Some(MarginBand::Bottom)
    } else {
        None
    }
}

/// Texts found in the same margin band on at least `min_repeat_pages` pages.
fn running_headers(doc: &ExtractedDocument, config: &OutlineConfig) -> HashSet<(MarginBand, String)> {
    let mut pages_by_text: BTreeMap<(MarginBand, String), BTreeSet<usize>> = BTreeMap::new();

    for run in &doc.runs {
        let Some(band) = margin_band(run, doc.page_geometry(run.page), config.margin_fraction) else {
            continue;
        };
        let normalized = normalize_text(&run.text);
        if !normalized.is_empty() {
            pages_by_text.entry((band, normalized)).or_default().insert(run.page);
        }
    }

    pages_by_text
        .into_iter()
        .filter(|(_, pages)| pages.len() >= config.min_repeat_pages)
        .map(|(key, _)| key)
        .collect()
}

/// Keep runs that could be headings, preserving document order.
pub fn filter_candidates<'a>(doc: &'a ExtractedDocument, config: &OutlineConfig) -> Vec<FilteredRun<'a>> {
    let repeated = running_headers(doc, config);

    let candidates: Vec<FilteredRun<'a>> = doc
        .runs
        .iter()
        .filter_map(|run| {
            let normalized_text = normalize_text(&run.text);
            let chars = normalized_text.chars().count();
            if normalized_text.is_empty()
                || chars < config.min_heading_chars
                || chars > config.max_heading_chars
            {
                return None;
            }

            if let Some(band) = margin_band(run, doc.page_geometry(run.page), config.margin_fraction) {
                if repeated.contains(&(band, normalized_text.clone())) {
                    log::debug!("Dropping running {:?} text on page {}: {}", band, run.page, normalized_text);
                    return None;
                }
            }

            Some(FilteredRun { run, normalized_text })
        })
        .collect();

    log::debug!("{} of {} runs kept as candidates", candidates.len(), doc.runs.len());
    candidates
}
