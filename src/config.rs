//! Tunable thresholds for the outline pipeline.

use serde::{Deserialize, Serialize};

/// Options controlling run collection, filtering and title detection.
///
/// Every field has a default, so a partial JSON config file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Pages past this index are ignored by the run collector
    pub max_pages: usize,

    /// Number of leading pages scanned for a title when metadata has none
    pub title_pages: usize,

    /// Shorter normalized texts are never headings
    pub min_heading_chars: usize,

    /// Longer normalized texts are treated as paragraphs
    pub max_heading_chars: usize,

    /// Numbering/keyword patterns only apply up to this many words
    pub max_pattern_words: usize,

    /// Height fraction at the top and bottom of a page treated as margin
    pub margin_fraction: f64,

    /// Margin text repeated on this many pages is a running header/footer
    pub min_repeat_pages: usize,
}

impl OutlineConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cap.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set how many leading pages are scanned for a title.
    pub fn with_title_pages(mut self, pages: usize) -> Self {
        self.title_pages = pages;
        self
    }

    /// Set the minimum heading length in characters.
    pub fn with_min_heading_chars(mut self, chars: usize) -> Self {
        self.min_heading_chars = chars;
        self
    }

    /// Set the maximum heading length in characters.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Set the header/footer margin band as a fraction of page height.
    pub fn with_margin_fraction(mut self, fraction: f64) -> Self {
        self.margin_fraction = fraction.clamp(0.0, 0.5);
        self
    }

    /// Set the repeat count that marks margin text as a running header/footer.
    pub fn with_min_repeat_pages(mut self, pages: usize) -> Self {
        self.min_repeat_pages = pages.max(2);
        self
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            title_pages: 2,
            min_heading_chars: 3,
            max_heading_chars: 200,
            max_pattern_words: 12,
            margin_fraction: 0.10,
            min_repeat_pages: 2,
        }
    }
}
