//! Document-wide font statistics used as the heading baseline.

use std::collections::BTreeMap;

use crate::font_utils::TextRun;

/// Font size statistics for one document.
///
/// Built once from the complete run set and only read afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentStats {
    /// Arithmetic mean of all run sizes
    pub mean_font_size: f64,
    /// Character-weighted most common size (paragraph text)
    pub body_font_size: f64,
    /// Largest observed size
    pub max_font_size: f64,
    /// Distinct sizes rounded to 0.1pt, ascending
    pub distinct_sizes: Vec<f64>,
}

/// Histogram key: size rounded to 0.1pt.
fn size_key(size: f64) -> i64 {
    (size * 10.0).round() as i64
}

impl DocumentStats {
    pub fn from_runs(runs: &[TextRun]) -> Self {
        if runs.is_empty() {
            return Self::default();
        }

        let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
        let mut total = 0.0;
        let mut max_font_size = f64::MIN;

        for run in runs {
            // Longer runs count more so short large labels cannot pose as body text
            let weight = run.text.chars().filter(|c| !c.is_whitespace()).count().max(1);
            *histogram.entry(size_key(run.font_size)).or_insert(0) += weight;
            total += run.font_size;
            max_font_size = max_font_size.max(run.font_size);
        }

        // Ascending key order, so ties resolve to the smaller size
        let body_key = histogram
            .iter()
            .fold(None, |best: Option<(i64, usize)>, (&key, &weight)| match best {
                Some((_, best_weight)) if best_weight >= weight => best,
                _ => Some((key, weight)),
            })
            .map(|(key, _)| key)
            .unwrap_or_default();

        let stats = Self {
            mean_font_size: total / runs.len() as f64,
            body_font_size: body_key as f64 / 10.0,
            max_font_size,
            distinct_sizes: histogram.keys().map(|&k| k as f64 / 10.0).collect(),
        };

        log::debug!(
            "Font size stats - body: {:.1}, mean: {:.2}, max: {:.1}, distinct: {}",
            stats.body_font_size,
            stats.mean_font_size,
            stats.max_font_size,
            stats.distinct_sizes.len()
        );
        stats
    }

    /// True when computed from zero runs.
    pub fn is_empty(&self) -> bool {
        self.distinct_sizes.is_empty()
    }

    /// `font_size / body_font_size`, or 1.0 without a baseline.
    pub fn size_ratio(&self, font_size: f64) -> f64 {
        if self.body_font_size > 0.0 {
            font_size / self.body_font_size
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_utils::BBox;

    fn run(text: &str, size: f64) -> TextRun {
        TextRun::new(text, 1, size, false, BBox::default())
    }

    #[test]
    fn test_empty_runs() {
        let stats = DocumentStats::from_runs(&[]);
        assert!(stats.is_empty());
        assert_eq!(stats.body_font_size, 0.0);
        assert_eq!(stats.mean_font_size, 0.0);
        assert_eq!(stats.max_font_size, 0.0);
        assert_eq!(stats.size_ratio(12.0), 1.0);
    }

    #[test]
    fn test_body_size_is_weighted_mode() {
        let mut runs: Vec<TextRun> = (0..100)
            .map(|i| run(&format!("Body paragraph text number {}", i), 10.0))
            .collect();
        runs.extend((0..5).map(|i| run(&format!("Heading {}", i), 18.0)));

        let stats = DocumentStats::from_runs(&runs);
        assert_eq!(stats.body_font_size, 10.0);
        assert_eq!(stats.max_font_size, 18.0);
        assert_eq!(stats.distinct_sizes, vec![10.0, 18.0]);
        assert!((stats.size_ratio(18.0) - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_many_short_labels_do_not_win() {
        // Eight one-character labels against two long paragraphs
        let mut runs: Vec<TextRun> = (0..8).map(|_| run("x", 20.0)).collect();
        runs.push(run("A long paragraph of ordinary body text.", 11.0));
        runs.push(run("Another long paragraph of ordinary body text.", 11.0));

        let stats = DocumentStats::from_runs(&runs);
        assert_eq!(stats.body_font_size, 11.0);
        let expected_mean = (8.0 * 20.0 + 2.0 * 11.0) / 10.0;
        assert!((stats.mean_font_size - expected_mean).abs() < 1e-9);
    }

    #[test]
    fn test_ties_prefer_smaller_size() {
        let runs = vec![run("abcd", 14.0), run("wxyz", 9.0)];
        assert_eq!(DocumentStats::from_runs(&runs).body_font_size, 9.0);
    }
}
