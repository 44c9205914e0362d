//! Per-document pipeline: Extraction → Stats → Filter → Title → Score →
//! Classify → Assemble.

use std::path::Path;

use crate::config::OutlineConfig;
use crate::error::Result;
use crate::filter::filter_candidates;
use crate::font_utils::{collect_runs, ExtractedDocument};
use crate::outline::{assemble_outline, DocumentOutline};
use crate::scorer::score_candidates;
use crate::stats::DocumentStats;
use crate::title::extract_title;

/// Runs the outline pipeline with one fixed configuration.
///
/// Holds no per-document state, so one extractor can serve many documents
/// from many threads.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    config: OutlineConfig,
}

impl OutlineExtractor {
    pub fn new(config: OutlineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Extract the outline of an in-memory PDF.
    pub fn extract(&self, bytes: &[u8]) -> Result<DocumentOutline> {
        self.extract_named(bytes, None)
    }

    /// Like [`extract`](Self::extract), with the source file stem used to
    /// recognise filename-derived metadata titles.
    pub fn extract_named(&self, bytes: &[u8], file_stem: Option<&str>) -> Result<DocumentOutline> {
        let doc = collect_runs(bytes, &self.config)?;
        Ok(self.outline_from_document(&doc, file_stem))
    }

    /// The classification core. Infallible: anything uncertain is rejected.
    pub fn outline_from_document(&self, doc: &ExtractedDocument, file_stem: Option<&str>) -> DocumentOutline {
        let stats = DocumentStats::from_runs(&doc.runs);
        if stats.is_empty() {
            log::info!("No text runs found, emitting empty outline");
            return DocumentOutline::empty();
        }

        let candidates = filter_candidates(doc, &self.config);
        let title = extract_title(doc.metadata_title.as_deref(), &candidates, &self.config, file_stem);
        let scored = score_candidates(candidates, &stats, &title, &self.config);
        let title_source = title.source;
        let outline = assemble_outline(title.text, scored);

        log::info!(
            "Extracted {} headings from {} runs (title from {:?}: {:?})",
            outline.outline.len(),
            doc.runs.len(),
            title_source,
            outline.title
        );
        outline
    }

    /// Read and extract a PDF file.
    pub fn extract_file(&self, path: &Path) -> Result<DocumentOutline> {
        let bytes = std::fs::read(path)?;
        let stem = path.file_stem().and_then(|s| s.to_str());
        self.extract_named(&bytes, stem)
    }

    /// Extract a PDF file, turning any failure into an empty outline so every
    /// input still produces an output.
    pub fn process_file(&self, path: &Path) -> DocumentOutline {
        log::info!("Processing PDF: {}", path.display());
        match self.extract_file(path) {
            Ok(outline) => outline,
            Err(e) => {
                log::error!("Error processing {}: {}", path.display(), e);
                DocumentOutline::empty()
            }
        }
    }
}
