//! Heading outline extraction from PDF typography.
//!
//! Derives a title and an H1–H3 outline with page numbers from font sizes,
//! boldness, section numbering and page position. No models are involved:
//! every threshold is fixed or relative to the document's own body size.
//!
//! ```no_run
//! use pdf_outline::{OutlineConfig, OutlineExtractor};
//!
//! let bytes = std::fs::read("report.pdf")?;
//! let outline = OutlineExtractor::new(OutlineConfig::default()).extract(&bytes)?;
//! println!("{}", serde_json::to_string_pretty(&outline)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod batch;
pub mod classifier;
pub mod config;
pub mod error;
pub mod filter;
pub mod font_utils;
pub mod functions;
pub mod outline;
pub mod patterns;
pub mod pipeline;
pub mod scorer;
pub mod stats;
pub mod title;

pub use classifier::{classify_level, HeadingLevel};
pub use config::OutlineConfig;
pub use error::{ExtractionError, Result};
pub use font_utils::{collect_runs, BBox, ExtractedDocument, PageGeometry, TextRun};
pub use outline::{DocumentOutline, OutlineEntry};
pub use patterns::PatternTag;
pub use pipeline::OutlineExtractor;
pub use stats::DocumentStats;

/// Extract the outline of an in-memory PDF with the given configuration.
pub fn extract_outline(bytes: &[u8], config: &OutlineConfig) -> Result<DocumentOutline> {
    OutlineExtractor::new(config.clone()).extract(bytes)
}
