//! Error types for outline extraction.

use std::io;
use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Failures of the run collector. Everything after extraction is infallible.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O error when reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes could not be parsed as a PDF.
    #[error("PDF parsing error: {0}")]
    Parse(String),

    /// The document is encrypted and no text could be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Text extraction failed in the fallback extractor.
    #[error("Text extraction error: {0}")]
    TextExtract(String),
}

impl From<lopdf::Error> for ExtractionError {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => ExtractionError::Io(e),
            _ => ExtractionError::Parse(err.to_string()),
        }
    }
}

impl From<pdf_extract::OutputError> for ExtractionError {
    fn from(err: pdf_extract::OutputError) -> Self {
        ExtractionError::TextExtract(err.to_string())
    }
}
