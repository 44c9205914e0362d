//! Directory batch processing: one JSON file per input PDF.

use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::outline::DocumentOutline;
use crate::pipeline::OutlineExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub processed: usize,
    /// Documents written with an empty outline because extraction failed
    pub failed: usize,
}

/// All `*.pdf` files directly inside `dir`, sorted by path.
pub fn pdf_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `<output_dir>/<stem>.json` for an input PDF.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.json", stem))
}

pub fn write_outline(path: &Path, outline: &DocumentOutline, compact: bool) -> io::Result<()> {
    let json = if compact {
        serde_json::to_string(outline)?
    } else {
        serde_json::to_string_pretty(outline)?
    };
    fs::write(path, json)
}

/// Process every input in parallel and write its JSON into `output_dir`.
pub fn run_batch(
    extractor: &OutlineExtractor,
    inputs: &[PathBuf],
    output_dir: &Path,
    compact: bool,
) -> io::Result<BatchReport> {
    let results: Vec<io::Result<bool>> = inputs
        .par_iter()
        .map(|input| {
            let (outline, ok) = match extractor.extract_file(input) {
                Ok(outline) => (outline, true),
                Err(e) => {
                    log::error!("Error processing {}: {}", input.display(), e);
                    (DocumentOutline::empty(), false)
                }
            };
            let output = output_path_for(input, output_dir);
            write_outline(&output, &outline, compact)?;
            log::info!("Saved result to: {}", output.display());
            Ok(ok)
        })
        .collect();

    let mut report = BatchReport::default();
    for result in results {
        report.processed += 1;
        if !result? {
            report.failed += 1;
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = pdf_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("in/report.v2.pdf"), Path::new("out")),
            PathBuf::from("out/report.v2.json")
        );
    }

    #[test]
    fn test_failed_documents_still_produce_output() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let broken = input_dir.path().join("broken.pdf");
        fs::write(&broken, b"not a pdf at all").unwrap();

        let report = run_batch(&OutlineExtractor::default(), &[broken], output_dir.path(), true).unwrap();
        assert_eq!(report, BatchReport { processed: 1, failed: 1 });

        let written = fs::read_to_string(output_dir.path().join("broken.json")).unwrap();
        assert_eq!(written, r#"{"title":"","outline":[]}"#);
    }
}
