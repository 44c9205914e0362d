use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use pdf_outline::batch;
use pdf_outline::{OutlineConfig, OutlineExtractor};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Extract the title and H1-H3 headings of PDF files as JSON", long_about = None)]
struct Args {
    /// Input PDF file, or a directory of PDFs
    #[arg(value_name = "INPUT", default_value = "input")]
    input: PathBuf,

    /// Output JSON file, or a directory for <name>.json files
    #[arg(value_name = "OUTPUT", default_value = "output")]
    output: PathBuf,

    /// JSON file with outline settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore pages past this number
    #[arg(long)]
    max_pages: Option<usize>,

    /// Pages scanned for a title when metadata has none
    #[arg(long)]
    title_pages: Option<usize>,

    /// Header/footer band as a fraction of page height
    #[arg(long)]
    margin_fraction: Option<f64>,

    /// Worker threads for directory input
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

fn load_config(args: &Args) -> Result<OutlineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => OutlineConfig::default(),
    };

    if let Some(pages) = args.max_pages {
        config = config.with_max_pages(pages);
    }
    if let Some(pages) = args.title_pages {
        config = config.with_title_pages(pages);
    }
    if let Some(fraction) = args.margin_fraction {
        config = config.with_margin_fraction(fraction);
    }
    Ok(config)
}

fn run_directory(extractor: &OutlineExtractor, args: &Args) -> Result<()> {
    let inputs = batch::pdf_files(&args.input)
        .with_context(|| format!("Failed to list {}", args.input.display()))?;
    if inputs.is_empty() {
        log::warn!("No PDF files found in {}", args.input.display());
        return Ok(());
    }
    log::info!("Found {} PDF files to process", inputs.len());

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let report = batch::run_batch(extractor, &inputs, &args.output, args.compact)
        .with_context(|| format!("Failed to write results to {}", args.output.display()))?;

    log::info!(
        "Processing complete: {} documents, {} failed",
        report.processed,
        report.failed
    );
    Ok(())
}

fn run_file(extractor: &OutlineExtractor, args: &Args) -> Result<()> {
    let output = if is_json_path(&args.output) {
        args.output.clone()
    } else {
        std::fs::create_dir_all(&args.output)
            .with_context(|| format!("Failed to create {}", args.output.display()))?;
        batch::output_path_for(&args.input, &args.output)
    };

    let outline = extractor.process_file(&args.input);
    batch::write_outline(&output, &outline, args.compact)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Saved result to: {}", output.display());
    Ok(())
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output.display());

    let extractor = OutlineExtractor::new(config);
    if args.input.is_dir() {
        run_directory(&extractor, &args)
    } else if args.input.is_file() {
        run_file(&extractor, &args)
    } else {
        anyhow::bail!("Input {} does not exist", args.input.display())
    }
}
