//! Batch processing command for multiple bill images.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use contas_core::{BillExtractor, ExtractionResult};

use super::process::native_backend;
use super::{format_result, load_config, OutputFormat};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "tiff", "tif", "bmp"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching bill images
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of images processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(dir) = &args.model_dir {
        config.models.model_dir = dir.clone();
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_image(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let extractor = Arc::new(
        BillExtractor::builder()
            .with_config(&config)
            .with_backend(native_backend(&config)?)
            .build(),
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for chunk in files.chunks(args.jobs.max(1)) {
        let mut tasks = JoinSet::new();
        for (offset, path) in chunk.iter().enumerate() {
            let extractor = Arc::clone(&extractor);
            let path = path.clone();
            tasks.spawn(async move {
                let file_start = Instant::now();
                let outcome = match tokio::fs::read(&path).await {
                    Ok(bytes) => extractor.extract(&bytes).await.map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                (offset, path, outcome, file_start.elapsed().as_millis() as u64)
            });
        }

        let mut chunk_results = Vec::with_capacity(chunk.len());
        while let Some(joined) = tasks.join_next().await {
            let (offset, path, outcome, processing_time_ms) = joined?;
            pb.inc(1);

            match outcome {
                Ok(result) => chunk_results.push((
                    offset,
                    ProcessResult {
                        path,
                        result: Some(result),
                        error: None,
                        processing_time_ms,
                    },
                )),
                Err(error_msg) if args.continue_on_error => {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    chunk_results.push((
                        offset,
                        ProcessResult {
                            path,
                            result: None,
                            error: Some(error_msg),
                            processing_time_ms,
                        },
                    ));
                }
                Err(error_msg) => {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        chunk_results.sort_by_key(|(offset, _)| *offset);
        results.extend(chunk_results.into_iter().map(|(_, r)| r));
    }

    pb.finish_with_message("Complete");

    let today = extractor.parser().reference_date();
    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for processed in &successful {
        if let (Some(result), Some(output_dir)) = (&processed.result, &args.output_dir) {
            let output_name = processed
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("bill");

            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));
            fs::write(&output_path, format_result(result, args.format, today)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let needs_review = successful
        .iter()
        .filter(|r| {
            r.result
                .as_ref()
                .is_some_and(|res| !res.detected_data.missing_required().is_empty())
        })
        .count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful ({} need review), {} failed",
        style(successful.len()).green(),
        style(needs_review).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for processed in &failed {
            println!(
                "  - {}: {}",
                processed.path.display(),
                processed.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "company",
        "bill_type",
        "value",
        "due_date",
        "barcode",
        "pix_code",
        "confidence",
        "processing_time_ms",
        "error",
    ])?;

    for processed in results {
        let filename = processed
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(result) = &processed.result {
            let data = &result.detected_data;
            wtr.write_record([
                filename,
                "success",
                &data.company.map(|c| c.to_string()).unwrap_or_default(),
                result.bill_type.as_str(),
                &data.value.map(|v| v.to_string()).unwrap_or_default(),
                &data.due_date.map(|d| d.to_string()).unwrap_or_default(),
                data.barcode.as_deref().unwrap_or(""),
                data.pix_code.as_deref().unwrap_or(""),
                &format!("{:.1}", result.confidence),
                &processed.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &processed.processing_time_ms.to_string(),
                processed.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
