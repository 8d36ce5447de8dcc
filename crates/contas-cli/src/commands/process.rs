//! Process command - extract bill data from a single image.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use contas_core::{BillExtractor, ContasConfig, OcrBackend, OcrError, OnnxOcrBackend, RecognizedText};

use super::{format_result, load_config, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input bill image
    #[arg(required = true)]
    input: PathBuf,

    /// Use text from this file instead of running OCR on the image
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Rank due dates relative to this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    reference_date: Option<NaiveDate>,
}

/// OCR backend that serves text recognized elsewhere.
pub struct TextFileBackend {
    text: String,
}

impl TextFileBackend {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self { text })
    }
}

#[async_trait]
impl OcrBackend for TextFileBackend {
    async fn recognize(&self, _image: &[u8], _language: &str) -> Result<RecognizedText, OcrError> {
        Ok(RecognizedText::new(self.text.clone(), 100.0))
    }

    fn name(&self) -> &str {
        "text-file"
    }
}

/// Build the OCR backend from the model directory in the configuration.
pub fn native_backend(config: &ContasConfig) -> anyhow::Result<Arc<dyn OcrBackend>> {
    let backend = OnnxOcrBackend::from_config(config).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load OCR models from {}: {}",
            config.models.model_dir.display(),
            e
        )
    })?;
    Ok(Arc::new(backend))
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(dir) = &args.model_dir {
        config.models.model_dir = dir.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());
    let image = fs::read(&args.input)?;

    let backend: Arc<dyn OcrBackend> = match &args.text_file {
        Some(path) => Arc::new(TextFileBackend::from_file(path)?),
        None => native_backend(&config)?,
    };

    let mut builder = BillExtractor::builder()
        .with_config(&config)
        .with_backend(backend);
    if let Some(date) = args.reference_date {
        builder = builder.with_reference_date(date);
    }
    let extractor = builder.build();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("Extracting bill data...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = extractor.extract(&image).await;
    pb.finish_and_clear();
    let result = result?;

    debug!("Extracted {} lines", result.lines.len());

    let today = extractor.parser().reference_date();
    let output = format_result(&result, args.format, today)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    let missing = result.detected_data.missing_required();
    if !missing.is_empty() {
        eprintln!(
            "{} Needs review, missing: {}",
            style("⚠").yellow(),
            missing.join(", ")
        );
    }

    info!("Done in {}ms", start.elapsed().as_millis());

    Ok(())
}
