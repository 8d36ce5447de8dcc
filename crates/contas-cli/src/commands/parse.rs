//! Parse command - run field extraction on already recognized text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::info;

use contas_core::BillTextParser;

use super::{format_result, load_config, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file with OCR output, or "-" for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Confidence to report for the text (0-100)
    #[arg(long, default_value = "100")]
    confidence: f32,

    /// Rank due dates relative to this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    reference_date: Option<NaiveDate>,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if args.input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.input, e))?
    };

    let mut parser = BillTextParser::from_config(&config.extraction);
    if let Some(date) = args.reference_date {
        parser = parser.with_reference_date(date);
    }

    info!("Parsing {} characters of text", text.len());
    let result = parser.parse_result(&text, args.confidence);
    let output = format_result(&result, args.format, parser.reference_date())?;

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

    Ok(())
}
