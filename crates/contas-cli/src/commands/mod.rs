//! Subcommand implementations and the output formatting they share.

pub mod batch;
pub mod config;
pub mod parse;
pub mod process;
pub mod reminders;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use contas_core::extraction::rules::amounts::format_brl;
use contas_core::extraction::rules::barcode::format_payment_line;
use contas_core::models::bill::suggest_title;
use contas_core::{ContasConfig, ExtractionResult};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contas")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ContasConfig> {
    let config = match config_path {
        Some(path) => ContasConfig::from_file(Path::new(path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                ContasConfig::from_file(&path)?
            } else {
                ContasConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    today: NaiveDate,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result, today)),
    }
}

const CSV_HEADER: [&str; 8] = [
    "company",
    "bill_type",
    "value",
    "due_date",
    "barcode",
    "pix_code",
    "confidence",
    "missing",
];

fn csv_record(result: &ExtractionResult) -> [String; 8] {
    let data = &result.detected_data;
    [
        data.company.map(|c| c.to_string()).unwrap_or_default(),
        result.bill_type.to_string(),
        data.value.map(|v| v.to_string()).unwrap_or_default(),
        data.due_date.map(|d| d.to_string()).unwrap_or_default(),
        data.barcode.clone().unwrap_or_default(),
        data.pix_code.clone().unwrap_or_default(),
        format!("{:.1}", result.confidence),
        data.missing_required().join(";"),
    ]
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_record(result))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult, today: NaiveDate) -> String {
    let data = &result.detected_data;
    let mut output = String::new();

    output.push_str(&format!("{}\n\n", suggest_title(result.bill_type, data.due_date, today)));

    output.push_str(&format!(
        "Company:    {}\n",
        data.company.map(|c| c.to_string()).unwrap_or_else(|| "-".into())
    ));
    output.push_str(&format!("Type:       {}\n", result.bill_type));
    output.push_str(&format!(
        "Value:      {}\n",
        data.value.map(format_brl).unwrap_or_else(|| "-".into())
    ));
    output.push_str(&format!(
        "Due date:   {}\n",
        data.due_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".into())
    ));
    if let Some(barcode) = &data.barcode {
        output.push_str(&format!("Barcode:    {}\n", format_payment_line(barcode)));
    }
    if let Some(pix) = &data.pix_code {
        output.push_str(&format!("PIX:        {}\n", pix));
    }
    if !data.has_payment_code() {
        output.push_str("Payment:    no boleto line or PIX code found\n");
    }
    output.push_str(&format!("Confidence: {:.1}%\n", result.confidence));

    let missing = data.missing_required();
    if !missing.is_empty() {
        output.push_str(&format!("\nNeeds review, missing: {}\n", missing.join(", ")));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use contas_core::BillTextParser;

    fn sample() -> ExtractionResult {
        BillTextParser::new()
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
            .parse_result("CPFL Paulista\nTotal a pagar R$ 1.150,00\nVencimento: 15/03/2025\n", 90.0)
    }

    #[test]
    fn test_text_output() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let text = format_result(&sample(), OutputFormat::Text, today).unwrap();

        assert!(text.starts_with("Conta de Luz - Março\n"));
        assert!(text.contains("Company:    CPFL"));
        assert!(text.contains("Value:      R$ 1.150,00"));
        assert!(text.contains("Due date:   15/03/2025"));
        assert!(!text.contains("Needs review"));
        assert!(text.contains("Payment:    no boleto line or PIX code found"));
    }

    #[test]
    fn test_text_output_with_payment_line() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let result = BillTextParser::new().with_reference_date(today).parse_result(
            "SABESP\nValor Total: R$ 87,43\nVencimento: 10/03/2025\n\
             82690000000-8 87430097010-1 00000012345-6 67890123450-0",
            90.0,
        );
        let text = format_result(&result, OutputFormat::Text, today).unwrap();

        assert!(text.contains("Barcode:    826900000008874300970101000000123456678901234500"));
        assert!(!text.contains("Payment:"));
    }

    #[test]
    fn test_csv_output() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let csv = format_result(&sample(), OutputFormat::Csv, today).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("company,bill_type,value,due_date,barcode,pix_code,confidence,missing")
        );
        assert_eq!(lines.next(), Some("CPFL,ELECTRICITY,1150.00,2025-03-15,,,90.0,"));
    }

    #[test]
    fn test_missing_fields_flagged() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let result = BillTextParser::new().parse_result("nothing useful", 10.0);
        let text = format_result(&result, OutputFormat::Text, today).unwrap();

        assert!(text.contains("Value:      -"));
        assert!(text.contains("Needs review, missing: value, dueDate"));
    }
}
