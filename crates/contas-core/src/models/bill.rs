//! Bill extraction output, as handed to the persistence layer.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::extraction::rules::{BillType, Biller};

pub use crate::extraction::rules::Candidate;

/// Structured fields recovered from a bill.
///
/// Every field is optional; absence means no plausible candidate was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedData {
    /// Amount to pay, within the configured sanity bounds.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub value: Option<Decimal>,

    /// Due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Boleto payment line, 44 to 48 digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    /// PIX copy-paste payload read from a QR code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pix_code: Option<String>,

    /// Biller company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Biller>,
}

impl DetectedData {
    /// Names of the required fields that were not found.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.value.is_none() {
            missing.push("value");
        }
        if self.due_date.is_none() {
            missing.push("dueDate");
        }
        missing
    }

    /// Whether any payment instrument (boleto line or PIX code) was found.
    pub fn has_payment_code(&self) -> bool {
        self.barcode.is_some() || self.pix_code.is_some()
    }
}

/// Result of extracting one bill image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Raw OCR text.
    pub full_text: String,

    /// Confidence reported by the OCR backend (0 - 100).
    pub confidence: f32,

    /// Non-blank lines of `full_text`.
    pub lines: Vec<String>,

    /// Extracted fields.
    pub detected_data: DetectedData,

    /// Bill category inferred from `full_text`.
    pub bill_type: BillType,
}

impl ExtractionResult {
    pub fn new(
        full_text: impl Into<String>,
        confidence: f32,
        detected_data: DetectedData,
        bill_type: BillType,
    ) -> Self {
        let full_text = full_text.into();
        let lines = non_blank_lines(&full_text);
        Self {
            full_text,
            confidence,
            lines,
            detected_data,
            bill_type,
        }
    }
}

/// Split text into lines, dropping the blank ones.
pub fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

const MONTHS_PT: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Build a display title such as "Conta de Luz - Março".
///
/// The month comes from the due date when known, otherwise from `today`.
pub fn suggest_title(bill_type: BillType, due_date: Option<NaiveDate>, today: NaiveDate) -> String {
    let month = due_date.unwrap_or(today).month0() as usize;
    format!("{} - {}", bill_type.display_name(), MONTHS_PT[month])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_lines_skip_blank() {
        let result = ExtractionResult::new(
            "CPFL Paulista\n\n   \nTotal a pagar R$ 150,00\r\nVencimento 15/03/2025\n",
            87.5,
            DetectedData::default(),
            BillType::Other,
        );
        assert_eq!(
            result.lines,
            vec![
                "CPFL Paulista".to_string(),
                "Total a pagar R$ 150,00".to_string(),
                "Vencimento 15/03/2025".to_string(),
            ]
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let data = DetectedData {
            value: Some(Decimal::from_str("150.00").unwrap()),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 1);
        assert_eq!(obj["value"].as_f64(), Some(150.0));
        assert!(!obj.contains_key("dueDate"));
        assert!(!obj.contains_key("pixCode"));
    }

    #[test]
    fn test_result_json_shape() {
        let data = DetectedData {
            due_date: NaiveDate::from_ymd_opt(2025, 3, 15),
            company: Some(Biller::Cpfl),
            ..Default::default()
        };
        let result = ExtractionResult::new("CPFL", 90.0, data, BillType::Electricity);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["fullText"], "CPFL");
        assert_eq!(json["detectedData"]["dueDate"], "2025-03-15");
        assert_eq!(json["detectedData"]["company"], "CPFL");
        assert_eq!(json["billType"], "ELECTRICITY");
    }

    #[test]
    fn test_missing_required() {
        let mut data = DetectedData::default();
        assert_eq!(data.missing_required(), vec!["value", "dueDate"]);

        data.due_date = NaiveDate::from_ymd_opt(2025, 3, 15);
        assert_eq!(data.missing_required(), vec!["value"]);
        assert!(!data.has_payment_code());

        data.pix_code = Some("00020126".to_string());
        assert!(data.has_payment_code());
    }

    #[test]
    fn test_suggest_title() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();

        assert_eq!(
            suggest_title(BillType::Electricity, NaiveDate::from_ymd_opt(2025, 3, 15), today),
            "Conta de Luz - Março"
        );
        assert_eq!(suggest_title(BillType::Other, None, today), "Conta - Fevereiro");
    }
}
