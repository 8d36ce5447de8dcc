//! Text-side orchestration: OCR text in, detected fields out.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::time::Instant;
use tracing::{debug, info};

use crate::models::bill::{DetectedData, ExtractionResult};
use crate::models::config::ExtractionConfig;

use super::rules::{
    classify, identify_company, AmountExtractor, BarcodeExtractor, BillType, DateWindow,
    DueDateExtractor, FieldExtractor,
};

/// Runs every field extractor over recognized bill text.
///
/// Stateless between calls; the reference date for due date ranking is
/// today's local date unless pinned with [`BillTextParser::with_reference_date`].
#[derive(Debug, Clone)]
pub struct BillTextParser {
    min_value: Decimal,
    max_value: Decimal,
    past_window_months: u32,
    future_window_months: u32,
    clean_noise: bool,
    reference_date: Option<NaiveDate>,
}

impl BillTextParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            min_value: config.min_value,
            max_value: config.max_value,
            past_window_months: config.past_window_months,
            future_window_months: config.future_window_months,
            clean_noise: config.clean_ocr_noise,
            reference_date: None,
        }
    }

    /// Pin the date that due dates are ranked against.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Date used as "today" for the next extraction.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn amount_extractor(&self) -> AmountExtractor {
        AmountExtractor::new()
            .with_bounds(self.min_value, self.max_value)
            .with_noise_cleanup(self.clean_noise)
    }

    fn date_extractor(&self) -> DueDateExtractor {
        let window = DateWindow::new(
            self.reference_date(),
            self.past_window_months,
            self.future_window_months,
        );
        DueDateExtractor::new(window).with_noise_cleanup(self.clean_noise)
    }

    /// Extract value, due date, barcode and company from text.
    ///
    /// `pix_code` is left empty; it comes from the QR detector.
    pub fn parse(&self, text: &str) -> DetectedData {
        let value = self.amount_extractor().extract(text);
        let due_date = self.date_extractor().extract(text);
        let barcode = BarcodeExtractor::new().extract(text);
        let company = identify_company(text);

        if let Some(ref c) = value {
            debug!("Value {} from tier {} ({:?})", c.value, c.tier, c.raw_match);
        }
        if let Some(ref c) = due_date {
            debug!(
                "Due date {} from tier {} with priority {:.2}",
                c.value, c.tier, c.priority
            );
        }

        DetectedData {
            value: value.map(|c| c.value),
            due_date: due_date.map(|c| c.value),
            barcode: barcode.map(|c| c.value),
            pix_code: None,
            company,
        }
    }

    /// Classify the bill category.
    pub fn classify(&self, text: &str) -> BillType {
        classify(text)
    }

    /// Build a full extraction result from recognized text.
    pub fn parse_result(&self, text: &str, confidence: f32) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing bill from {} characters of text", text.len());

        let detected = self.parse(text);
        let bill_type = self.classify(text);

        info!(
            "Parsed bill in {}ms: type={}, value={}, due={}, company={}",
            start.elapsed().as_millis(),
            bill_type,
            detected.value.map(|v| v.to_string()).unwrap_or_else(|| "-".into()),
            detected.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            detected.company.map(|c| c.tag()).unwrap_or("-"),
        );

        ExtractionResult::new(text, confidence, detected, bill_type)
    }
}

impl Default for BillTextParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::rules::Biller;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn parser() -> BillTextParser {
        BillTextParser::new().with_reference_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
    }

    #[test]
    fn test_total_and_due_date() {
        let text = "CPFL Paulista\nTotal a pagar R$ 150,00\nVencimento: 15/03/2025\n";
        let data = parser().parse(text);

        assert_eq!(data.value, Some(Decimal::from_str("150.00").unwrap()));
        assert_eq!(data.due_date, NaiveDate::from_ymd_opt(2025, 3, 15));
    }

    #[test]
    fn test_two_amounts_without_keyword() {
        let text = "Mensalidade R$ 45,00\nPlano anual R$ 450,00";
        let data = parser().parse(text);

        assert_eq!(data.value, Some(Decimal::from_str("450.00").unwrap()));
    }

    #[test]
    fn test_company_and_type() {
        let text = "CPFL ENERGIA\nConsumo do mes 230 kWh";
        let result = parser().parse_result(text, 91.0);

        assert_eq!(result.detected_data.company, Some(Biller::Cpfl));
        assert_eq!(result.bill_type, BillType::Electricity);
        assert_eq!(result.confidence, 91.0);
        assert_eq!(result.lines.len(), 2);
    }

    #[test]
    fn test_full_water_bill() {
        let text = "\
SABESP - Companhia de Saneamento Basico
Fornecimento 03/2025   Consumo 12 m3
Data de Emissão: 20/02/2025
Vencimento: 10/03/2025
Valor Total: R$ 87,43
82690000000-8 87430097010-1 00000012345-6 67890123450-0
";
        let data = parser().parse(text);

        assert_eq!(data.value, Some(Decimal::from_str("87.43").unwrap()));
        assert_eq!(data.due_date, NaiveDate::from_ymd_opt(2025, 3, 10));
        assert_eq!(data.company, Some(Biller::Sabesp));
        assert_eq!(data.barcode.as_deref().map(str::len), Some(48));
        assert_eq!(parser().classify(text), BillType::Water);
    }

    #[test]
    fn test_empty_text_yields_absent_fields() {
        let result = parser().parse_result("", 0.0);

        assert_eq!(result.detected_data, DetectedData::default());
        assert_eq!(result.bill_type, BillType::Other);
        assert!(result.lines.is_empty());
    }

    #[test]
    fn test_configured_bounds() {
        let config = ExtractionConfig {
            min_value: Decimal::from(10),
            ..Default::default()
        };
        let parser = BillTextParser::from_config(&config)
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());

        assert_eq!(parser.parse("Total R$ 9,90").value, None);
    }

    #[test]
    fn test_repeated_runs_agree() {
        let text = "Total a pagar R$ 150,00\nR$ 20,00\nVenc. 15/03/2025\n01/03/2025";
        let first = parser().parse(text);
        for _ in 0..20 {
            assert_eq!(parser().parse(text), first);
        }
    }
}
