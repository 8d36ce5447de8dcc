//! Image-side orchestration: OCR and QR detection joined into one result.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{OcrError, Result};
use crate::models::bill::ExtractionResult;
use crate::models::config::ContasConfig;
use crate::ocr::OcrBackend;
use crate::qr;

use super::parser::BillTextParser;

/// Extracts a structured bill from image bytes.
///
/// OCR and QR decoding run concurrently on the same bytes and are joined
/// before fields are assembled. Only an OCR failure is fatal; a missing or
/// unreadable QR code just leaves `pix_code` empty.
#[derive(Clone)]
pub struct BillExtractor {
    backend: Option<Arc<dyn OcrBackend>>,
    parser: BillTextParser,
    language: String,
    detect_qr: bool,
}

impl BillExtractor {
    /// Create a new builder.
    pub fn builder() -> BillExtractorBuilder {
        BillExtractorBuilder::new()
    }

    /// Name of the attached OCR backend, if any.
    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    /// The text parser used after OCR.
    pub fn parser(&self) -> &BillTextParser {
        &self.parser
    }

    /// Run OCR and QR detection on an image and extract bill fields.
    pub async fn extract(&self, image: &[u8]) -> Result<ExtractionResult> {
        let start = Instant::now();
        let backend = self.backend.as_ref().ok_or(OcrError::NotConfigured)?;

        info!(
            "Extracting bill from {:.2} KB image with {} backend",
            image.len() as f64 / 1024.0,
            backend.name()
        );

        let (recognized, pix_code) = tokio::join!(
            backend.recognize(image, &self.language),
            self.detect_pix(image),
        );
        let recognized = recognized?;

        debug!(
            "OCR returned {} characters with confidence {:.1}",
            recognized.text.len(),
            recognized.confidence
        );

        let mut result = self
            .parser
            .parse_result(&recognized.text, recognized.confidence);
        result.detected_data.pix_code = pix_code;

        info!(
            "Extraction complete in {}ms (pix code: {})",
            start.elapsed().as_millis(),
            if result.detected_data.pix_code.is_some() { "yes" } else { "no" }
        );

        Ok(result)
    }

    /// Extract bill fields from already recognized text. No QR detection.
    pub fn extract_from_text(&self, text: &str, confidence: f32) -> ExtractionResult {
        self.parser.parse_result(text, confidence)
    }

    async fn detect_pix(&self, image: &[u8]) -> Option<String> {
        if !self.detect_qr {
            return None;
        }

        let bytes = image.to_vec();
        match tokio::task::spawn_blocking(move || qr::detect_payment_qr(&bytes)).await {
            Ok(code) => code,
            Err(e) => {
                warn!("QR detection task failed: {}", e);
                None
            }
        }
    }
}

/// Builder for [`BillExtractor`].
pub struct BillExtractorBuilder {
    backend: Option<Arc<dyn OcrBackend>>,
    parser: BillTextParser,
    language: String,
    detect_qr: bool,
}

impl BillExtractorBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            parser: BillTextParser::new(),
            language: "por".to_string(),
            detect_qr: true,
        }
    }

    /// Apply OCR and extraction settings from configuration.
    pub fn with_config(mut self, config: &ContasConfig) -> Self {
        self.parser = BillTextParser::from_config(&config.extraction);
        self.language = config.ocr.language.clone();
        self.detect_qr = config.ocr.detect_qr;
        self
    }

    /// Attach an OCR backend.
    pub fn with_backend(mut self, backend: Arc<dyn OcrBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the language hint passed to the backend.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Enable or disable QR detection.
    pub fn with_qr_detection(mut self, enabled: bool) -> Self {
        self.detect_qr = enabled;
        self
    }

    /// Pin the reference date used to rank due dates.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.parser = self.parser.with_reference_date(date);
        self
    }

    pub fn build(self) -> BillExtractor {
        BillExtractor {
            backend: self.backend,
            parser: self.parser,
            language: self.language,
            detect_qr: self.detect_qr,
        }
    }
}

impl Default for BillExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
