//! Configuration structures for the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ContasError;

/// Main configuration for the contas pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContasConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Bill field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Model configuration.
    pub models: ModelConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language hint passed to the backend (ISO 639-2, e.g. "por").
    pub language: String,

    /// Decode QR codes alongside OCR to find PIX payloads.
    pub detect_qr: bool,

    /// Replace `[UNK]` tokens emitted by the recognizer with spaces.
    pub strip_unknown: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "por".to_string(),
            detect_qr: true,
            strip_unknown: true,
        }
    }
}

/// Bill field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Smallest accepted amount (inclusive).
    #[serde(with = "rust_decimal::serde::float")]
    pub min_value: Decimal,

    /// Upper bound for accepted amounts (exclusive).
    #[serde(with = "rust_decimal::serde::float")]
    pub max_value: Decimal,

    /// How many months before today a due date may lie.
    pub past_window_months: u32,

    /// How many months after today a due date may lie.
    pub future_window_months: u32,

    /// Correct common OCR confusions (`|`, `l`) before matching numbers.
    pub clean_ocr_noise: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_value: Decimal::from(5),
            max_value: Decimal::from(100_000),
            past_window_months: 2,
            future_window_months: 24,
            clean_ocr_noise: true,
        }
    }
}

/// Model file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ContasConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check settings that serde alone cannot reject.
    pub fn validate(&self) -> crate::error::Result<()> {
        let extraction = &self.extraction;
        if extraction.min_value < Decimal::ZERO {
            return Err(ContasError::Config("extraction.min_value must not be negative".into()));
        }
        if extraction.min_value >= extraction.max_value {
            return Err(ContasError::Config(format!(
                "extraction.min_value ({}) must be below extraction.max_value ({})",
                extraction.min_value, extraction.max_value
            )));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(ContasError::Config("ocr.language must not be empty".into()));
        }
        Ok(())
    }
}
