//! Core library for Brazilian utility bill OCR processing.
//!
//! This crate provides:
//! - OCR backend contract and a pure-Rust PaddleOCR backend
//! - Bill field extraction (amount, due date, boleto payment line, biller)
//! - PIX copy-paste code detection from QR codes
//! - Bill category classification and reminder planning

pub mod error;
pub mod extraction;
pub mod models;
pub mod ocr;
pub mod qr;
pub mod reminders;

pub use error::{ContasError, OcrError, QrError, Result};
pub use extraction::rules::{Biller, BillType};
pub use extraction::{BillExtractor, BillExtractorBuilder, BillTextParser};
pub use models::bill::{Candidate, DetectedData, ExtractionResult};
pub use models::config::ContasConfig;
pub use ocr::{OcrBackend, RecognizedText};
#[cfg(feature = "native")]
pub use ocr::OnnxOcrBackend;
pub use reminders::{plan_reminders, Reminder, ReminderKind};

#[cfg(test)]
pub(crate) mod test_support;
