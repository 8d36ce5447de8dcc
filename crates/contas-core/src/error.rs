//! Error types for the contas-core library.

use thiserror::Error;

/// Main error type for the contas library.
#[derive(Error, Debug)]
pub enum ContasError {
    /// OCR backend error. Always fatal to an extraction.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// QR decoding error.
    #[error("QR error: {0}")]
    Qr(#[from] QrError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by an OCR backend.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No backend was attached to the extractor.
    #[error("no OCR backend configured")]
    NotConfigured,

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to QR decoding.
///
/// These never abort an extraction; the detector logs them and reports no code.
#[derive(Error, Debug)]
pub enum QrError {
    /// The bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// No QR grid was found in the image.
    #[error("no QR code found")]
    NoCode,

    /// A grid was found but its payload could not be read.
    #[error("failed to decode QR payload: {0}")]
    Decode(String),
}

/// Result type for the contas library.
pub type Result<T> = std::result::Result<T, ContasError>;
