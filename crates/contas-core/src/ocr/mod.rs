//! OCR backend contract.
//!
//! The extraction pipeline only depends on [`OcrBackend`]; the concrete
//! PaddleOCR backend lives behind the `native` feature.

#[cfg(feature = "native")]
mod onnx;

#[cfg(feature = "native")]
pub use onnx::OnnxOcrBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Text recognized from one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    /// Full recognized text, one visual line per `\n`.
    pub text: String,

    /// Overall confidence as reported by the backend, nominally 0-100.
    pub confidence: f32,
}

impl RecognizedText {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// A capability that turns image bytes into text.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Recognize text in the given encoded image using a language hint
    /// such as `"por"`.
    async fn recognize(&self, image: &[u8], language: &str) -> Result<RecognizedText, OcrError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_passes_through() {
        assert_eq!(RecognizedText::new("a", 87.5).confidence, 87.5);
        assert_eq!(RecognizedText::new("a", 140.0).confidence, 140.0);
    }
}
