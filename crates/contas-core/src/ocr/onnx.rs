//! PaddleOCR backend using `pure-onnx-ocr`.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use image::GenericImageView;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::{ContasConfig, ModelConfig, OcrConfig};

use super::{OcrBackend, RecognizedText};

/// Vertical bucket size in pixels used to group regions into rows.
const ROW_HEIGHT: f64 = 20.0;

const UNKNOWN_TOKEN: &str = "[UNK]";

/// OCR backend backed by `pure-onnx-ocr` (no external ONNX Runtime).
pub struct OnnxOcrBackend {
    engine: Arc<pure_onnx_ocr::engine::OcrEngine>,
    config: OcrConfig,
}

/// A recognized region reduced to its top-left corner.
struct Region {
    x: f64,
    y: f64,
    text: String,
    confidence: f32,
}

impl OnnxOcrBackend {
    /// Load detection, recognition and dictionary files from a directory.
    pub fn from_dir(
        model_dir: &Path,
        models: &ModelConfig,
        config: OcrConfig,
    ) -> Result<Self, OcrError> {
        let det_path = model_dir.join(&models.detection_model);
        let rec_path = model_dir.join(&models.recognition_model);
        let dict_path = model_dir.join(&models.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self {
            engine: Arc::new(engine),
            config,
        })
    }

    /// Load using the model directory and OCR settings from configuration.
    pub fn from_config(config: &ContasConfig) -> Result<Self, OcrError> {
        Self::from_dir(&config.models.model_dir, &config.models, config.ocr.clone())
    }
}

#[async_trait]
impl OcrBackend for OnnxOcrBackend {
    async fn recognize(&self, image: &[u8], language: &str) -> Result<RecognizedText, OcrError> {
        let image = image::load_from_memory(image)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        if language != self.config.language {
            debug!(
                "Language hint '{}' ignored, recognition model is fixed ({})",
                language, self.config.language
            );
        }

        let engine = Arc::clone(&self.engine);
        let strip_unknown = self.config.strip_unknown;

        tokio::task::spawn_blocking(move || run_engine(&engine, &image, strip_unknown))
            .await
            .map_err(|e| OcrError::Recognition(format!("OCR task failed: {}", e)))?
    }

    fn name(&self) -> &str {
        "pure-onnx-ocr"
    }
}

fn run_engine(
    engine: &pure_onnx_ocr::engine::OcrEngine,
    image: &image::DynamicImage,
    strip_unknown: bool,
) -> Result<RecognizedText, OcrError> {
    let start = Instant::now();
    let (width, height) = image.dimensions();
    info!("Processing image: {}x{}", width, height);

    let results = engine
        .run_from_image(image)
        .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

    debug!("pure-onnx-ocr returned {} text regions", results.len());

    let regions: Vec<Region> = results
        .iter()
        .map(|r| {
            let (x, y) = top_left(&r.bounding_box);
            let text = if strip_unknown {
                r.text.replace(UNKNOWN_TOKEN, " ")
            } else {
                r.text.clone()
            };
            Region {
                x,
                y,
                text,
                confidence: r.confidence,
            }
        })
        .collect();

    let recognized = assemble(regions);

    info!(
        "OCR complete: {} characters in {}ms",
        recognized.text.len(),
        start.elapsed().as_millis()
    );

    Ok(recognized)
}

/// Join regions in reading order and average their confidence.
fn assemble(mut regions: Vec<Region>) -> RecognizedText {
    regions.sort_by(|a, b| {
        let row_a = (a.y / ROW_HEIGHT) as i64;
        let row_b = (b.y / ROW_HEIGHT) as i64;
        row_a.cmp(&row_b).then(a.x.total_cmp(&b.x))
    });

    let confidence = if regions.is_empty() {
        0.0
    } else {
        regions.iter().map(|r| r.confidence).sum::<f32>() / regions.len() as f32 * 100.0
    };

    let text = regions
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    RecognizedText::new(text, confidence)
}

fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f64, f64) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f64::INFINITY, f64::INFINITY), |(x, y), c| (x.min(c.x), y.min(c.y)))
}
