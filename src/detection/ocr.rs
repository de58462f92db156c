use anyhow::Result;
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{ThresholdType, threshold};
pub use ocrs::{ImageSource, OcrEngine}; // Re-export for use in other modules
use ocrs::OcrEngineParams;
use rten::Model;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::config::OcrConfig;
use crate::error::OcrError;

/// Anything that can read text off a binarized plate crop
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, binary: &GrayImage) -> Result<String>;
}

/// Standard ocrs model directory (`~/.cache/ocrs`)
pub fn default_models_dir() -> Option<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()?;
    Some(Path::new(&home_dir).join(".cache/ocrs"))
}

/// Initialize OCR engine with models from the given directory
pub fn init_ocr_engine(models_dir: &Path, allowed_chars: &str) -> Result<OcrEngine, OcrError> {
    let detection_model_path = models_dir.join("text-detection.rten");
    let recognition_model_path = models_dir.join("text-recognition.rten");

    if !detection_model_path.exists() || !recognition_model_path.exists() {
        return Err(OcrError::ModelsNotFound {
            detection: detection_model_path,
            recognition: recognition_model_path,
        });
    }

    let load = |path: &Path| {
        Model::load_file(path).map_err(|e| OcrError::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    };
    let detection_model = load(&detection_model_path)?;
    let recognition_model = load(&recognition_model_path)?;

    OcrEngine::new(OcrEngineParams {
        detection_model: Some(detection_model),
        recognition_model: Some(recognition_model),
        allowed_chars: Some(allowed_chars.to_string()),
        ..Default::default()
    })
    .map_err(|e| OcrError::Engine(e.to_string()))
}

/// ocrs-backed recognizer. The engine is loaded on first use and kept for
/// every later call.
pub struct OcrsRecognizer {
    models_dir: PathBuf,
    allowed_chars: String,
    single_line: bool,
    engine: Mutex<Option<Arc<OcrEngine>>>,
}

impl OcrsRecognizer {
    pub fn new(models_dir: PathBuf, config: &OcrConfig) -> Self {
        Self {
            models_dir,
            allowed_chars: config.allowed_chars.clone(),
            single_line: config.single_line,
            engine: Mutex::new(None),
        }
    }

    fn engine(&self) -> Result<Arc<OcrEngine>> {
        // Clone the Arc so the lock is released before recognition runs
        let mut guard = self
            .engine
            .lock()
            .map_err(|_| anyhow::anyhow!("OCR engine lock poisoned"))?;
        if let Some(engine) = guard.as_ref() {
            return Ok(engine.clone());
        }

        info!(models_dir = %self.models_dir.display(), "initializing OCR engine");
        let engine = Arc::new(init_ocr_engine(&self.models_dir, &self.allowed_chars)?);
        *guard = Some(engine.clone());
        Ok(engine)
    }
}

impl TextRecognizer for OcrsRecognizer {
    fn recognize(&self, binary: &GrayImage) -> Result<String> {
        let engine = self.engine()?;

        let img = DynamicImage::ImageLuma8(binary.clone()).to_rgb8();
        let img_source = ImageSource::from_bytes(img.as_raw(), img.dimensions())
            .map_err(|e| OcrError::Engine(e.to_string()))?;
        let ocr_input = engine
            .prepare_input(img_source)
            .map_err(|e| OcrError::Engine(e.to_string()))?;
        let text = engine
            .get_text(&ocr_input)
            .map_err(|e| OcrError::Engine(e.to_string()))?;

        if self.single_line {
            Ok(join_lines(&text))
        } else {
            Ok(text)
        }
    }
}

/// Collapse multi-line engine output into one line
pub fn join_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Global threshold: pixels at or above `level` become white, the rest black
pub fn binarize(gray: &GrayImage, level: u8) -> GrayImage {
    // `Binary` keeps pixels strictly above the threshold
    match level.checked_sub(1) {
        Some(below) => threshold(gray, below, ThresholdType::Binary),
        None => GrayImage::from_pixel(gray.width(), gray.height(), image::Luma([255u8])),
    }
}

/// Prepare a plate crop for recognition
pub fn preprocess_plate(crop: &DynamicImage, config: &OcrConfig) -> GrayImage {
    binarize(&crop.to_luma8(), config.binary_threshold)
}

/// Read the text on a cropped plate. An empty string means the engine found
/// nothing and is not an error.
pub fn recognize_text(
    recognizer: &dyn TextRecognizer,
    crop: &DynamicImage,
    config: &OcrConfig,
) -> Result<String> {
    let binary = preprocess_plate(crop, config);
    recognize_binarized(recognizer, &binary)
}

/// Run the recognizer on an already binarized crop and trim its output
pub fn recognize_binarized(recognizer: &dyn TextRecognizer, binary: &GrayImage) -> Result<String> {
    let text = recognizer.recognize(binary)?.trim().to_string();
    debug!(chars = text.len(), "plate text recognized");
    Ok(text)
}
