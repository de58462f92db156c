pub mod preprocessing;
pub mod contours;
pub mod ocr;
pub mod steps;

use image::DynamicImage;
use std::sync::Arc;

use crate::config::DetectorConfig;
use crate::models::PlateContour;
use crate::pipeline::Pipeline;

/// Locate the plate outline in an already resized image
pub fn detect_plate(img: &DynamicImage, config: &DetectorConfig) -> Option<PlateContour> {
    let edges = preprocessing::extract_edges(img, &config.edges);
    contours::select_plate_contour(&edges, (img.width(), img.height()), &config.geometry)
}

/// Build the standard plate pipeline using the composable pipeline system
pub fn build_plate_pipeline(config: &DetectorConfig, recognizer: Arc<dyn ocr::TextRecognizer>) -> Pipeline {
    use steps::*;

    Pipeline::new()
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(BilateralFilterStep {
            window_size: config.edges.bilateral_window_size,
            sigma_color: config.edges.sigma_color,
            sigma_spatial: config.edges.sigma_spatial,
        }))
        .add_step(Arc::new(EdgeDetectionStep {
            low_threshold: config.edges.low_threshold,
            high_threshold: config.edges.high_threshold,
        }))
        .add_step(Arc::new(PlateContourStep {
            geometry: config.geometry.clone(),
        }))
        .add_step(Arc::new(OcrStep::new(recognizer, config.ocr.clone())))
}
