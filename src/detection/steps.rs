use crate::config::{OcrConfig, PlateGeometry};
use crate::detection::{contours, ocr, preprocessing};
use crate::pipeline::{MetadataValue, PipelineData, PipelineStep};
use anyhow::Result;
use image::{DynamicImage, GenericImageView};
use std::sync::Arc;
use tracing::debug;

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>) -> Result<Vec<PipelineData>> {
        Ok(data
            .into_iter()
            .map(|item| {
                let gray = preprocessing::to_grayscale(&item.image);
                item.with_image(DynamicImage::ImageLuma8(gray))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Edge-preserving bilateral smoothing
pub struct BilateralFilterStep {
    pub window_size: u32,
    pub sigma_color: f32,
    pub sigma_spatial: f32,
}

impl PipelineStep for BilateralFilterStep {
    fn process(&self, data: Vec<PipelineData>) -> Result<Vec<PipelineData>> {
        Ok(data
            .into_iter()
            .map(|item| {
                let gray = item.image.to_luma8();
                let smoothed =
                    preprocessing::apply_bilateral(&gray, self.window_size, self.sigma_color, self.sigma_spatial);
                item.with_image(DynamicImage::ImageLuma8(smoothed))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Bilateral Filter"
    }
}

/// Detect edges using Canny
pub struct EdgeDetectionStep {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl PipelineStep for EdgeDetectionStep {
    fn process(&self, data: Vec<PipelineData>) -> Result<Vec<PipelineData>> {
        Ok(data
            .into_iter()
            .map(|item| {
                let gray = item.image.to_luma8();
                let edges = preprocessing::detect_edges(&gray, self.low_threshold, self.high_threshold);
                item.with_image(DynamicImage::ImageLuma8(edges))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Edge Detection"
    }
}

/// Select the plate outline in an edge map and crop it from the original.
/// Each input yields at most one output; inputs without a plate are dropped.
pub struct PlateContourStep {
    pub geometry: PlateGeometry,
}

impl PipelineStep for PlateContourStep {
    fn process(&self, data: Vec<PipelineData>) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let edges = item.image.to_luma8();
            let (img_width, img_height) = item.original.dimensions();

            let Some(plate) = contours::select_plate_contour(&edges, (img_width, img_height), &self.geometry)
            else {
                continue;
            };

            let Some(bbox) = plate.bbox.clamp_to(img_width, img_height) else {
                continue;
            };

            let cropped = item.original.crop_imm(bbox.x, bbox.y, bbox.width, bbox.height);

            result.push(
                PipelineData::from_region(cropped, item.original.clone(), bbox)
                    .with_metadata("vertices", MetadataValue::Int(plate.corners.len() as i64))
                    .with_metadata("contour_area", MetadataValue::Float(plate.contour_area))
                    .with_metadata("aspect_ratio", MetadataValue::Float(plate.aspect_ratio()))
                    .with_metadata("area_fraction", MetadataValue::Float(plate.area_fraction)),
            );
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Plate Contour Selection"
    }
}

/// Binarize each plate crop and read its text.
/// The output image is the binarized crop; the text goes to "plate_text".
pub struct OcrStep {
    recognizer: Arc<dyn ocr::TextRecognizer>,
    config: OcrConfig,
}

impl OcrStep {
    pub fn new(recognizer: Arc<dyn ocr::TextRecognizer>, config: OcrConfig) -> Self {
        Self { recognizer, config }
    }
}

impl PipelineStep for OcrStep {
    fn process(&self, data: Vec<PipelineData>) -> Result<Vec<PipelineData>> {
        let mut result = Vec::with_capacity(data.len());

        for item in data {
            let binary = ocr::preprocess_plate(&item.image, &self.config);
            let text = ocr::recognize_binarized(self.recognizer.as_ref(), &binary)?;
            debug!(text = %text, "OCR finished");

            result.push(
                item.with_image(DynamicImage::ImageLuma8(binary))
                    .with_metadata("plate_text", MetadataValue::String(text)),
            );
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "OCR Recognition"
    }
}
