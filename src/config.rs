//! Fixed detection thresholds and the parameter structs built from them.
//!
//! The values were tuned empirically for vehicle photos normalized to a
//! 600 pixel width. Changing any of them changes which plate gets picked.

/// Width every input image is resized to before detection
pub const TARGET_WIDTH: u32 = 600;

/// Bilateral filter window side in pixels
pub const BILATERAL_WINDOW_SIZE: u32 = 11;
pub const BILATERAL_SIGMA_COLOR: f32 = 17.0;
pub const BILATERAL_SIGMA_SPATIAL: f32 = 17.0;

/// Canny hysteresis thresholds
pub const CANNY_LOW_THRESHOLD: f32 = 30.0;
pub const CANNY_HIGH_THRESHOLD: f32 = 200.0;

/// Polygon approximation tolerance as a fraction of the contour perimeter
pub const POLYGON_EPSILON_RATIO: f64 = 0.018;

/// Exclusive bounds on bounding box width / height
pub const MIN_ASPECT_RATIO: f64 = 2.0;
pub const MAX_ASPECT_RATIO: f64 = 6.0;

/// Exclusive bounds on bounding box area / image area
pub const MIN_AREA_FRACTION: f64 = 0.01;
pub const MAX_AREA_FRACTION: f64 = 0.15;

/// Gray level at or above which a plate pixel becomes white
pub const BINARY_THRESHOLD: u8 = 150;

/// Characters the OCR engine may emit
pub const PLATE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Parameters of the edge extraction stage
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeParams {
    pub bilateral_window_size: u32,
    pub sigma_color: f32,
    pub sigma_spatial: f32,
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            bilateral_window_size: BILATERAL_WINDOW_SIZE,
            sigma_color: BILATERAL_SIGMA_COLOR,
            sigma_spatial: BILATERAL_SIGMA_SPATIAL,
            low_threshold: CANNY_LOW_THRESHOLD,
            high_threshold: CANNY_HIGH_THRESHOLD,
        }
    }
}

/// Geometric acceptance rules for a plate candidate
#[derive(Debug, Clone, PartialEq)]
pub struct PlateGeometry {
    pub epsilon_ratio: f64,
    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
    pub min_area_fraction: f64,
    pub max_area_fraction: f64,
}

impl Default for PlateGeometry {
    fn default() -> Self {
        Self {
            epsilon_ratio: POLYGON_EPSILON_RATIO,
            min_aspect_ratio: MIN_ASPECT_RATIO,
            max_aspect_ratio: MAX_ASPECT_RATIO,
            min_area_fraction: MIN_AREA_FRACTION,
            max_area_fraction: MAX_AREA_FRACTION,
        }
    }
}

/// OCR stage settings
#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfig {
    pub binary_threshold: u8,
    pub allowed_chars: String,
    /// Treat the crop as one line of text
    pub single_line: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary_threshold: BINARY_THRESHOLD,
            allowed_chars: PLATE_ALPHABET.to_string(),
            single_line: true,
        }
    }
}

/// Everything the plate pipeline needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorConfig {
    pub edges: EdgeParams,
    pub geometry: PlateGeometry,
    pub ocr: OcrConfig,
}
