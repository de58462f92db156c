use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::bilateral_filter;

use crate::config::EdgeParams;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Edge-preserving smoothing over a `window_size` x `window_size` neighbourhood
pub fn apply_bilateral(img: &GrayImage, window_size: u32, sigma_color: f32, sigma_spatial: f32) -> GrayImage {
    bilateral_filter(img, window_size, sigma_color, sigma_spatial)
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Turn a color image into a binary edge map of the same size
pub fn extract_edges(img: &DynamicImage, params: &EdgeParams) -> GrayImage {
    let gray = to_grayscale(img);
    let smoothed = apply_bilateral(&gray, params.bilateral_window_size, params.sigma_color, params.sigma_spatial);
    detect_edges(&smoothed, params.low_threshold, params.high_threshold)
}

/// Scale to the given width, keeping the aspect ratio.
/// Images already at that width are returned untouched.
pub fn resize_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
    if img.width() == width || img.width() == 0 {
        return img.clone();
    }

    let scale = width as f64 / img.width() as f64;
    let height = ((img.height() as f64 * scale) as u32).max(1);
    img.resize_exact(width, height, FilterType::Triangle)
}
