use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use platescan::BoundingBox;
use platescan::detection::ocr::TextRecognizer;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const FRAME_WIDTH: u32 = 600;
pub const FRAME_HEIGHT: u32 = 400;

/// A 240x80 box (aspect 3.0, 8% of a 600x400 frame)
pub const PLATE_RECT: (i32, i32, u32, u32) = (180, 160, 240, 80);

fn rect((x, y, w, h): (i32, i32, u32, u32)) -> Rect {
    Rect::at(x, y).of_size(w, h)
}

/// Binary map with solid white rectangles on black
pub fn edge_map_with_blocks(blocks: &[(i32, i32, u32, u32)]) -> GrayImage {
    let mut map = GrayImage::new(FRAME_WIDTH, FRAME_HEIGHT);
    for block in blocks {
        draw_filled_rect_mut(&mut map, rect(*block), Luma([255u8]));
    }
    map
}

/// Outline a rectangle (1 px) on an existing binary map
pub fn outline(map: &mut GrayImage, area: (i32, i32, u32, u32)) {
    draw_hollow_rect_mut(map, rect(area), Luma([255u8]));
}

/// Dark frame with one bright plate-shaped block
pub fn plate_photo(area: (i32, i32, u32, u32)) -> RgbImage {
    let mut img = RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Rgb([40u8, 40, 40]));
    draw_filled_rect_mut(&mut img, rect(area), Rgb([220u8, 220, 220]));
    img
}

/// Featureless frame
pub fn blank_photo() -> RgbImage {
    RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Rgb([128u8, 128, 128]))
}

pub fn save_png(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}

/// Recognizer that returns canned text and remembers what it was given
pub struct StubRecognizer {
    text: String,
    calls: AtomicUsize,
    last_input: Mutex<Option<GrayImage>>,
}

impl StubRecognizer {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<GrayImage> {
        self.last_input.lock().unwrap().clone()
    }
}

impl TextRecognizer for StubRecognizer {
    fn recognize(&self, binary: &GrayImage) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(binary.clone());
        Ok(self.text.clone())
    }
}

/// Assert two boxes agree within `tolerance` pixels on every field
pub fn assert_bbox_near(actual: &BoundingBox, expected: (i32, i32, u32, u32), tolerance: i64) {
    let (x, y, w, h) = expected;
    let close = |a: i64, b: i64| (a - b).abs() <= tolerance;
    assert!(
        close(actual.x as i64, x as i64)
            && close(actual.y as i64, y as i64)
            && close(actual.width as i64, w as i64)
            && close(actual.height as i64, h as i64),
        "bbox {:?} not within {} px of {:?}",
        actual,
        tolerance,
        expected
    );
}
