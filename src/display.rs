//! Presenting annotated results.
//!
//! A [`Viewer`] is opened once per batch and dropped when the batch ends,
//! whatever happened to the individual files in between.

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::BatchError;
use crate::models::BoundingBox;

const PLATE_BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// How detected plates are shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayMode {
    /// Blocking window per plate, closed by the user
    Window,
    /// Write `<stem>_plate.png` files into the directory
    SaveTo(PathBuf),
    Off,
}

impl DisplayMode {
    /// Window when built with the `display` feature, otherwise nothing
    pub fn platform_default() -> Self {
        if cfg!(feature = "display") {
            DisplayMode::Window
        } else {
            DisplayMode::Off
        }
    }
}

pub struct Viewer {
    mode: DisplayMode,
    presented: usize,
}

impl Viewer {
    pub fn open(mode: &DisplayMode) -> Result<Self, BatchError> {
        match mode {
            DisplayMode::Window if !cfg!(feature = "display") => {
                return Err(BatchError::Display(
                    "built without the `display` feature; use --display save or off".to_string(),
                ));
            }
            DisplayMode::SaveTo(dir) => std::fs::create_dir_all(dir)?,
            _ => {}
        }

        debug!(?mode, "viewer opened");
        Ok(Self {
            mode: mode.clone(),
            presented: 0,
        })
    }

    pub fn presented(&self) -> usize {
        self.presented
    }

    /// Show or store one annotated image. Returns the written path in save mode.
    pub fn present(&mut self, filename: &str, image: &RgbImage) -> Result<Option<PathBuf>, BatchError> {
        let written = match &self.mode {
            DisplayMode::Window => {
                show_window(&format!("Detected Plate - {}", filename), image);
                None
            }
            DisplayMode::SaveTo(dir) => {
                let stem = Path::new(filename)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| filename.to_string());
                let path = dir.join(format!("{}_plate.png", stem));
                image
                    .save(&path)
                    .map_err(|source| BatchError::SaveAnnotated {
                        path: path.clone(),
                        source,
                    })?;
                info!(path = %path.display(), "saved annotated image");
                Some(path)
            }
            DisplayMode::Off => return Ok(None),
        };

        self.presented += 1;
        Ok(written)
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        debug!(presented = self.presented, "viewer released");
    }
}

#[cfg(feature = "display")]
fn show_window(title: &str, image: &RgbImage) {
    // Blocks until the window is closed
    imageproc::window::display_image(title, image, image.width(), image.height());
}

#[cfg(not(feature = "display"))]
fn show_window(_title: &str, _image: &RgbImage) {}

/// Draw a 2 pixel green box around the plate
pub fn annotate(image: &DynamicImage, bbox: &BoundingBox) -> RgbImage {
    let mut canvas = image.to_rgb8();
    if bbox.width == 0 || bbox.height == 0 {
        return canvas;
    }

    let outer = Rect::at(bbox.x as i32, bbox.y as i32).of_size(bbox.width, bbox.height);
    draw_hollow_rect_mut(&mut canvas, outer, PLATE_BOX_COLOR);

    if bbox.width > 2 && bbox.height > 2 {
        let inner = Rect::at(bbox.x as i32 + 1, bbox.y as i32 + 1).of_size(bbox.width - 2, bbox.height - 2);
        draw_hollow_rect_mut(&mut canvas, inner, PLATE_BOX_COLOR);
    }
    canvas
}
