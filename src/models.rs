use imageproc::geometry::contour_area;
use imageproc::point::Point;

/// Axis-aligned box in image coordinates. Width and height count pixels,
/// so a box spanning columns 10..=19 has width 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Smallest box enclosing all points. Negative coordinates are clamped to 0.
    pub fn enclosing(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        if max_x < min_x || max_y < min_y {
            return None;
        }

        Some(Self {
            x: min_x as u32,
            y: min_y as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }

    /// Clip the box so it lies inside an image of the given size
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        if self.x >= width || self.y >= height {
            return None;
        }
        Some(Self {
            x: self.x,
            y: self.y,
            width: self.width.min(width - self.x),
            height: self.height.min(height - self.y),
        })
    }
}

/// A traced closed boundary in an edge map
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Enclosed area (shoelace), independent of traversal direction
    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }
}

/// The contour chosen as the plate
#[derive(Debug, Clone, PartialEq)]
pub struct PlateContour {
    /// Approximated polygon, always four vertices
    pub corners: Vec<Point<i32>>,
    pub bbox: BoundingBox,
    /// Area of the traced contour before approximation
    pub contour_area: f64,
    pub area_fraction: f64,
}

impl PlateContour {
    pub fn aspect_ratio(&self) -> f64 {
        self.bbox.aspect_ratio()
    }
}

/// Text read from one image's plate
#[derive(Debug, Clone, PartialEq)]
pub struct PlateReading {
    pub filename: String,
    pub bbox: BoundingBox,
    /// Trimmed OCR output; empty when nothing was recognized
    pub text: String,
}

impl PlateReading {
    /// Text for the console report
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            "No text detected"
        } else {
            &self.text
        }
    }
}
