mod common;

use common::*;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::draw_hollow_circle_mut;
use imageproc::point::Point;
use platescan::config::PlateGeometry;
use platescan::detection::contours::{
    approximate_closed_polygon, select_from_contours, select_plate_contour, trace_contours,
};
use platescan::{Contour, detect_plate};

const FRAME: (u32, u32) = (FRAME_WIDTH, FRAME_HEIGHT);

fn select(map: &GrayImage) -> Option<PlateContour> {
    select_plate_contour(map, FRAME, &PlateGeometry::default())
}

#[test]
fn test_accepts_wide_rectangle() {
    let map = edge_map_with_blocks(&[PLATE_RECT]);

    let plate = select(&map).expect("plate should be selected");
    assert_eq!(plate.corners.len(), 4);
    assert_eq!(
        plate.bbox,
        BoundingBox { x: 180, y: 160, width: 240, height: 80 }
    );
    assert!((plate.aspect_ratio() - 3.0).abs() < 1e-9);
    assert!((plate.area_fraction - 0.08).abs() < 1e-9);
}

#[test]
fn test_empty_map_has_no_plate() {
    let map = GrayImage::new(FRAME_WIDTH, FRAME_HEIGHT);
    assert!(select(&map).is_none());
}

#[test]
fn test_rejects_non_quadrilaterals_and_squares() {
    let mut map = GrayImage::new(FRAME_WIDTH, FRAME_HEIGHT);
    draw_hollow_circle_mut(&mut map, (300, 200), 90, Luma([255u8]));
    assert!(select(&map).is_none());

    // Four corners, but aspect ratio 1
    let square = edge_map_with_blocks(&[(200, 100, 150, 150)]);
    assert!(select(&square).is_none());
}

#[test]
fn test_aspect_ratio_bounds_are_exclusive() {
    // 200x100 is exactly 2.0, 300x50 exactly 6.0
    assert!(select(&edge_map_with_blocks(&[(100, 100, 200, 100)])).is_none());
    assert!(select(&edge_map_with_blocks(&[(100, 100, 300, 50)])).is_none());

    // Just inside both ends
    assert!(select(&edge_map_with_blocks(&[(100, 100, 201, 100)])).is_some());
    assert!(select(&edge_map_with_blocks(&[(100, 100, 299, 50)])).is_some());
}

#[test]
fn test_area_bounds_are_exclusive() {
    // 80x30 = 2400 px = 1% of 600x400
    assert!(select(&edge_map_with_blocks(&[(100, 100, 80, 30)])).is_none());
    // 300x120 = 36000 px = 15%
    assert!(select(&edge_map_with_blocks(&[(100, 100, 300, 120)])).is_none());

    assert!(select(&edge_map_with_blocks(&[(100, 100, 81, 30)])).is_some());
    assert!(select(&edge_map_with_blocks(&[(100, 100, 299, 120)])).is_some());
}

#[test]
fn test_larger_candidate_wins() {
    let small = (20, 20, 180, 60);
    let large = (200, 250, 240, 80);
    let map = edge_map_with_blocks(&[small, large]);

    let plate = select(&map).expect("plate should be selected");
    assert_eq!(
        plate.bbox,
        BoundingBox { x: 200, y: 250, width: 240, height: 80 }
    );
}

#[test]
fn test_trace_order_does_not_change_selection() {
    let map = edge_map_with_blocks(&[(20, 20, 180, 60), (200, 250, 240, 80)]);
    let traced = trace_contours(&map);
    assert_eq!(traced.len(), 2);

    let mut reversed = traced.clone();
    reversed.reverse();

    let geometry = PlateGeometry::default();
    let forward = select_from_contours(traced, FRAME, &geometry).expect("plate");
    let backward = select_from_contours(reversed, FRAME, &geometry).expect("plate");
    assert_eq!(forward.bbox, backward.bbox);
    assert_eq!(forward.bbox.width, 240);
}

#[test]
fn test_skips_oversized_frame_to_reach_plate() {
    // A large outline (aspect 1.67, 62% of the frame) around the plate
    let mut map = edge_map_with_blocks(&[PLATE_RECT]);
    outline(&mut map, (50, 50, 500, 300));

    let plate = select(&map).expect("plate should be selected");
    assert_eq!(plate.bbox.width, 240);
    assert_eq!(plate.bbox.height, 80);
}

#[test]
fn test_contour_area_ignores_orientation() {
    // Perimeter ring of a 20x20 square, one point per pixel
    let mut ring = Vec::new();
    for x in 0..20 {
        ring.push(Point::new(x, 0));
    }
    for y in 0..20 {
        ring.push(Point::new(20, y));
    }
    for x in (1..=20).rev() {
        ring.push(Point::new(x, 20));
    }
    for y in (1..=20).rev() {
        ring.push(Point::new(0, y));
    }

    let clockwise = Contour::new(ring.clone());
    ring.reverse();
    let counter_clockwise = Contour::new(ring);

    assert_eq!(clockwise.area(), 400.0);
    assert_eq!(counter_clockwise.area(), 400.0);
    assert_eq!(Contour::new(vec![Point::new(0, 0), Point::new(5, 5)]).area(), 0.0);
}

#[test]
fn test_closed_polygon_approximation() {
    let mut ring = Vec::new();
    for x in 0..=40 {
        ring.push(Point::new(x, 0));
    }
    for y in 1..=10 {
        ring.push(Point::new(40, y));
    }
    for x in (0..40).rev() {
        ring.push(Point::new(x, 10));
    }
    for y in (1..10).rev() {
        ring.push(Point::new(0, y));
    }

    let corners = approximate_closed_polygon(&ring, 1.0);
    assert_eq!(corners.len(), 4);
    for corner in [Point::new(0, 0), Point::new(40, 0), Point::new(40, 10), Point::new(0, 10)] {
        assert!(corners.contains(&corner), "missing corner {:?}", corner);
    }

    let triangle = vec![Point::new(0, 0), Point::new(20, 0), Point::new(10, 15)];
    assert_eq!(approximate_closed_polygon(&triangle, 1.0).len(), 3);
}

#[test]
fn test_detects_plate_in_synthetic_photo() {
    let photo = DynamicImage::ImageRgb8(plate_photo(PLATE_RECT));

    let plate = detect_plate(&photo, &DetectorConfig::default()).expect("plate should be detected");
    assert_bbox_near(&plate.bbox, PLATE_RECT, 4);
}

#[test]
fn test_blank_photo_has_no_plate() {
    let photo = DynamicImage::ImageRgb8(blank_photo());
    assert!(detect_plate(&photo, &DetectorConfig::default()).is_none());
}
