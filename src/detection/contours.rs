use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;
use std::cmp::Ordering;
use tracing::{debug, trace};

use crate::config::PlateGeometry;
use crate::models::{BoundingBox, Contour, PlateContour};

/// Trace every border (outer and hole) in a binary edge image
pub fn trace_contours(edges: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(edges)
        .into_iter()
        .map(|c| Contour::new(c.points))
        .collect()
}

/// Douglas-Peucker approximation of a closed curve.
///
/// The ring is split at the point farthest from its start and both halves are
/// simplified as open curves, so the seam between the last and first point
/// never produces a spurious extra vertex. The result does not repeat the
/// first vertex at the end.
pub fn approximate_closed_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let mut ring = points.to_vec();
    ring.dedup();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return ring;
    }

    let start = ring[0];
    let split = ring
        .iter()
        .enumerate()
        .max_by_key(|(_, p)| {
            let dx = (p.x - start.x) as i64;
            let dy = (p.y - start.y) as i64;
            dx * dx + dy * dy
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    if split == 0 {
        return vec![start];
    }

    let mut closing = ring[split..].to_vec();
    closing.push(start);

    let mut head = approximate_polygon_dp(&ring[..=split], epsilon, false);
    let mut tail = approximate_polygon_dp(&closing, epsilon, false);
    head.pop();
    tail.pop();
    head.extend(tail);
    head
}

/// Whether a candidate box has plate-like proportions inside the frame.
/// Both ranges are exclusive.
pub fn passes_geometry(bbox: &BoundingBox, image_area: f64, geometry: &PlateGeometry) -> bool {
    if image_area <= 0.0 {
        return false;
    }
    let aspect = bbox.aspect_ratio();
    let fraction = bbox.area() as f64 / image_area;

    aspect > geometry.min_aspect_ratio
        && aspect < geometry.max_aspect_ratio
        && fraction > geometry.min_area_fraction
        && fraction < geometry.max_area_fraction
}

/// Pick the plate among already traced contours.
///
/// Candidates are visited from the largest enclosed area down and the first
/// quadrilateral passing [`passes_geometry`] wins, even if a smaller one would
/// fit better.
pub fn select_from_contours(
    contours: Vec<Contour>,
    image_dimensions: (u32, u32),
    geometry: &PlateGeometry,
) -> Option<PlateContour> {
    let (width, height) = image_dimensions;
    let image_area = width as f64 * height as f64;

    let mut ranked: Vec<(f64, Contour)> = contours.into_iter().map(|c| (c.area(), c)).collect();
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    for (rank, (area, contour)) in ranked.into_iter().enumerate() {
        let perimeter = arc_length(&contour.points, true);
        let corners = approximate_closed_polygon(&contour.points, geometry.epsilon_ratio * perimeter);
        if corners.len() != 4 {
            continue;
        }

        let Some(bbox) = BoundingBox::enclosing(&corners) else {
            continue;
        };

        if passes_geometry(&bbox, image_area, geometry) {
            let area_fraction = bbox.area() as f64 / image_area;
            debug!(
                rank,
                x = bbox.x,
                y = bbox.y,
                width = bbox.width,
                height = bbox.height,
                area_fraction,
                "plate candidate accepted"
            );
            return Some(PlateContour {
                corners,
                bbox,
                contour_area: area,
                area_fraction,
            });
        }

        trace!(rank, width = bbox.width, height = bbox.height, "quadrilateral rejected by geometry");
    }

    None
}

/// Find the plate outline in an edge map, or `None` if nothing qualifies
pub fn select_plate_contour(
    edges: &GrayImage,
    image_dimensions: (u32, u32),
    geometry: &PlateGeometry,
) -> Option<PlateContour> {
    let contours = trace_contours(edges);
    debug!(count = contours.len(), "traced contours");
    select_from_contours(contours, image_dimensions, geometry)
}
