//! Planar geometry for zone queries
//!
//! Points lying on a polygon's boundary (within [`BOUNDARY_EPSILON`]) are
//! reported as contained. This makes `point_in_polygon` and
//! `distance_to_polygon` agree: a boundary point is inside at distance zero.

use crate::common::types::Point2D;

/// Distance (inches) under which a point counts as lying on an edge
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// Distance from `point` to the segment `a`-`b`
pub fn distance_to_segment(point: &Point2D, a: &Point2D, b: &Point2D) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < f64::EPSILON {
        return (point - a).norm();
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (point - closest).norm()
}

/// Iterate polygon edges as `(start, end)` pairs, closing the loop
pub fn edges(vertices: &[Point2D]) -> impl Iterator<Item = (&Point2D, &Point2D)> {
    let n = vertices.len();
    (0..n).map(move |i| (&vertices[i], &vertices[(i + 1) % n]))
}

fn on_boundary(vertices: &[Point2D], point: &Point2D) -> bool {
    edges(vertices).any(|(a, b)| distance_to_segment(point, a, b) <= BOUNDARY_EPSILON)
}

/// Ray-casting containment test; fewer than 3 vertices never contain anything
pub fn point_in_polygon(vertices: &[Point2D], point: &Point2D) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    if on_boundary(vertices, point) {
        return true;
    }

    // Cast a ray toward +x and count edge crossings. The half-open test
    // on y counts a crossing through a shared vertex exactly once.
    let mut inside = false;
    for (a, b) in edges(vertices) {
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Zero when contained, else the shortest distance to any edge
pub fn distance_to_polygon(vertices: &[Point2D], point: &Point2D) -> f64 {
    if vertices.is_empty() {
        return f64::INFINITY;
    }
    if point_in_polygon(vertices, point) {
        return 0.0;
    }
    edges(vertices)
        .map(|(a, b)| distance_to_segment(point, a, b))
        .fold(f64::INFINITY, f64::min)
}

/// Signed area, positive for counter-clockwise winding
pub fn signed_area(vertices: &[Point2D]) -> f64 {
    edges(vertices)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f64>()
        / 2.0
}

/// Area-weighted centroid; falls back to the vertex mean for degenerate polygons
pub fn centroid(vertices: &[Point2D]) -> Option<Point2D> {
    if vertices.is_empty() {
        return None;
    }
    let area = signed_area(vertices);
    if area.abs() < f64::EPSILON {
        let sum = vertices
            .iter()
            .fold(nalgebra::Vector2::<f64>::zeros(), |acc, v| acc + v.coords);
        return Some(Point2D::from(sum / vertices.len() as f64));
    }
    let (cx, cy) = edges(vertices).fold((0.0, 0.0), |(cx, cy), (a, b)| {
        let cross = a.x * b.y - b.x * a.y;
        (cx + (a.x + b.x) * cross, cy + (a.y + b.y) * cross)
    });
    Some(Point2D::new(cx / (6.0 * area), cy / (6.0 * area)))
}
