//! Geometric primitives for sorting markers into regions.
//!
//! This module provides the planar types used to decide whether a marker lies
//! inside a region drawn on a section image.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in image-pixel space
//! - [`Bounds`] - An axis-aligned bounding box
//! - [`Polygon`] - A simple closed polygon with a cached bounding box
//!
//! # Coordinate System
//!
//! Coordinates are image pixels, as stored by the annotation tool:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Containment only depends on the relative position of points and edges, so
//! the direction of the axes has no effect on the results.
//!
//! # Boundary Policy
//!
//! A point lying exactly on an edge or a vertex of a polygon is **inside**
//! that polygon. Markers are placed by hand and often sit on the outline of a
//! region; counting them is preferable to silently losing them. The on-edge
//! test tolerates a perpendicular distance of [`BOUNDARY_EPSILON`] pixels.

use serde::Deserialize;
use thiserror::Error;

/// Maximum perpendicular distance, in pixels, at which a point still counts
/// as lying on a polygon edge.
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// A 2D point in image-pixel coordinates.
///
/// Deserializes from a two-element array `[x, y]`.
///
/// # Examples
///
/// ```
/// # use roicount_core::geometry::Point;
/// let p = Point::new(10.0, 20.0);
/// assert_eq!(p.x(), 10.0);
/// assert_eq!(p.y(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns true if both coordinates are finite numbers
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Z component of the cross product of two vectors
    fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding box with inclusive edges
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates the smallest bounds enclosing every point.
    ///
    /// Returns `None` for an empty slice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use roicount_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::from_points(&[
    ///     Point::new(2.0, 8.0),
    ///     Point::new(-1.0, 3.0),
    ///     Point::new(5.0, 4.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(bounds.min_x(), -1.0);
    /// assert_eq!(bounds.max_y(), 8.0);
    /// assert_eq!(bounds.width(), 6.0);
    /// ```
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let initial = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(rest.iter().fold(initial, |bounds, p| Self {
            min_x: bounds.min_x.min(p.x),
            min_y: bounds.min_y.min(p.y),
            max_x: bounds.max_x.max(p.x),
            max_y: bounds.max_y.max(p.y),
        }))
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns true if the point lies inside or on the edge of the bounds,
    /// allowing `tolerance` pixels of slack on every side.
    pub fn contains_point(self, point: Point, tolerance: f64) -> bool {
        point.x >= self.min_x - tolerance
            && point.x <= self.max_x + tolerance
            && point.y >= self.min_y - tolerance
            && point.y <= self.max_y + tolerance
    }
}

/// Reasons a vertex list cannot form a polygon
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolygonError {
    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },
}

/// A simple closed polygon.
///
/// The closing edge from the last vertex back to the first is implicit; the
/// first vertex must not be repeated at the end (a repeated vertex is
/// harmless, it only adds a zero-length edge). The polygon may be non-convex
/// and its edges may have any direction.
///
/// Deserializes from an array of `[x, y]` pairs and validates on the way in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Point>")]
pub struct Polygon {
    vertices: Vec<Point>,
    bounds: Bounds,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    ///
    /// # Errors
    ///
    /// Returns [`PolygonError`] if there are fewer than 3 vertices or any
    /// coordinate is NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// # use roicount_core::geometry::{Point, Polygon};
    /// let square = Polygon::new(vec![
    ///     Point::new(0.0, 0.0),
    ///     Point::new(10.0, 0.0),
    ///     Point::new(10.0, 10.0),
    ///     Point::new(0.0, 10.0),
    /// ])
    /// .unwrap();
    ///
    /// assert!(square.contains(Point::new(5.0, 5.0)));
    /// assert!(square.contains(Point::new(10.0, 5.0))); // on an edge
    /// assert!(!square.contains(Point::new(11.0, 5.0)));
    /// ```
    pub fn new(vertices: Vec<Point>) -> Result<Self, PolygonError> {
        if vertices.len() < 3 {
            return Err(PolygonError::TooFewVertices(vertices.len()));
        }
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(PolygonError::NonFiniteVertex { index });
        }
        let bounds = Bounds::from_points(&vertices).ok_or(PolygonError::TooFewVertices(0))?;
        Ok(Self { vertices, bounds })
    }

    /// Returns the vertices of the polygon
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Returns the bounding box of the polygon
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns true if the point is inside the polygon or on its outline.
    ///
    /// Points outside the bounding box are rejected without visiting the
    /// edges. See the [module documentation](self) for the boundary policy.
    pub fn contains(&self, point: Point) -> bool {
        if !self.bounds.contains_point(point, BOUNDARY_EPSILON) {
            return false;
        }
        self.contains_exhaustive(point)
    }

    fn contains_exhaustive(&self, point: Point) -> bool {
        if self.edges().any(|(a, b)| on_segment(point, a, b)) {
            return true;
        }
        self.crossing_parity(point)
    }

    /// Even-odd rule: cast a ray towards +X and count edge crossings.
    ///
    /// Each edge is treated as half-open in Y so a ray through a vertex is
    /// counted once.
    fn crossing_parity(&self, point: Point) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > point.y) != (b.y > point.y) {
                let x_at_y = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_at_y {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Iterates over edges as (start, end) pairs, including the closing edge
    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = PolygonError;

    fn try_from(vertices: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

/// Returns true if `p` lies on the segment from `a` to `b`
fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let ab = b.sub_point(a);
    let ap = p.sub_point(a);
    let length = ab.x.hypot(ab.y);

    // Zero-length edge from a repeated vertex
    if length == 0.0 {
        return ap.x.hypot(ap.y) <= BOUNDARY_EPSILON;
    }

    let distance = ab.cross(ap).abs() / length;
    if distance > BOUNDARY_EPSILON {
        return false;
    }

    let segment_bounds = Bounds {
        min_x: a.x.min(b.x),
        min_y: a.y.min(b.y),
        max_x: a.x.max(b.x),
        max_y: a.y.max(b.y),
    };
    segment_bounds.contains_point(p, BOUNDARY_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(points: &[(f64, f64)]) -> Polygon {
        Polygon::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
    }

    fn square(min: f64, max: f64) -> Polygon {
        polygon(&[(min, min), (max, min), (max, max), (min, max)])
    }

    /// A "U" shape: the notch between x = 4..6 reaches down to y = 4.
    fn u_shape() -> Polygon {
        polygon(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (6.0, 10.0),
            (6.0, 4.0),
            (4.0, 4.0),
            (4.0, 10.0),
            (0.0, 10.0),
        ])
    }

    #[test]
    fn test_point_from_array() {
        let point = Point::from([3.5, 4.25]);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.25);
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
        assert!(!Point::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_bounds_from_points_empty() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_bounds_contains_point_inclusive() {
        let bounds = square(0.0, 10.0).bounds();
        assert!(bounds.contains_point(Point::new(0.0, 0.0), 0.0));
        assert!(bounds.contains_point(Point::new(10.0, 10.0), 0.0));
        assert!(!bounds.contains_point(Point::new(10.5, 10.0), 0.0));
        assert!(bounds.contains_point(Point::new(10.5, 10.0), 1.0));
    }

    #[test]
    fn test_polygon_too_few_vertices() {
        let err = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).unwrap_err();
        assert_eq!(err, PolygonError::TooFewVertices(2));
    }

    #[test]
    fn test_polygon_non_finite_vertex() {
        let err = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(f64::NAN, 1.0),
        ])
        .unwrap_err();
        assert_eq!(err, PolygonError::NonFiniteVertex { index: 2 });
    }

    #[test]
    fn test_square_interior_and_exterior() {
        let sq = square(0.0, 10.0);
        assert!(sq.contains(Point::new(5.0, 5.0)));
        assert!(sq.contains(Point::new(0.001, 9.999)));
        assert!(!sq.contains(Point::new(-0.001, 5.0)));
        assert!(!sq.contains(Point::new(5.0, 10.001)));
        assert!(!sq.contains(Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_boundary_points_are_inside() {
        let sq = square(0.0, 10.0);
        // Edges
        assert!(sq.contains(Point::new(5.0, 0.0)));
        assert!(sq.contains(Point::new(10.0, 5.0)));
        assert!(sq.contains(Point::new(5.0, 10.0)));
        assert!(sq.contains(Point::new(0.0, 5.0)));
        // Vertices
        assert!(sq.contains(Point::new(0.0, 0.0)));
        assert!(sq.contains(Point::new(10.0, 0.0)));
        assert!(sq.contains(Point::new(10.0, 10.0)));
        assert!(sq.contains(Point::new(0.0, 10.0)));
    }

    #[test]
    fn test_boundary_on_diagonal_edge() {
        let triangle = polygon(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        assert!(triangle.contains(Point::new(5.0, 5.0)));
        assert!(triangle.contains(Point::new(2.5, 7.5)));
        assert!(!triangle.contains(Point::new(5.1, 5.1)));
    }

    #[test]
    fn test_edge_tolerance_is_absolute_pixels() {
        // The same offset from an edge, independent of polygon size
        for max in [10.0, 1e6] {
            let sq = square(0.0, max);
            let mid = max / 2.0;
            assert!(sq.contains(Point::new(max + BOUNDARY_EPSILON / 2.0, mid)));
            assert!(!sq.contains(Point::new(max + 1e-6, mid)));
            assert!(!sq.contains(Point::new(mid, -1e-6)));
        }
    }

    #[test]
    fn test_collinear_point_beyond_edge_is_outside() {
        let triangle = polygon(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        // On the line through the hypotenuse, but past its end
        assert!(!triangle.contains(Point::new(-1.0, 11.0)));
        assert!(!triangle.contains(Point::new(11.0, -1.0)));
    }

    #[test]
    fn test_non_convex_notch() {
        let u = u_shape();
        assert!(u.contains(Point::new(2.0, 8.0)));
        assert!(u.contains(Point::new(8.0, 8.0)));
        assert!(u.contains(Point::new(5.0, 2.0)));
        // Inside the bounding box, but in the notch
        assert!(!u.contains(Point::new(5.0, 8.0)));
        // The notch floor is part of the outline
        assert!(u.contains(Point::new(5.0, 4.0)));
        // Ray towards +X passes through two notch vertices
        assert!(u.contains(Point::new(1.0, 4.0)));
        assert!(!u.contains(Point::new(5.0, 4.5)));
    }

    #[test]
    fn test_winding_direction_is_irrelevant() {
        let clockwise = polygon(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let counter = square(0.0, 10.0);
        for p in [
            Point::new(5.0, 5.0),
            Point::new(0.0, 5.0),
            Point::new(-1.0, 5.0),
            Point::new(10.0, 10.0),
        ] {
            assert_eq!(clockwise.contains(p), counter.contains(p), "{p:?}");
        }
    }

    #[test]
    fn test_repeated_closing_vertex() {
        let closed = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        assert!(closed.contains(Point::new(5.0, 5.0)));
        assert!(closed.contains(Point::new(0.0, 0.0)));
        assert!(!closed.contains(Point::new(-5.0, 5.0)));
    }

    #[test]
    fn test_polygon_deserialize() {
        let polygon: Polygon = serde_json::from_str("[[0, 0], [4, 0], [4, 3]]").unwrap();
        assert_eq!(polygon.vertices().len(), 3);
        assert_eq!(polygon.bounds().width(), 4.0);
        assert_eq!(polygon.bounds().height(), 3.0);
    }

    #[test]
    fn test_polygon_deserialize_rejects_two_vertices() {
        let result: Result<Polygon, _> = serde_json::from_str("[[0, 0], [4, 0]]");
        assert!(result.is_err());
    }
}
