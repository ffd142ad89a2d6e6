use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in image space. The origin is the upper-left corner of the page
/// image; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Bounding polygon must contain at least one point")]
    EmptyPolygon,
}

/// The quadrilateral (or degenerate) outline an OCR service attaches to a
/// recognized text span. Not required to be convex or axis-aligned.
/// Guaranteed non-empty by construction, so every derived measurement below
/// is infallible.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingPolygon(Vec<Point>);

impl BoundingPolygon {
    pub fn new(points: Vec<Point>) -> Result<Self, GeometryError> {
        if points.is_empty() {
            return Err(GeometryError::EmptyPolygon);
        }
        Ok(Self(points))
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// The point that is strictly left of *and* strictly above the running
    /// candidate. Ties on either axis keep the earliest point encountered.
    pub fn upper_left(&self) -> Point {
        self.extreme(|p, best| p.x < best.x && p.y < best.y)
    }

    pub fn upper_right(&self) -> Point {
        self.extreme(|p, best| p.x > best.x && p.y < best.y)
    }

    pub fn lower_left(&self) -> Point {
        self.extreme(|p, best| p.x < best.x && p.y > best.y)
    }

    pub fn lower_right(&self) -> Point {
        self.extreme(|p, best| p.x > best.x && p.y > best.y)
    }

    /// Horizontal extent: max x − min x over all points.
    pub fn width(&self) -> f64 {
        let (min, max) = self.extent(|p| p.x);
        max - min
    }

    /// Vertical extent: max y − min y over all points.
    pub fn height(&self) -> f64 {
        let (min, max) = self.extent(|p| p.y);
        max - min
    }

    /// Centroid: arithmetic mean of all polygon points, not the midpoint of
    /// any corner pair.
    pub fn center(&self) -> Point {
        let n = self.0.len() as f64;
        let (sx, sy) = self
            .0
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }

    /// The highest edge of the fragment: min of the two upper corners' y.
    pub fn top_y(&self) -> f64 {
        self.upper_left().y.min(self.upper_right().y)
    }

    fn extreme(&self, replaces: impl Fn(&Point, &Point) -> bool) -> Point {
        let mut best = self.0[0];
        for p in &self.0[1..] {
            if replaces(p, &best) {
                best = *p;
            }
        }
        best
    }

    fn extent(&self, axis: impl Fn(&Point) -> f64) -> (f64, f64) {
        let first = axis(&self.0[0]);
        self.0[1..].iter().fold((first, first), |(min, max), p| {
            let v = axis(p);
            (min.min(v), max.max(v))
        })
    }
}
