use crate::geometry::{BoundingPolygon, Point};

/// One OCR-recognized text span with its bounding polygon.
///
/// Immutable once constructed. The derived geometry (corners, extents,
/// centroid) is computed once here and stored read-only — the polygon never
/// changes afterward, so there is nothing to invalidate.
#[derive(Debug, Clone)]
pub struct TextFragment {
    text: String,
    polygon: BoundingPolygon,
    center: Point,
    width: f64,
    height: f64,
    top_y: f64,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, polygon: BoundingPolygon) -> Self {
        let center = polygon.center();
        let width = polygon.width();
        let height = polygon.height();
        let top_y = polygon.top_y();
        Self { text: text.into(), polygon, center, width, height, top_y }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn polygon(&self) -> &BoundingPolygon {
        &self.polygon
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Min y of the two upper corners — the highest edge of the fragment.
    pub fn top_y(&self) -> f64 {
        self.top_y
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::frag;

    #[test]
    fn derived_geometry_is_cached_at_construction() {
        let f = frag("MILK", 10.0, 20.0, 40.0, 10.0);
        assert_eq!(f.text(), "MILK");
        assert_eq!(f.width(), 40.0);
        assert_eq!(f.height(), 10.0);
        assert_eq!(f.center().x, 30.0);
        assert_eq!(f.center().y, 25.0);
        assert_eq!(f.top_y(), 20.0);
    }

    #[test]
    fn clone_preserves_geometry() {
        let f = frag("EGGS", 0.0, 0.0, 8.0, 4.0);
        let g = f.clone();
        assert_eq!(f.center(), g.center());
        assert_eq!(f.top_y(), g.top_y());
    }
}
