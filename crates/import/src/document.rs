use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use recibo_core::{BoundingPolygon, GeometryError, Point, TextFragment};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Fragment {index} ({text:?}): {source}")]
    BadPolygon {
        index: usize,
        text: String,
        source: GeometryError,
    },
}

/// One vertex of a fragment's bounding polygon. The OCR service omits
/// zero-valued coordinates from its JSON, so both axes default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// One recognized text span as serialized by the upstream OCR step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFragment {
    pub description: String,
    pub bounding_poly: Vec<Vertex>,
}

/// The parsed-image record the OCR step writes per document image: the image
/// it ran on plus every recognized fragment, in service order (the service's
/// whole-image summary annotation comes first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub image_filepath: String,
    pub entities: Vec<RawFragment>,
}

impl ParsedDocument {
    pub fn from_slice(data: &[u8]) -> Result<Self, DocumentError> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, DocumentError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Convert the raw records into core fragments, validating each polygon.
    pub fn into_fragments(self) -> Result<Vec<TextFragment>, DocumentError> {
        self.entities
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let points = raw
                    .bounding_poly
                    .iter()
                    .map(|v| Point::new(v.x, v.y))
                    .collect();
                let polygon =
                    BoundingPolygon::new(points).map_err(|source| DocumentError::BadPolygon {
                        index,
                        text: raw.description.clone(),
                        source,
                    })?;
                Ok(TextFragment::new(raw.description, polygon))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "image_filepath": "./images/scan-01.jpg",
        "entities": [
            {
                "description": "MILK 3.50",
                "bounding_poly": [{"x": 0, "y": 0}, {"x": 400, "y": 0}, {"x": 400, "y": 600}, {"y": 600}]
            },
            {
                "description": "MILK",
                "bounding_poly": [{"x": 50, "y": 140}, {"x": 110, "y": 140}, {"x": 110, "y": 160}, {"x": 50, "y": 160}]
            }
        ]
    }"#;

    #[test]
    fn parses_the_ocr_json_shape() {
        let doc = ParsedDocument::from_slice(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc.image_filepath, "./images/scan-01.jpg");
        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[0].description, "MILK 3.50");
    }

    #[test]
    fn omitted_vertex_coordinates_default_to_zero() {
        let doc = ParsedDocument::from_slice(SAMPLE.as_bytes()).unwrap();
        let last = doc.entities[0].bounding_poly[3];
        assert_eq!(last.x, 0.0);
        assert_eq!(last.y, 600.0);
    }

    #[test]
    fn into_fragments_carries_geometry() {
        let doc = ParsedDocument::from_slice(SAMPLE.as_bytes()).unwrap();
        let fragments = doc.into_fragments().unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1].text(), "MILK");
        assert_eq!(fragments[1].center().y, 150.0);
        assert_eq!(fragments[1].width(), 60.0);
    }

    #[test]
    fn empty_polygon_is_reported_with_fragment_context() {
        let json = r#"{
            "image_filepath": "x.jpg",
            "entities": [{"description": "GHOST", "bounding_poly": []}]
        }"#;
        let doc = ParsedDocument::from_slice(json.as_bytes()).unwrap();
        let err = doc.into_fragments().unwrap_err();
        assert!(matches!(err, DocumentError::BadPolygon { index: 0, .. }));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = ParsedDocument::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }
}
