//! Image element with externally stored pixel data.

use super::{ElementId, ElementStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// An image placed on the canvas.
///
/// The encoded bytes live in blob storage under `blob_ref`; only the
/// reference is persisted. `data` is an in-memory cache patched in after an
/// asynchronous fetch, and rendering must tolerate it being absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageElement {
    pub id: ElementId,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Opaque key into blob storage.
    pub blob_ref: String,
    /// Natural size of the source image in pixels.
    pub source_width: u32,
    pub source_height: u32,
    /// Decoded/encoded bytes, fetched lazily. Never serialized.
    #[serde(skip)]
    pub data: Option<Arc<Vec<u8>>>,
    pub style: ElementStyle,
}

impl ImageElement {
    pub fn new(position: Point, width: f64, height: f64, blob_ref: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            blob_ref,
            source_width: 0,
            source_height: 0,
            data: None,
            style: ElementStyle::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Whether the pixel payload has been fetched.
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_not_serialized() {
        let mut image = ImageElement::new(Point::new(0.0, 0.0), 100.0, 80.0, "blob-1".into());
        image.data = Some(Arc::new(vec![1, 2, 3]));

        let json = serde_json::to_string(&image).unwrap();
        let restored: ImageElement = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.blob_ref, "blob-1");
        assert!(!restored.has_data());
    }
}
