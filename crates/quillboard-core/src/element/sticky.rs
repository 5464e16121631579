//! Sticky note element.

use super::{ElementId, ElementStyle, Rgba};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sticky note: a filled box with wrapped text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sticky {
    pub id: ElementId,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Note text content.
    pub text: String,
    pub style: ElementStyle,
}

impl Sticky {
    /// Default size used when the creation gesture is a bare click.
    pub const DEFAULT_WIDTH: f64 = 180.0;
    pub const DEFAULT_HEIGHT: f64 = 180.0;

    pub fn new(position: Point, width: f64, height: f64) -> Self {
        let style = ElementStyle {
            fill_color: Some(Rgba::new(255, 235, 130, 255)),
            ..Default::default()
        };
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            text: String::new(),
            style,
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
        // Sticky notes are always filled.
        super::hit_test_box(self.bounds(), self.style.stroke_width, point, tolerance)
    }
}
