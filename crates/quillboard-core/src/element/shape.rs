//! Shape-primitive element (rectangle, ellipse, diamond).

use super::{ElementId, ElementStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geometric primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Diamond,
}

/// A geometric primitive drawn by the shape tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapePrimitive {
    pub id: ElementId,
    pub kind: ShapeKind,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub style: ElementStyle,
}

impl ShapePrimitive {
    /// Fallback size for a near-zero drag gesture.
    pub const DEFAULT_WIDTH: f64 = 120.0;
    pub const DEFAULT_HEIGHT: f64 = 80.0;

    pub fn new(kind: ShapeKind, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            width,
            height,
            style: ElementStyle::default(),
        }
    }

    /// Create a shape from two drag corners.
    pub fn from_corners(kind: ShapeKind, p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        Self::new(
            kind,
            Point::new(min_x, min_y),
            (p2.x - p1.x).abs(),
            (p2.y - p1.y).abs(),
        )
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
        let bounds = self.bounds();
        match self.kind {
            ShapeKind::Rectangle => {
                super::hit_test_box(bounds, self.style.stroke_width, point, tolerance)
            }
            ShapeKind::Ellipse => {
                let center = bounds.center();
                let rx = bounds.width() / 2.0 + tolerance;
                let ry = bounds.height() / 2.0 + tolerance;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let nx = (point.x - center.x) / rx;
                let ny = (point.y - center.y) / ry;
                nx * nx + ny * ny <= 1.0
            }
            ShapeKind::Diamond => {
                let center = bounds.center();
                let hw = bounds.width() / 2.0 + tolerance;
                let hh = bounds.height() / 2.0 + tolerance;
                if hw <= 0.0 || hh <= 0.0 {
                    return false;
                }
                // L1 test in the diamond's normalized space.
                ((point.x - center.x) / hw).abs() + ((point.y - center.y) / hh).abs() <= 1.0
            }
        }
    }
}
