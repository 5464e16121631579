//! Mindmap node and edge elements.

use super::{ElementId, ElementStyle, Rgba};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node in a mindmap tree.
///
/// Hierarchy is expressed through `parent`; the store maintains a derived
/// parent→children index so descendant traversal never leaves the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindmapNode {
    pub id: ElementId,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub label: String,
    /// Parent node, None for the root.
    pub parent: Option<ElementId>,
    /// Depth in the tree (root = 0).
    pub level: u32,
    pub style: ElementStyle,
}

impl MindmapNode {
    pub const DEFAULT_WIDTH: f64 = 140.0;
    pub const DEFAULT_HEIGHT: f64 = 44.0;

    pub fn new(position: Point, label: String, parent: Option<ElementId>, level: u32) -> Self {
        let style = ElementStyle {
            fill_color: Some(Rgba::new(225, 238, 255, 255)),
            ..Default::default()
        };
        Self {
            id: Uuid::new_v4(),
            position,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            label,
            parent,
            level,
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
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }
}

/// An edge joining two mindmap nodes.
///
/// Geometry is fully derived: both endpoints are recomputed from the node
/// positions at read time, like a fully bound connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindmapEdge {
    pub id: ElementId,
    pub from: ElementId,
    pub to: ElementId,
    pub style: ElementStyle,
}

impl MindmapEdge {
    pub fn new(from: ElementId, to: ElementId) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            style: ElementStyle::default(),
        }
    }
}
