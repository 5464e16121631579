//! Tool system for the whiteboard.
//!
//! Each tool is a small state machine driven by pointer events. Tools hold
//! only ephemeral gesture state; everything durable goes through the
//! [`DocumentStore`]. Cancelling a tool mid-gesture must leave the document
//! exactly as it was before the gesture started.

mod connector_tool;
mod eraser;
mod freehand;
mod pan;
mod place;
mod select;
mod shape_tool;

pub use connector_tool::ConnectorTool;
pub use eraser::EraserTool;
pub use freehand::FreehandTool;
pub use pan::PanTool;
pub use place::{ImageSlot, ImageSource, PlaceKind, PlaceTool};
pub use select::{CLICK_DRAG_THRESHOLD, SelectTool};
pub use shape_tool::ShapeTool;

use crate::element::{Element, ElementId, PenKind, ShapeKind};
use crate::input::Modifiers;
use crate::store::DocumentStore;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Pen,
    Marker,
    Highlighter,
    Eraser,
    Rectangle,
    Ellipse,
    Diamond,
    ConnectorLine,
    ConnectorArrow,
    Text,
    Sticky,
    Table,
    Mindmap,
    Image,
}

/// What the active tool wants after a pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolResponse {
    #[default]
    None,
    /// Switch tools (creation tools return to select after one commit).
    SwitchTo(ToolKind),
}

/// Transient visuals for the render layer. Nothing here is committed.
#[derive(Debug, Clone, Default)]
pub enum ToolPreview {
    #[default]
    None,
    /// Ghost of the element being created.
    Ghost(Element),
    /// Marquee selection rectangle, in world space.
    Marquee(Rect),
    /// Preview positions of elements being dragged.
    Drag(Vec<(ElementId, Point)>),
}

/// A pointer-driven tool. Positions are stage coordinates; tools convert
/// to world space through the store's camera so that pan/zoom during a
/// gesture stays coherent.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn on_pointer_down(&mut self, store: &mut DocumentStore, position: Point, modifiers: Modifiers);

    fn on_pointer_move(&mut self, store: &mut DocumentStore, position: Point, modifiers: Modifiers);

    fn on_pointer_up(
        &mut self,
        store: &mut DocumentStore,
        position: Point,
        modifiers: Modifiers,
    ) -> ToolResponse;

    /// Discard the in-flight gesture without committing. Must be idempotent.
    fn cancel(&mut self, store: &mut DocumentStore);

    fn preview(&self) -> ToolPreview {
        ToolPreview::None
    }
}

/// Registry of tools plus the active one. Pointer events are routed only to
/// the active tool; switching cancels the outgoing tool first so a gesture
/// can never straddle two tools.
pub struct ToolManager {
    tools: HashMap<ToolKind, Box<dyn Tool>>,
    active: ToolKind,
}

impl std::fmt::Debug for ToolManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolManager")
            .field("active", &self.active)
            .field("registered", &self.tools.len())
            .finish()
    }
}

impl ToolManager {
    /// An empty registry. Most callers want [`ToolManager::with_defaults`].
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            active: ToolKind::Select,
        }
    }

    /// Registry with every built-in tool. The image slot is shared with the
    /// host, which fills it with a decoded image before activating the
    /// image tool.
    pub fn with_defaults(image_slot: ImageSlot) -> Self {
        let mut manager = Self::new();
        manager.register(Box::new(SelectTool::new()));
        manager.register(Box::new(PanTool::new()));
        manager.register(Box::new(FreehandTool::new(PenKind::Pen)));
        manager.register(Box::new(FreehandTool::new(PenKind::Marker)));
        manager.register(Box::new(FreehandTool::new(PenKind::Highlighter)));
        manager.register(Box::new(EraserTool::new()));
        manager.register(Box::new(ShapeTool::new(ShapeKind::Rectangle)));
        manager.register(Box::new(ShapeTool::new(ShapeKind::Ellipse)));
        manager.register(Box::new(ShapeTool::new(ShapeKind::Diamond)));
        manager.register(Box::new(ConnectorTool::new(false)));
        manager.register(Box::new(ConnectorTool::new(true)));
        manager.register(Box::new(PlaceTool::new(PlaceKind::Text)));
        manager.register(Box::new(PlaceTool::new(PlaceKind::Sticky)));
        manager.register(Box::new(PlaceTool::new(PlaceKind::Table)));
        manager.register(Box::new(PlaceTool::new(PlaceKind::Mindmap)));
        manager.register(Box::new(PlaceTool::image(image_slot)));
        manager
    }

    /// Register a tool under its own kind, replacing any previous binding.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.kind(), tool);
    }

    pub fn active(&self) -> ToolKind {
        self.active
    }

    /// Switch the active tool. The outgoing tool is cancelled before the
    /// incoming one can receive events. Unknown kinds are ignored.
    pub fn activate(&mut self, kind: ToolKind, store: &mut DocumentStore) {
        if kind == self.active {
            return;
        }
        if !self.tools.contains_key(&kind) {
            log::debug!("activate: no tool registered for {kind:?}");
            return;
        }
        if let Some(outgoing) = self.tools.get_mut(&self.active) {
            outgoing.cancel(store);
        }
        self.active = kind;
    }

    /// Cancel the active tool's gesture in place.
    pub fn cancel_active(&mut self, store: &mut DocumentStore) {
        if let Some(tool) = self.tools.get_mut(&self.active) {
            tool.cancel(store);
        }
    }

    pub fn pointer_down(&mut self, store: &mut DocumentStore, position: Point, modifiers: Modifiers) {
        if let Some(tool) = self.tools.get_mut(&self.active) {
            tool.on_pointer_down(store, position, modifiers);
        }
    }

    pub fn pointer_move(&mut self, store: &mut DocumentStore, position: Point, modifiers: Modifiers) {
        if let Some(tool) = self.tools.get_mut(&self.active) {
            tool.on_pointer_move(store, position, modifiers);
        }
    }

    /// Route a pointer-up and apply any requested tool switch.
    pub fn pointer_up(&mut self, store: &mut DocumentStore, position: Point, modifiers: Modifiers) {
        let response = match self.tools.get_mut(&self.active) {
            Some(tool) => tool.on_pointer_up(store, position, modifiers),
            None => ToolResponse::None,
        };
        if let ToolResponse::SwitchTo(kind) = response {
            self.activate(kind, store);
        }
    }

    /// Preview of the active tool's in-flight gesture.
    pub fn preview(&self) -> ToolPreview {
        self.tools
            .get(&self.active)
            .map(|tool| tool.preview())
            .unwrap_or_default()
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::with_defaults(ImageSlot::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    #[test]
    fn test_activate_unknown_kind_is_ignored() {
        let mut manager = ToolManager::new();
        manager.register(Box::new(SelectTool::new()));
        let mut store = DocumentStore::new();

        manager.activate(ToolKind::Rectangle, &mut store);
        assert_eq!(manager.active(), ToolKind::Select);
    }

    #[test]
    fn test_switch_cancels_outgoing_gesture() {
        let mut manager = ToolManager::default();
        let mut store = DocumentStore::new();

        manager.activate(ToolKind::Rectangle, &mut store);
        manager.pointer_down(&mut store, Point::new(0.0, 0.0), Modifiers::NONE);
        assert!(matches!(manager.preview(), ToolPreview::None));
        manager.pointer_move(&mut store, Point::new(50.0, 50.0), Modifiers::NONE);
        assert!(matches!(manager.preview(), ToolPreview::Ghost(_)));

        // Switching away discards the half-drawn shape.
        manager.activate(ToolKind::Pan, &mut store);
        assert!(store.document().is_empty());
        manager.activate(ToolKind::Rectangle, &mut store);
        assert!(matches!(manager.preview(), ToolPreview::None));
    }

    #[test]
    fn test_creation_tool_returns_to_select() {
        let mut manager = ToolManager::default();
        let mut store = DocumentStore::new();

        manager.activate(ToolKind::Rectangle, &mut store);
        manager.pointer_down(&mut store, Point::new(0.0, 0.0), Modifiers::NONE);
        manager.pointer_up(&mut store, Point::new(120.0, 90.0), Modifiers::NONE);

        assert_eq!(store.document().len(), 1);
        assert_eq!(manager.active(), ToolKind::Select);
    }
}
