//! Eraser: removes elements under the pointer while dragging.

use super::{Tool, ToolKind, ToolResponse};
use crate::input::Modifiers;
use crate::store::{DocumentStore, RemoveOptions};
use kurbo::Point;

/// Hit slack in world units at zoom 1.
const ERASE_TOLERANCE: f64 = 6.0;

/// One eraser pass is one history batch: every element removed between
/// pointer-down and pointer-up undoes together, and cancelling mid-pass
/// restores all of them.
#[derive(Debug, Default)]
pub struct EraserTool {
    active: bool,
    removed_any: bool,
}

impl EraserTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn erase_at(&mut self, store: &mut DocumentStore, position: Point) {
        let world = store.camera().stage_to_world(position);
        let tolerance = ERASE_TOLERANCE / store.camera().zoom;
        while let Some(id) = store.document().topmost_at(world, tolerance) {
            store.remove_element(id, RemoveOptions { push_history: false });
            self.removed_any = true;
        }
    }
}

impl Tool for EraserTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Eraser
    }

    fn on_pointer_down(&mut self, store: &mut DocumentStore, position: Point, _modifiers: Modifiers) {
        store.begin_batch("erase");
        self.active = true;
        self.removed_any = false;
        self.erase_at(store, position);
    }

    fn on_pointer_move(&mut self, store: &mut DocumentStore, position: Point, _modifiers: Modifiers) {
        if self.active {
            self.erase_at(store, position);
        }
    }

    fn on_pointer_up(
        &mut self,
        store: &mut DocumentStore,
        position: Point,
        _modifiers: Modifiers,
    ) -> ToolResponse {
        if self.active {
            self.erase_at(store, position);
            // An empty pass records no history entry.
            store.end_batch(self.removed_any);
            self.active = false;
        }
        ToolResponse::None
    }

    fn cancel(&mut self, store: &mut DocumentStore) {
        if self.active {
            store.end_batch(false);
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, ElementId, ShapeKind, ShapePrimitive};
    use crate::store::AddOptions;

    fn add_rect(store: &mut DocumentStore, x: f64, y: f64) -> ElementId {
        let el = Element::Shape(ShapePrimitive::new(
            ShapeKind::Rectangle,
            Point::new(x, y),
            100.0,
            100.0,
        ));
        let id = el.id();
        store.add_element(
            el,
            AddOptions {
                select: false,
                push_history: false,
            },
        );
        id
    }

    #[test]
    fn test_pass_removes_and_undoes_together() {
        let mut store = DocumentStore::new();
        let mut tool = EraserTool::new();
        add_rect(&mut store, 0.0, 0.0);
        add_rect(&mut store, 200.0, 0.0);

        tool.on_pointer_down(&mut store, Point::new(50.0, 50.0), Modifiers::NONE);
        tool.on_pointer_move(&mut store, Point::new(250.0, 50.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(250.0, 50.0), Modifiers::NONE);

        assert!(store.document().is_empty());
        assert!(store.undo());
        assert_eq!(store.document().len(), 2);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_cancel_rolls_back_whole_pass() {
        let mut store = DocumentStore::new();
        let mut tool = EraserTool::new();
        add_rect(&mut store, 0.0, 0.0);
        add_rect(&mut store, 200.0, 0.0);

        tool.on_pointer_down(&mut store, Point::new(50.0, 50.0), Modifiers::NONE);
        tool.on_pointer_move(&mut store, Point::new(250.0, 50.0), Modifiers::NONE);
        assert!(store.document().is_empty());

        tool.cancel(&mut store);
        assert_eq!(store.document().len(), 2);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_empty_pass_records_nothing() {
        let mut store = DocumentStore::new();
        let mut tool = EraserTool::new();
        add_rect(&mut store, 0.0, 0.0);

        tool.on_pointer_down(&mut store, Point::new(500.0, 500.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(600.0, 500.0), Modifiers::NONE);

        assert_eq!(store.document().len(), 1);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_overlapping_elements_all_erased() {
        let mut store = DocumentStore::new();
        let mut tool = EraserTool::new();
        add_rect(&mut store, 0.0, 0.0);
        add_rect(&mut store, 50.0, 50.0);

        tool.on_pointer_down(&mut store, Point::new(75.0, 75.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(75.0, 75.0), Modifiers::NONE);

        assert!(store.document().is_empty());
    }
}
