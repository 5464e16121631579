//! Drag-to-create tool for the box shapes.

use super::select::CLICK_DRAG_THRESHOLD;
use super::{Tool, ToolKind, ToolPreview, ToolResponse};
use crate::element::{Element, ShapeKind, ShapePrimitive};
use crate::input::Modifiers;
use crate::store::{AddOptions, DocumentStore};
use kurbo::Point;

/// Creates a rectangle, ellipse, or diamond by dragging out its bounds. A
/// bare click places a default-sized shape at the press point.
#[derive(Debug)]
pub struct ShapeTool {
    shape: ShapeKind,
    gesture: Option<(Point, Point)>,
}

impl ShapeTool {
    pub fn new(shape: ShapeKind) -> Self {
        Self {
            shape,
            gesture: None,
        }
    }

    fn build(&self, start: Point, end: Point) -> ShapePrimitive {
        if (end - start).hypot() < CLICK_DRAG_THRESHOLD {
            // Degenerate gesture: default size centered on the click.
            let origin = Point::new(
                start.x - ShapePrimitive::DEFAULT_WIDTH / 2.0,
                start.y - ShapePrimitive::DEFAULT_HEIGHT / 2.0,
            );
            ShapePrimitive::new(
                self.shape,
                origin,
                ShapePrimitive::DEFAULT_WIDTH,
                ShapePrimitive::DEFAULT_HEIGHT,
            )
        } else {
            ShapePrimitive::from_corners(self.shape, start, end)
        }
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        match self.shape {
            ShapeKind::Rectangle => ToolKind::Rectangle,
            ShapeKind::Ellipse => ToolKind::Ellipse,
            ShapeKind::Diamond => ToolKind::Diamond,
        }
    }

    fn on_pointer_down(&mut self, store: &mut DocumentStore, position: Point, _modifiers: Modifiers) {
        let world = store.camera().stage_to_world(position);
        self.gesture = Some((world, world));
    }

    fn on_pointer_move(&mut self, store: &mut DocumentStore, position: Point, _modifiers: Modifiers) {
        let world = store.camera().stage_to_world(position);
        if let Some((_, current)) = &mut self.gesture {
            *current = world;
        }
    }

    fn on_pointer_up(
        &mut self,
        store: &mut DocumentStore,
        position: Point,
        _modifiers: Modifiers,
    ) -> ToolResponse {
        let world = store.camera().stage_to_world(position);
        if let Some((start, _)) = self.gesture.take() {
            let shape = self.build(start, world);
            store.add_element(
                Element::Shape(shape),
                AddOptions {
                    select: true,
                    push_history: true,
                },
            );
        }
        ToolResponse::SwitchTo(ToolKind::Select)
    }

    fn cancel(&mut self, _store: &mut DocumentStore) {
        self.gesture = None;
    }

    fn preview(&self) -> ToolPreview {
        match self.gesture {
            Some((start, current)) if (current - start).hypot() >= CLICK_DRAG_THRESHOLD => {
                ToolPreview::Ghost(Element::Shape(ShapePrimitive::from_corners(
                    self.shape, start, current,
                )))
            }
            _ => ToolPreview::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use kurbo::Size;

    #[test]
    fn test_drag_creates_normalized_rect() {
        let mut store = DocumentStore::new();
        let mut tool = ShapeTool::new(ShapeKind::Rectangle);

        tool.on_pointer_down(&mut store, Point::new(100.0, 100.0), Modifiers::NONE);
        tool.on_pointer_move(&mut store, Point::new(300.0, 250.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(300.0, 250.0), Modifiers::NONE);

        assert_eq!(store.document().len(), 1);
        let el = store.document().ordered().next().unwrap();
        assert_eq!(el.kind(), ElementKind::Shape);
        assert_eq!(el.position(), Point::new(100.0, 100.0));
        assert_eq!(el.size(), Size::new(200.0, 150.0));
        assert!(store.document().is_selected(el.id()));
    }

    #[test]
    fn test_reverse_drag_normalizes_corners() {
        let mut store = DocumentStore::new();
        let mut tool = ShapeTool::new(ShapeKind::Ellipse);

        tool.on_pointer_down(&mut store, Point::new(300.0, 250.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(100.0, 100.0), Modifiers::NONE);

        let el = store.document().ordered().next().unwrap();
        assert_eq!(el.position(), Point::new(100.0, 100.0));
        assert_eq!(el.size(), Size::new(200.0, 150.0));
    }

    #[test]
    fn test_click_falls_back_to_default_size() {
        let mut store = DocumentStore::new();
        let mut tool = ShapeTool::new(ShapeKind::Diamond);

        tool.on_pointer_down(&mut store, Point::new(50.0, 50.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(51.0, 50.0), Modifiers::NONE);

        let el = store.document().ordered().next().unwrap();
        assert_eq!(
            el.size(),
            Size::new(ShapePrimitive::DEFAULT_WIDTH, ShapePrimitive::DEFAULT_HEIGHT)
        );
    }

    #[test]
    fn test_creation_is_one_undo_entry() {
        let mut store = DocumentStore::new();
        let mut tool = ShapeTool::new(ShapeKind::Rectangle);

        tool.on_pointer_down(&mut store, Point::new(0.0, 0.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(100.0, 80.0), Modifiers::NONE);

        assert!(store.undo());
        assert!(store.document().is_empty());
        assert!(!store.can_undo());
    }
}
