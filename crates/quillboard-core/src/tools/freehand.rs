//! Freehand stroke tools: pen, marker, highlighter.

use super::{Tool, ToolKind, ToolPreview, ToolResponse};
use crate::element::{Drawing, Element, PenKind};
use crate::input::Modifiers;
use crate::store::{AddOptions, DocumentStore};
use kurbo::Point;

/// Streams pointer positions into a stroke buffer and commits the whole
/// stroke as one element (one history entry). The board-level coalescer
/// already collapses pointer moves to one per frame, so each
/// `on_pointer_move` appends at most one point.
#[derive(Debug)]
pub struct FreehandTool {
    pen: PenKind,
    stroke: Option<Drawing>,
}

impl FreehandTool {
    pub fn new(pen: PenKind) -> Self {
        Self { pen, stroke: None }
    }
}

impl Tool for FreehandTool {
    fn kind(&self) -> ToolKind {
        match self.pen {
            PenKind::Pen => ToolKind::Pen,
            PenKind::Marker => ToolKind::Marker,
            PenKind::Highlighter => ToolKind::Highlighter,
        }
    }

    fn on_pointer_down(&mut self, store: &mut DocumentStore, position: Point, _modifiers: Modifiers) {
        let world = store.camera().stage_to_world(position);
        let mut stroke = Drawing::new(self.pen);
        stroke.push_point(world);
        self.stroke = Some(stroke);
    }

    fn on_pointer_move(&mut self, store: &mut DocumentStore, position: Point, _modifiers: Modifiers) {
        let world = store.camera().stage_to_world(position);
        if let Some(stroke) = &mut self.stroke {
            stroke.push_point(world);
        }
    }

    fn on_pointer_up(
        &mut self,
        store: &mut DocumentStore,
        position: Point,
        _modifiers: Modifiers,
    ) -> ToolResponse {
        let world = store.camera().stage_to_world(position);
        if let Some(mut stroke) = self.stroke.take() {
            if stroke.points.last() != Some(&world) {
                stroke.push_point(world);
            }
            if stroke.points.len() >= 2 {
                store.add_element(
                    Element::Drawing(stroke),
                    AddOptions {
                        select: false,
                        push_history: true,
                    },
                );
            }
        }
        ToolResponse::None
    }

    fn cancel(&mut self, _store: &mut DocumentStore) {
        self.stroke = None;
    }

    fn preview(&self) -> ToolPreview {
        match &self.stroke {
            Some(stroke) if stroke.points.len() >= 2 => {
                ToolPreview::Ghost(Element::Drawing(stroke.clone()))
            }
            _ => ToolPreview::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(tool: &mut FreehandTool, store: &mut DocumentStore, points: &[(f64, f64)]) {
        let mut iter = points.iter();
        let &(x, y) = iter.next().unwrap();
        tool.on_pointer_down(store, Point::new(x, y), Modifiers::NONE);
        let mut last = (x, y);
        for &(x, y) in iter {
            tool.on_pointer_move(store, Point::new(x, y), Modifiers::NONE);
            last = (x, y);
        }
        tool.on_pointer_up(store, Point::new(last.0, last.1), Modifiers::NONE);
    }

    #[test]
    fn test_stroke_commits_once() {
        let mut store = DocumentStore::new();
        let mut tool = FreehandTool::new(PenKind::Pen);

        stroke(&mut tool, &mut store, &[(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)]);

        assert_eq!(store.document().len(), 1);
        assert!(store.undo());
        assert!(store.document().is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn test_pen_kind_sets_stroke_style() {
        let mut store = DocumentStore::new();
        let mut tool = FreehandTool::new(PenKind::Highlighter);

        stroke(&mut tool, &mut store, &[(0.0, 0.0), (50.0, 0.0)]);

        let el = store.document().ordered().next().unwrap();
        let style = el.style();
        assert!((style.stroke_width - PenKind::Highlighter.stroke_width()).abs() < f64::EPSILON);
        assert!((style.opacity - PenKind::Highlighter.opacity()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_degenerate_stroke_is_discarded() {
        let mut store = DocumentStore::new();
        let mut tool = FreehandTool::new(PenKind::Marker);

        tool.on_pointer_down(&mut store, Point::new(5.0, 5.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(5.0, 5.0), Modifiers::NONE);

        assert!(store.document().is_empty());
    }

    #[test]
    fn test_cancel_discards_stroke() {
        let mut store = DocumentStore::new();
        let mut tool = FreehandTool::new(PenKind::Pen);

        tool.on_pointer_down(&mut store, Point::new(0.0, 0.0), Modifiers::NONE);
        tool.on_pointer_move(&mut store, Point::new(10.0, 10.0), Modifiers::NONE);
        tool.cancel(&mut store);
        tool.on_pointer_up(&mut store, Point::new(20.0, 20.0), Modifiers::NONE);

        assert!(store.document().is_empty());
    }
}
