//! Hand tool: drags the camera, never the document.

use super::{Tool, ToolKind, ToolResponse};
use crate::input::Modifiers;
use crate::store::DocumentStore;
use kurbo::Point;

#[derive(Debug, Default)]
pub struct PanTool {
    /// Last stage position while the button is down.
    last: Option<Point>,
}

impl PanTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for PanTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pan
    }

    fn on_pointer_down(&mut self, _store: &mut DocumentStore, position: Point, _modifiers: Modifiers) {
        self.last = Some(position);
    }

    fn on_pointer_move(&mut self, store: &mut DocumentStore, position: Point, _modifiers: Modifiers) {
        if let Some(last) = self.last.replace(position) {
            let delta = position - last;
            store.pan_by(delta.x, delta.y);
        }
    }

    fn on_pointer_up(
        &mut self,
        _store: &mut DocumentStore,
        _position: Point,
        _modifiers: Modifiers,
    ) -> ToolResponse {
        self.last = None;
        ToolResponse::None
    }

    fn cancel(&mut self, _store: &mut DocumentStore) {
        self.last = None;
    }
}
