//! Click-or-drag placement for text, sticky, table, mindmap, and image.

use super::select::CLICK_DRAG_THRESHOLD;
use super::{Tool, ToolKind, ToolPreview, ToolResponse};
use crate::element::{Element, ImageElement, MindmapNode, Sticky, Table, TextBox};
use crate::input::Modifiers;
use crate::store::{AddOptions, DocumentStore};
use kurbo::{Point, Rect};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Default table placement grid.
const TABLE_ROWS: usize = 3;
const TABLE_COLS: usize = 3;

/// Longest edge an image is scaled down to at placement.
const IMAGE_MAX_EDGE: f64 = 400.0;

/// A decoded image waiting to be placed. The host decodes out-of-band and
/// parks bytes plus dimensions here; the tool only positions the element.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub blob_ref: String,
    pub bytes: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
}

/// Single-slot handoff between the host and the image placement tool.
#[derive(Debug, Clone, Default)]
pub struct ImageSlot(Rc<RefCell<Option<ImageSource>>>);

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, source: ImageSource) {
        *self.0.borrow_mut() = Some(source);
    }

    pub fn take(&self) -> Option<ImageSource> {
        self.0.borrow_mut().take()
    }

    pub fn is_pending(&self) -> bool {
        self.0.borrow().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceKind {
    Text,
    Sticky,
    Table,
    Mindmap,
    Image,
}

/// Places one element per gesture. A drag sizes the element; a click uses
/// its per-kind default size.
pub struct PlaceTool {
    place: PlaceKind,
    image_slot: ImageSlot,
    gesture: Option<(Point, Point)>,
}

impl PlaceTool {
    pub fn new(place: PlaceKind) -> Self {
        debug_assert!(place != PlaceKind::Image, "use PlaceTool::image");
        Self {
            place,
            image_slot: ImageSlot::default(),
            gesture: None,
        }
    }

    /// The image tool shares its pending-source slot with the host.
    pub fn image(slot: ImageSlot) -> Self {
        Self {
            place: PlaceKind::Image,
            image_slot: slot,
            gesture: None,
        }
    }

    fn build(&self, start: Point, end: Point) -> Option<Element> {
        let dragged = (end - start).hypot() >= CLICK_DRAG_THRESHOLD;
        let rect = Rect::from_points(start, end);
        let origin = Point::new(rect.x0, rect.y0);
        match self.place {
            PlaceKind::Text => {
                let mut text = TextBox::new(if dragged { origin } else { start }, String::new());
                if dragged {
                    text.width = rect.width().max(TextBox::DEFAULT_WIDTH / 4.0);
                    text.height = rect.height().max(TextBox::DEFAULT_HEIGHT);
                }
                Some(Element::Text(text))
            }
            PlaceKind::Sticky => {
                let sticky = if dragged {
                    Sticky::new(origin, rect.width(), rect.height())
                } else {
                    Sticky::new(start, Sticky::DEFAULT_WIDTH, Sticky::DEFAULT_HEIGHT)
                };
                Some(Element::Sticky(sticky))
            }
            PlaceKind::Table => {
                let mut table = Table::new(if dragged { origin } else { start }, TABLE_ROWS, TABLE_COLS);
                if dragged {
                    table.resize(rect.width(), rect.height());
                }
                Some(Element::Table(table))
            }
            PlaceKind::Mindmap => {
                // A placed node is a new root; children are added by editing.
                Some(Element::MindmapNode(MindmapNode::new(
                    start,
                    String::new(),
                    None,
                    0,
                )))
            }
            PlaceKind::Image => {
                let source = self.image_slot.take()?;
                let scale =
                    (IMAGE_MAX_EDGE / f64::from(source.width.max(source.height).max(1))).min(1.0);
                let width = f64::from(source.width) * scale;
                let height = f64::from(source.height) * scale;
                let mut image = ImageElement::new(start, width, height, source.blob_ref);
                image.source_width = source.width;
                image.source_height = source.height;
                image.data = Some(source.bytes);
                Some(Element::Image(image))
            }
        }
    }
}

impl std::fmt::Debug for PlaceTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceTool")
            .field("place", &self.place)
            .field("gesture", &self.gesture)
            .finish()
    }
}

impl Tool for PlaceTool {
    fn kind(&self) -> ToolKind {
        match self.place {
            PlaceKind::Text => ToolKind::Text,
            PlaceKind::Sticky => ToolKind::Sticky,
            PlaceKind::Table => ToolKind::Table,
            PlaceKind::Mindmap => ToolKind::Mindmap,
            PlaceKind::Image => ToolKind::Image,
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
            // No pending image: silently back to select, nothing created.
            if let Some(element) = self.build(start, world) {
                store.add_element(
                    element,
                    AddOptions {
                        select: true,
                        push_history: true,
                    },
                );
            }
        }
        ToolResponse::SwitchTo(ToolKind::Select)
    }

    fn cancel(&mut self, _store: &mut DocumentStore) {
        self.gesture = None;
    }

    fn preview(&self) -> ToolPreview {
        match self.gesture {
            Some((start, current)) if (current - start).hypot() >= CLICK_DRAG_THRESHOLD => {
                ToolPreview::Marquee(Rect::from_points(start, current))
            }
            _ => ToolPreview::None,
        }
    }
}
