//! Connector creation with anchor snapping.

use super::select::CLICK_DRAG_THRESHOLD;
use super::{Tool, ToolKind, ToolPreview, ToolResponse};
use crate::anchor::{self, COMMIT_SNAP_THRESHOLD, LIVE_SNAP_THRESHOLD};
use crate::element::{Connector, Element, Endpoint};
use crate::input::Modifiers;
use crate::store::{AddOptions, DocumentStore};
use kurbo::Point;

/// Drags a line or arrow between two points, snapping each end to the
/// nearest anchor. Snapping uses a tight threshold while the gesture is
/// live and a wider one at commit, so rough releases near an element still
/// bind.
#[derive(Debug)]
pub struct ConnectorTool {
    arrowhead: bool,
    gesture: Option<(Point, Point)>,
}

impl ConnectorTool {
    pub fn new(arrowhead: bool) -> Self {
        Self {
            arrowhead,
            gesture: None,
        }
    }

    /// Snap a world point to an anchor, or keep it free. Thresholds are
    /// screen pixels, so they shrink in world space as the camera zooms in.
    fn resolve(store: &DocumentStore, point: Point, threshold: f64) -> Endpoint {
        let world_threshold = threshold / store.camera().zoom;
        match anchor::resolve_anchor(point, store.document().anchor_candidates(), world_threshold) {
            Some(hit) => Endpoint::bound(hit.element, hit.side),
            None => Endpoint::free(point),
        }
    }

    fn snapped_point(store: &DocumentStore, point: Point, threshold: f64) -> Point {
        match Self::resolve(store, point, threshold) {
            Endpoint::Bound { element, side } => store
                .document()
                .get(element)
                .map(|el| anchor::anchor_point(el.bounds(), side))
                .unwrap_or(point),
            Endpoint::Free { point } => point,
        }
    }
}

impl Tool for ConnectorTool {
    fn kind(&self) -> ToolKind {
        if self.arrowhead {
            ToolKind::ConnectorArrow
        } else {
            ToolKind::ConnectorLine
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
            if (world - start).hypot() >= CLICK_DRAG_THRESHOLD {
                // Both ends are resolved independently at commit with the
                // wide threshold.
                let from = Self::resolve(store, start, COMMIT_SNAP_THRESHOLD);
                let to = Self::resolve(store, world, COMMIT_SNAP_THRESHOLD);
                let connector = Connector::new(from, to, self.arrowhead);
                store.add_element(
                    Element::Connector(connector),
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
        // Live preview snaps with the tight threshold only; the ghost uses
        // raw ephemeral points, so it cannot reference elements that might
        // vanish before commit.
        match self.gesture {
            Some((start, current)) if (current - start).hypot() >= CLICK_DRAG_THRESHOLD => {
                ToolPreview::Ghost(Element::Connector(Connector::new(
                    Endpoint::free(start),
                    Endpoint::free(current),
                    self.arrowhead,
                )))
            }
            _ => ToolPreview::None,
        }
    }
}

/// Live-snapped endpoint positions for the render layer, tight threshold.
pub fn live_snap(store: &DocumentStore, start: Point, current: Point) -> (Point, Point) {
    (
        ConnectorTool::snapped_point(store, start, LIVE_SNAP_THRESHOLD),
        ConnectorTool::snapped_point(store, current, LIVE_SNAP_THRESHOLD),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{AnchorSide, ShapeKind, ShapePrimitive};

    fn add_rect(store: &mut DocumentStore, x: f64, y: f64) -> crate::element::ElementId {
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

    fn committed_connector(store: &DocumentStore) -> &Connector {
        store
            .document()
            .ordered()
            .find_map(Element::as_connector)
            .unwrap()
    }

    #[test]
    fn test_drag_between_elements_binds_both_ends() {
        let mut store = DocumentStore::new();
        let mut tool = ConnectorTool::new(true);
        let a = add_rect(&mut store, 0.0, 0.0);
        let b = add_rect(&mut store, 400.0, 0.0);

        // Drag from inside A to inside B; the center anchors are within the
        // commit threshold.
        tool.on_pointer_down(&mut store, Point::new(50.0, 50.0), Modifiers::NONE);
        tool.on_pointer_move(&mut store, Point::new(450.0, 50.0), Modifiers::NONE);
        let response = tool.on_pointer_up(&mut store, Point::new(450.0, 50.0), Modifiers::NONE);

        assert_eq!(response, ToolResponse::SwitchTo(ToolKind::Select));
        let conn = committed_connector(&store);
        assert!(conn.arrowhead);
        assert_eq!(conn.from, Endpoint::bound(a, AnchorSide::Center));
        assert_eq!(conn.to, Endpoint::bound(b, AnchorSide::Center));
    }

    #[test]
    fn test_far_endpoints_stay_free() {
        let mut store = DocumentStore::new();
        let mut tool = ConnectorTool::new(false);
        add_rect(&mut store, 0.0, 0.0);

        tool.on_pointer_down(&mut store, Point::new(600.0, 600.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(800.0, 700.0), Modifiers::NONE);

        let conn = committed_connector(&store);
        assert_eq!(conn.from, Endpoint::free(Point::new(600.0, 600.0)));
        assert_eq!(conn.to, Endpoint::free(Point::new(800.0, 700.0)));
    }

    #[test]
    fn test_commit_threshold_is_wider_than_live() {
        let mut store = DocumentStore::new();
        let mut tool = ConnectorTool::new(false);
        let a = add_rect(&mut store, 0.0, 0.0);

        // 30px from the right anchor: outside the live threshold, inside
        // the commit one.
        tool.on_pointer_down(&mut store, Point::new(400.0, 400.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(130.0, 50.0), Modifiers::NONE);

        let conn = committed_connector(&store);
        assert_eq!(conn.to, Endpoint::bound(a, AnchorSide::Right));
        assert_eq!(
            ConnectorTool::resolve(&store, Point::new(130.0, 50.0), LIVE_SNAP_THRESHOLD),
            Endpoint::free(Point::new(130.0, 50.0))
        );
    }

    #[test]
    fn test_click_creates_nothing() {
        let mut store = DocumentStore::new();
        let mut tool = ConnectorTool::new(false);

        tool.on_pointer_down(&mut store, Point::new(10.0, 10.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(11.0, 10.0), Modifiers::NONE);

        assert!(store.document().is_empty());
    }

    #[test]
    fn test_same_element_both_ends_is_permitted() {
        let mut store = DocumentStore::new();
        let mut tool = ConnectorTool::new(false);
        let a = add_rect(&mut store, 0.0, 0.0);

        tool.on_pointer_down(&mut store, Point::new(5.0, 50.0), Modifiers::NONE);
        tool.on_pointer_up(&mut store, Point::new(95.0, 50.0), Modifiers::NONE);

        let conn = committed_connector(&store);
        assert_eq!(conn.from, Endpoint::bound(a, AnchorSide::Left));
        assert_eq!(conn.to, Endpoint::bound(a, AnchorSide::Right));
    }
}
