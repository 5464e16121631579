//! Selection, marquee, and group drag.

use super::{Tool, ToolKind, ToolPreview, ToolResponse};
use crate::element::{Element, ElementId};
use crate::input::Modifiers;
use crate::store::{DocumentStore, UpdateOptions};
use kurbo::{Point, Rect, Vec2};
use std::collections::{HashMap, HashSet};

/// Pointer travel (stage pixels) below which a gesture is a click, not a
/// drag.
pub const CLICK_DRAG_THRESHOLD: f64 = 4.0;

/// Hit-test slack in world units at zoom 1.
const HIT_TOLERANCE: f64 = 4.0;

#[derive(Debug, Default)]
enum SelectState {
    #[default]
    Idle,
    /// Button is down; not yet decided between click, drag, and marquee.
    Pressed {
        start_stage: Point,
        start_world: Point,
        hit: Option<ElementId>,
    },
    /// Dragging the current selection. Base positions were captured at the
    /// moment the drag started; the document is untouched until release.
    Dragging {
        start_world: Point,
        delta: Vec2,
        base_positions: HashMap<ElementId, Point>,
    },
    /// Rubber-band selection from empty space.
    Marquee {
        start_world: Point,
        current_world: Point,
    },
}

/// The default tool: click, shift-toggle, marquee, and group drag.
#[derive(Debug, Default)]
pub struct SelectTool {
    state: SelectState,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set of elements a drag actually moves: the selection plus all
    /// mindmap descendants of selected nodes, minus connectors and edges
    /// without a free endpoint (those follow their anchors for free).
    fn movable_set(store: &DocumentStore) -> Vec<ElementId> {
        let doc = store.document();
        let mut set: HashSet<ElementId> = doc.selection().clone();
        for &id in doc.selection() {
            if doc.get(id).and_then(Element::as_mindmap_node).is_some() {
                set.extend(doc.descendants(id));
            }
        }
        set.retain(|&id| match doc.get(id) {
            Some(Element::Connector(c)) => !c.fully_bound(),
            Some(Element::MindmapEdge(_)) => false,
            Some(_) => true,
            None => false,
        });
        // Deterministic commit order.
        doc.z_order()
            .iter()
            .copied()
            .filter(|id| set.contains(id))
            .collect()
    }

    fn begin_drag(&mut self, store: &DocumentStore, start_world: Point, delta: Vec2) {
        let base_positions = Self::movable_set(store)
            .into_iter()
            .filter_map(|id| store.document().get(id).map(|el| (id, el.position())))
            .collect();
        self.state = SelectState::Dragging {
            start_world,
            delta,
            base_positions,
        };
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn on_pointer_down(&mut self, store: &mut DocumentStore, position: Point, modifiers: Modifiers) {
        let world = store.camera().stage_to_world(position);
        let tolerance = HIT_TOLERANCE / store.camera().zoom;
        let hit = store.document().topmost_at(world, tolerance);

        match hit {
            Some(id) if modifiers.shift => {
                // Shift-click toggles membership and never starts a drag.
                store.toggle_selection(id);
                self.state = SelectState::Idle;
            }
            Some(id) => {
                if !store.document().is_selected(id) {
                    store.set_selection([id]);
                }
                self.state = SelectState::Pressed {
                    start_stage: position,
                    start_world: world,
                    hit: Some(id),
                };
            }
            None => {
                self.state = SelectState::Pressed {
                    start_stage: position,
                    start_world: world,
                    hit: None,
                };
            }
        }
    }

    fn on_pointer_move(&mut self, store: &mut DocumentStore, position: Point, _modifiers: Modifiers) {
        let world = store.camera().stage_to_world(position);
        match &mut self.state {
            SelectState::Idle => {}
            SelectState::Pressed {
                start_stage,
                start_world,
                hit,
            } => {
                if (position - *start_stage).hypot() < CLICK_DRAG_THRESHOLD {
                    return;
                }
                let start_world = *start_world;
                match hit {
                    Some(_) => {
                        let delta = world - start_world;
                        self.begin_drag(store, start_world, delta);
                    }
                    None => {
                        self.state = SelectState::Marquee {
                            start_world,
                            current_world: world,
                        };
                    }
                }
            }
            SelectState::Dragging {
                start_world, delta, ..
            } => {
                *delta = world - *start_world;
            }
            SelectState::Marquee { current_world, .. } => {
                *current_world = world;
            }
        }
    }

    fn on_pointer_up(
        &mut self,
        store: &mut DocumentStore,
        position: Point,
        _modifiers: Modifiers,
    ) -> ToolResponse {
        let world = store.camera().stage_to_world(position);
        match std::mem::take(&mut self.state) {
            SelectState::Idle => {}
            SelectState::Pressed { hit, .. } => {
                // Plain click: empty space clears, an element was already
                // selected on pointer-down.
                if hit.is_none() {
                    store.clear_selection();
                }
            }
            SelectState::Dragging {
                start_world,
                base_positions,
                ..
            } => {
                let delta = world - start_world;
                let selection: Vec<ElementId> = store.document().selection().iter().copied().collect();
                store.with_undo("move selection", |store| {
                    for (&id, &base) in &base_positions {
                        // Elements removed mid-gesture are skipped.
                        if !store.document().contains(id) {
                            continue;
                        }
                        store.update_element_with(id, UpdateOptions::default(), |el| {
                            let current = el.position();
                            el.translate(base + delta - current);
                        });
                    }
                    store.set_selection(selection);
                });
            }
            SelectState::Marquee {
                start_world,
                current_world,
            } => {
                let rect = Rect::from_points(start_world, current_world);
                store.set_selection(store.document().elements_in_rect(rect));
            }
        }
        ToolResponse::None
    }

    fn cancel(&mut self, _store: &mut DocumentStore) {
        self.state = SelectState::Idle;
    }

    fn preview(&self) -> ToolPreview {
        match &self.state {
            SelectState::Dragging {
                delta,
                base_positions,
                ..
            } => ToolPreview::Drag(
                base_positions
                    .iter()
                    .map(|(&id, &base)| (id, base + *delta))
                    .collect(),
            ),
            SelectState::Marquee {
                start_world,
                current_world,
            } => ToolPreview::Marquee(Rect::from_points(*start_world, *current_world)),
            _ => ToolPreview::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{
        AnchorSide, Connector, Endpoint, MindmapNode, ShapeKind, ShapePrimitive,
    };
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

    fn drag(tool: &mut SelectTool, store: &mut DocumentStore, from: Point, to: Point) {
        tool.on_pointer_down(store, from, Modifiers::NONE);
        tool.on_pointer_move(store, to, Modifiers::NONE);
        tool.on_pointer_up(store, to, Modifiers::NONE);
    }

    #[test]
    fn test_click_selects_and_empty_click_clears() {
        let mut store = DocumentStore::new();
        let mut tool = SelectTool::new();
        let id = add_rect(&mut store, 0.0, 0.0);

        drag(&mut tool, &mut store, Point::new(50.0, 50.0), Point::new(50.0, 50.0));
        assert!(store.document().is_selected(id));

        drag(&mut tool, &mut store, Point::new(500.0, 500.0), Point::new(500.0, 500.0));
        assert!(store.document().selection().is_empty());
    }

    #[test]
    fn test_shift_click_toggles_membership() {
        let mut store = DocumentStore::new();
        let mut tool = SelectTool::new();
        let a = add_rect(&mut store, 0.0, 0.0);
        let b = add_rect(&mut store, 200.0, 0.0);

        tool.on_pointer_down(&mut store, Point::new(50.0, 50.0), Modifiers::SHIFT);
        tool.on_pointer_up(&mut store, Point::new(50.0, 50.0), Modifiers::SHIFT);
        tool.on_pointer_down(&mut store, Point::new(250.0, 50.0), Modifiers::SHIFT);
        tool.on_pointer_up(&mut store, Point::new(250.0, 50.0), Modifiers::SHIFT);
        assert!(store.document().is_selected(a));
        assert!(store.document().is_selected(b));

        tool.on_pointer_down(&mut store, Point::new(50.0, 50.0), Modifiers::SHIFT);
        tool.on_pointer_up(&mut store, Point::new(50.0, 50.0), Modifiers::SHIFT);
        assert!(!store.document().is_selected(a));
        assert!(store.document().is_selected(b));
    }

    #[test]
    fn test_group_drag_commits_exact_delta_with_single_undo() {
        let mut store = DocumentStore::new();
        let mut tool = SelectTool::new();
        let a = add_rect(&mut store, 0.0, 0.0);
        let b = add_rect(&mut store, 200.0, 0.0);
        store.set_selection([a, b]);

        // Press inside a selected element, drag by (10, 20).
        drag(&mut tool, &mut store, Point::new(50.0, 50.0), Point::new(60.0, 70.0));

        assert_eq!(store.document().get(a).unwrap().position(), Point::new(10.0, 20.0));
        assert_eq!(store.document().get(b).unwrap().position(), Point::new(210.0, 20.0));
        assert!(store.document().is_selected(a));
        assert!(store.document().is_selected(b));

        assert!(store.undo());
        assert_eq!(store.document().get(a).unwrap().position(), Point::new(0.0, 0.0));
        assert_eq!(store.document().get(b).unwrap().position(), Point::new(200.0, 0.0));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_drag_is_preview_only_until_release() {
        let mut store = DocumentStore::new();
        let mut tool = SelectTool::new();
        let id = add_rect(&mut store, 0.0, 0.0);
        store.set_selection([id]);

        tool.on_pointer_down(&mut store, Point::new(50.0, 50.0), Modifiers::NONE);
        tool.on_pointer_move(&mut store, Point::new(90.0, 50.0), Modifiers::NONE);

        // Document untouched mid-gesture; preview carries the new position.
        assert_eq!(store.document().get(id).unwrap().position(), Point::new(0.0, 0.0));
        match tool.preview() {
            ToolPreview::Drag(positions) => {
                assert_eq!(positions, vec![(id, Point::new(40.0, 0.0))]);
            }
            other => panic!("expected drag preview, got {other:?}"),
        }

        tool.cancel(&mut store);
        assert_eq!(store.document().get(id).unwrap().position(), Point::new(0.0, 0.0));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_sub_threshold_movement_is_a_click() {
        let mut store = DocumentStore::new();
        let mut tool = SelectTool::new();
        let id = add_rect(&mut store, 0.0, 0.0);
        store.set_selection([id]);

        drag(&mut tool, &mut store, Point::new(50.0, 50.0), Point::new(51.0, 51.0));
        assert_eq!(store.document().get(id).unwrap().position(), Point::new(0.0, 0.0));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_marquee_selects_intersecting() {
        let mut store = DocumentStore::new();
        let mut tool = SelectTool::new();
        let a = add_rect(&mut store, 0.0, 0.0);
        let b = add_rect(&mut store, 200.0, 0.0);
        let c = add_rect(&mut store, 600.0, 600.0);

        drag(
            &mut tool,
            &mut store,
            Point::new(-20.0, -20.0),
            Point::new(320.0, 120.0),
        );
        assert!(store.document().is_selected(a));
        assert!(store.document().is_selected(b));
        assert!(!store.document().is_selected(c));
    }

    #[test]
    fn test_fully_bound_connector_excluded_from_drag() {
        let mut store = DocumentStore::new();
        let mut tool = SelectTool::new();
        let a = add_rect(&mut store, 0.0, 0.0);
        let b = add_rect(&mut store, 300.0, 0.0);
        let bound = Connector::new(
            Endpoint::bound(a, AnchorSide::Right),
            Endpoint::bound(b, AnchorSide::Left),
            false,
        );
        let half_free = Connector::new(
            Endpoint::bound(a, AnchorSide::Bottom),
            Endpoint::free(Point::new(50.0, 300.0)),
            false,
        );
        let half_free_id = half_free.id;
        store.add_element(
            Element::Connector(bound),
            AddOptions {
                select: false,
                push_history: false,
            },
        );
        store.add_element(
            Element::Connector(half_free),
            AddOptions {
                select: false,
                push_history: false,
            },
        );
        store.set_selection(store.document().z_order().to_vec());

        drag(&mut tool, &mut store, Point::new(50.0, 50.0), Point::new(60.0, 70.0));

        // Rects moved; the fully bound connector followed its anchors and
        // the half-free one had its free endpoint translated.
        assert_eq!(store.document().get(a).unwrap().position(), Point::new(10.0, 20.0));
        let conn = store.document().get(half_free_id).unwrap().as_connector().unwrap();
        assert_eq!(conn.to.free_point(), Some(Point::new(60.0, 320.0)));
    }

    #[test]
    fn test_drag_moves_mindmap_descendants() {
        let mut store = DocumentStore::new();
        let mut tool = SelectTool::new();
        let root = MindmapNode::new(Point::new(0.0, 0.0), "root".into(), None, 0);
        let root_id = root.id;
        let child = MindmapNode::new(Point::new(200.0, 100.0), "child".into(), Some(root_id), 1);
        let child_id = child.id;
        store.add_element(
            Element::MindmapNode(root),
            AddOptions {
                select: false,
                push_history: false,
            },
        );
        store.add_element(
            Element::MindmapNode(child),
            AddOptions {
                select: false,
                push_history: false,
            },
        );
        store.set_selection([root_id]);

        drag(&mut tool, &mut store, Point::new(20.0, 20.0), Point::new(30.0, 40.0));

        assert_eq!(store.document().get(root_id).unwrap().position(), Point::new(10.0, 20.0));
        assert_eq!(
            store.document().get(child_id).unwrap().position(),
            Point::new(210.0, 120.0)
        );
    }
}
