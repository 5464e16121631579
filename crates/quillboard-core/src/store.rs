//! Document store: the single mutable source of truth for the canvas.
//!
//! All committed state flows through this store so that history,
//! persistence, and renderer subscribers stay consistent. Tools hold only
//! transient ids and cached positions, never authoritative geometry.

use crate::anchor;
use crate::camera::Camera;
use crate::element::{Element, ElementId, ElementKind, ElementStyle, point_to_polyline_dist};
use crate::history::{DEFAULT_HISTORY_LIMIT, History, Snapshot};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Change notification pushed to subscribers after every committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// Element set, payloads, or z-order changed.
    ElementsChanged,
    /// Selection set changed.
    SelectionChanged,
    /// Pan or zoom changed.
    ViewportChanged,
}

/// Handle returned by `DocumentStore::subscribe`.
pub type SubscriptionId = u64;

/// Options for `add_element`.
#[derive(Debug, Clone, Copy)]
pub struct AddOptions {
    /// Replace the selection with the new element.
    pub select: bool,
    /// Record an undo entry for the insertion.
    pub push_history: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            select: false,
            push_history: true,
        }
    }
}

/// Options for `update_element` and `update_element_with`.
#[derive(Debug, Clone, Copy)]
pub struct UpdateOptions {
    pub push_history: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self { push_history: true }
    }
}

/// Options for `remove_element`.
#[derive(Debug, Clone, Copy)]
pub struct RemoveOptions {
    pub push_history: bool,
}

impl Default for RemoveOptions {
    fn default() -> Self {
        Self { push_history: true }
    }
}

/// Shallow patch applied to an element's common fields. Unset fields are
/// left untouched; non-finite values are ignored.
#[derive(Debug, Clone, Default)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub style: Option<ElementStyle>,
}

impl ElementPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }
}

/// The element collection plus selection: ordered (z-order = paint order,
/// later = on top) and indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: HashMap<ElementId, Element>,
    z_order: Vec<ElementId>,
    selection: HashSet<ElementId>,
    /// Derived mindmap parent→children adjacency, rebuilt on structural
    /// change so descendant traversal stays inside the store.
    children: HashMap<ElementId, Vec<ElementId>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in z-order (back to front).
    pub fn ordered(&self) -> impl Iterator<Item = &Element> {
        self.z_order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Z-order ids, back to front.
    pub fn z_order(&self) -> &[ElementId] {
        &self.z_order
    }

    pub fn selection(&self) -> &HashSet<ElementId> {
        &self.selection
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    /// Direct mindmap children of a node.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// All mindmap descendants of a node, depth-first.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children_of(id).to_vec();
        while let Some(next) = stack.pop() {
            stack.extend_from_slice(self.children_of(next));
            out.push(next);
        }
        out
    }

    /// Bounding box of an element with connector/edge anchors resolved.
    /// `None` for edges whose endpoints are all dangling.
    pub fn element_bounds(&self, id: ElementId) -> Option<Rect> {
        let element = self.get(id)?;
        match element {
            Element::Connector(c) => {
                anchor::connector_points(self, c).map(|(a, b)| Rect::from_points(a, b))
            }
            Element::MindmapEdge(e) => {
                anchor::edge_points(self, e).map(|(a, b)| Rect::from_points(a, b))
            }
            _ => Some(element.bounds()),
        }
    }

    /// Hit test against an element, resolving derived geometry.
    pub fn hit_test_element(&self, element: &Element, point: Point, tolerance: f64) -> bool {
        match element {
            Element::Connector(c) => anchor::connector_points(self, c).is_some_and(|(a, b)| {
                point_to_polyline_dist(point, &[a, b])
                    <= tolerance + element.style().stroke_width / 2.0
            }),
            Element::MindmapEdge(e) => anchor::edge_points(self, e).is_some_and(|(a, b)| {
                point_to_polyline_dist(point, &[a, b])
                    <= tolerance + element.style().stroke_width / 2.0
            }),
            _ => element.hit_test(point, tolerance),
        }
    }

    /// Topmost element whose geometry contains the point.
    pub fn topmost_at(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.z_order.iter().rev().copied().find(|&id| {
            self.elements
                .get(&id)
                .is_some_and(|el| self.hit_test_element(el, point, tolerance))
        })
    }

    /// Ids of all elements whose resolved bounds intersect the rectangle,
    /// in z-order.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.z_order
            .iter()
            .copied()
            .filter(|&id| {
                self.element_bounds(id).is_some_and(|b| {
                    let i = rect.intersect(b.inflate(1.0, 1.0));
                    i.width() > 0.0 && i.height() > 0.0
                })
            })
            .collect()
    }

    /// Union bounds of all elements.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for &id in &self.z_order {
            if let Some(b) = self.element_bounds(id) {
                result = Some(match result {
                    Some(r) => r.union(b),
                    None => b,
                });
            }
        }
        result
    }

    /// Candidate (id, bounds) pairs for connector anchoring: every element
    /// with solid box geometry. Connectors, edges, and freehand strokes are
    /// not anchorable.
    pub fn anchor_candidates(&self) -> Vec<(ElementId, Rect)> {
        self.z_order
            .iter()
            .filter_map(|&id| {
                let el = self.elements.get(&id)?;
                match el.kind() {
                    ElementKind::Connector | ElementKind::MindmapEdge | ElementKind::Drawing => {
                        None
                    }
                    _ => Some((id, el.bounds())),
                }
            })
            .collect()
    }

    fn insert(&mut self, element: Element) {
        let id = element.id();
        self.z_order.push(id);
        self.elements.insert(id, element);
        self.rebuild_children();
    }

    fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.z_order.retain(|&other| other != id);
        self.selection.remove(&id);
        let removed = self.elements.remove(&id);
        if removed.is_some() {
            self.rebuild_children();
        }
        removed
    }

    fn rebuild_children(&mut self) {
        self.children.clear();
        for &id in &self.z_order {
            if let Some(node) = self.elements.get(&id).and_then(Element::as_mindmap_node) {
                // Dangling parent references are treated as roots.
                if let Some(parent) = node.parent.filter(|p| self.elements.contains_key(p)) {
                    self.children.entry(parent).or_default().push(id);
                }
            }
        }
    }
}

/// Serializable projection of the store, consumed by the persistence layer.
/// Image payloads are excluded (the `blob_ref` travels, the bytes do not).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentProjection {
    /// Elements in z-order (back to front).
    pub elements: Vec<Element>,
    pub selection: Vec<ElementId>,
    pub camera: Camera,
}

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub history_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

type SubscriberFn = Box<dyn FnMut(&StoreEvent)>;

/// The mutable document plus camera, undo history, and change subscribers.
pub struct DocumentStore {
    doc: Document,
    camera: Camera,
    history: History,
    subscribers: Vec<(SubscriptionId, SubscriberFn)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("doc", &self.doc)
            .field("camera", &self.camera)
            .field("history", &self.history)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            doc: Document::new(),
            camera: Camera::new(),
            history: History::new(config.history_limit),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    // --- subscriptions -----------------------------------------------------

    /// Register a change subscriber (renderer, persistence, ...).
    pub fn subscribe(&mut self, callback: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(&event);
        }
    }

    // --- element mutation --------------------------------------------------

    /// Insert an element at the end of the z-order. Silent no-op when an
    /// element with the same id already exists.
    pub fn add_element(&mut self, element: Element, opts: AddOptions) {
        let id = element.id();
        if self.doc.contains(id) {
            log::debug!("add_element: duplicate id {id}, ignoring");
            return;
        }
        if opts.push_history {
            let before = self.snapshot();
            self.history.record(before, "add element");
        }
        self.doc.insert(element);
        if opts.select {
            self.doc.selection.clear();
            self.doc.selection.insert(id);
        }
        self.notify(StoreEvent::ElementsChanged);
        if opts.select {
            self.notify(StoreEvent::SelectionChanged);
        }
    }

    /// Shallow-merge a patch into an element. No-op if the id is absent.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch, opts: UpdateOptions) {
        if !self.doc.contains(id) {
            return;
        }
        if opts.push_history {
            let before = self.snapshot();
            self.history.record(before, "update element");
        }
        let Some(element) = self.doc.elements.get_mut(&id) else {
            return;
        };
        if let (Some(x), Some(y)) = (patch.x, patch.y) {
            if x.is_finite() && y.is_finite() {
                let current = element.position();
                element.translate(Vec2::new(x - current.x, y - current.y));
            }
        }
        if let (Some(w), Some(h)) = (patch.width, patch.height) {
            element.set_size(w, h);
        }
        if let Some(style) = patch.style {
            *element.style_mut() = style;
        }
        self.notify(StoreEvent::ElementsChanged);
    }

    /// Apply a payload-level edit through a closure. The edit is discarded
    /// (and logged) if it would change the element's kind or id.
    pub fn update_element_with(
        &mut self,
        id: ElementId,
        opts: UpdateOptions,
        f: impl FnOnce(&mut Element),
    ) {
        let Some(original) = self.doc.get(id) else {
            return;
        };
        let kind = original.kind();
        let mut edited = original.clone();
        f(&mut edited);
        if edited.kind() != kind || edited.id() != id {
            log::warn!("update_element_with: kind/id change rejected for {id}");
            return;
        }
        if opts.push_history {
            let before = self.snapshot();
            self.history.record(before, "update element");
        }
        self.doc.elements.insert(id, edited);
        self.notify(StoreEvent::ElementsChanged);
    }

    /// Remove an element. The id is always purged from the selection to
    /// preserve `selection ⊆ elements`.
    pub fn remove_element(&mut self, id: ElementId, opts: RemoveOptions) -> Option<Element> {
        if !self.doc.contains(id) {
            return None;
        }
        if opts.push_history {
            let before = self.snapshot();
            self.history.record(before, "remove element");
        }
        let was_selected = self.doc.is_selected(id);
        let removed = self.doc.remove(id);
        self.notify(StoreEvent::ElementsChanged);
        if was_selected {
            self.notify(StoreEvent::SelectionChanged);
        }
        removed
    }

    /// Move an element to the top of the z-order.
    pub fn bring_to_front(&mut self, id: ElementId) {
        if !self.doc.contains(id) {
            return;
        }
        self.doc.z_order.retain(|&other| other != id);
        self.doc.z_order.push(id);
        self.notify(StoreEvent::ElementsChanged);
    }

    /// Move an element to the bottom of the z-order.
    pub fn send_to_back(&mut self, id: ElementId) {
        if !self.doc.contains(id) {
            return;
        }
        self.doc.z_order.retain(|&other| other != id);
        self.doc.z_order.insert(0, id);
        self.notify(StoreEvent::ElementsChanged);
    }

    // --- selection ---------------------------------------------------------

    /// Replace the selection wholesale; unknown ids are silently dropped.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        let filtered: HashSet<ElementId> =
            ids.into_iter().filter(|id| self.doc.contains(*id)).collect();
        if filtered != self.doc.selection {
            self.doc.selection = filtered;
            self.notify(StoreEvent::SelectionChanged);
        }
    }

    /// Toggle one element's selection membership.
    pub fn toggle_selection(&mut self, id: ElementId) {
        if !self.doc.contains(id) {
            return;
        }
        if !self.doc.selection.remove(&id) {
            self.doc.selection.insert(id);
        }
        self.notify(StoreEvent::SelectionChanged);
    }

    pub fn clear_selection(&mut self) {
        if !self.doc.selection.is_empty() {
            self.doc.selection.clear();
            self.notify(StoreEvent::SelectionChanged);
        }
    }

    // --- viewport ----------------------------------------------------------

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.camera.pan(Vec2::new(dx, dy));
            self.notify(StoreEvent::ViewportChanged);
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
        self.notify(StoreEvent::ViewportChanged);
    }

    /// Zoom keeping the world point under the stage pointer fixed.
    pub fn zoom_at(&mut self, stage_point: Point, factor: f64) {
        self.camera.zoom_at(stage_point, factor);
        self.notify(StoreEvent::ViewportChanged);
    }

    // --- history -----------------------------------------------------------

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.doc.elements.clone(),
            z_order: self.doc.z_order.clone(),
            selection: self.doc.selection.clone(),
            camera: self.camera.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.doc.elements = snapshot.elements;
        self.doc.z_order = snapshot.z_order;
        self.doc.selection = snapshot.selection;
        self.camera = snapshot.camera;
        self.doc.rebuild_children();
        self.notify(StoreEvent::ElementsChanged);
        self.notify(StoreEvent::SelectionChanged);
        self.notify(StoreEvent::ViewportChanged);
    }

    /// Run a sequence of store calls as one atomic undo step.
    pub fn with_undo(&mut self, description: &str, f: impl FnOnce(&mut Self)) {
        let before = self.snapshot();
        self.history.begin_batch(&before, description);
        f(self);
        self.history.end_batch(true);
    }

    /// Like `with_undo`, but rolls the document back to the pre-batch state
    /// when the mutator fails, recording nothing.
    pub fn try_with_undo<T, E>(
        &mut self,
        description: &str,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let before = self.snapshot();
        self.history.begin_batch(&before, description);
        match f(self) {
            Ok(value) => {
                self.history.end_batch(true);
                Ok(value)
            }
            Err(err) => {
                if let Some(rollback) = self.history.end_batch(false) {
                    self.restore(rollback);
                }
                Err(err)
            }
        }
    }

    /// Open a history batch directly. Prefer `with_undo`; the tool layer
    /// uses this pair for gestures that span multiple events.
    pub fn begin_batch(&mut self, label: &str) {
        let before = self.snapshot();
        self.history.begin_batch(&before, label);
    }

    /// Close a history batch; aborting restores the pre-batch state.
    pub fn end_batch(&mut self, commit: bool) {
        if let Some(rollback) = self.history.end_batch(commit) {
            self.restore(rollback);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    // --- persistence projection --------------------------------------------

    /// Serializable projection: ordered elements, selection, viewport.
    pub fn projection(&self) -> DocumentProjection {
        DocumentProjection {
            elements: self.doc.ordered().cloned().collect(),
            selection: self
                .doc
                .z_order
                .iter()
                .copied()
                .filter(|id| self.doc.selection.contains(id))
                .collect(),
            camera: self.camera.clone(),
        }
    }

    /// Build a fresh store from a projection. Ids are restored verbatim;
    /// selection entries without a matching element are dropped.
    pub fn from_projection(projection: DocumentProjection, config: StoreConfig) -> Self {
        let mut store = Self::with_config(config);
        for element in projection.elements {
            store.add_element(
                element,
                AddOptions {
                    select: false,
                    push_history: false,
                },
            );
        }
        store.camera = projection.camera;
        store.set_selection(projection.selection);
        store
    }
}
