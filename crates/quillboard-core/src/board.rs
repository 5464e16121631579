//! Session facade: one board = one store + tool registry + input plumbing.

use crate::input::{Key, KeyEvent, MoveCoalescer, PointerEvent};
use crate::shortcuts::ShortcutMap;
use crate::store::{DocumentStore, RemoveOptions};
use crate::tools::{ImageSlot, ImageSource, ToolKind, ToolManager, ToolPreview};
use kurbo::Point;

/// Scroll-to-zoom sensitivity (factor per scroll unit).
const ZOOM_SCROLL_RATE: f64 = 0.0015;

/// Ties the store, the tool registry, the shortcut map, and the move
/// coalescer together behind the host-facing event API. Hosts feed raw
/// stage-space events in; the board guarantees ordering (a latched move is
/// flushed before any up) and routes everything to the active tool.
pub struct Board {
    store: DocumentStore,
    tools: ToolManager,
    shortcuts: ShortcutMap,
    coalescer: MoveCoalescer,
    image_slot: ImageSlot,
    /// While a text editor overlay has focus, character shortcuts are
    /// suppressed.
    text_focus: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self::with_store(DocumentStore::new())
    }

    pub fn with_store(store: DocumentStore) -> Self {
        let image_slot = ImageSlot::new();
        Self {
            store,
            tools: ToolManager::with_defaults(image_slot.clone()),
            shortcuts: ShortcutMap::default(),
            coalescer: MoveCoalescer::new(),
            image_slot,
            text_focus: false,
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DocumentStore {
        &mut self.store
    }

    pub fn active_tool(&self) -> ToolKind {
        self.tools.active()
    }

    pub fn set_tool(&mut self, kind: ToolKind) {
        self.tools.activate(kind, &mut self.store);
    }

    /// Preview of the active tool's in-flight gesture, for the render layer.
    pub fn preview(&self) -> ToolPreview {
        self.tools.preview()
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutMap {
        &mut self.shortcuts
    }

    pub fn set_text_focus(&mut self, focused: bool) {
        self.text_focus = focused;
    }

    /// Park a decoded image for the image tool, and switch to it.
    pub fn prepare_image(&mut self, source: ImageSource) {
        self.image_slot.set(source);
        self.set_tool(ToolKind::Image);
    }

    /// Feed one pointer event. Moves are latched until the next frame tick;
    /// down/up/scroll flush any latched move first so the tool never sees
    /// events out of order.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Move { .. } => {
                self.coalescer.push(event);
            }
            PointerEvent::Down {
                position,
                modifiers,
                ..
            } => {
                self.flush_pending_move();
                self.tools.pointer_down(&mut self.store, position, modifiers);
            }
            PointerEvent::Up {
                position,
                modifiers,
                ..
            } => {
                self.flush_pending_move();
                self.tools.pointer_up(&mut self.store, position, modifiers);
            }
            PointerEvent::Scroll {
                position, delta_y, ..
            } => {
                self.flush_pending_move();
                let factor = (-delta_y * ZOOM_SCROLL_RATE).exp();
                self.store.zoom_at(position, factor);
            }
        }
    }

    /// Frame tick: apply at most the newest latched pointer move.
    pub fn frame_tick(&mut self) {
        self.flush_pending_move();
    }

    fn flush_pending_move(&mut self) {
        if let Some(PointerEvent::Move {
            position,
            modifiers,
        }) = self.coalescer.flush()
        {
            self.tools.pointer_move(&mut self.store, position, modifiers);
        }
    }

    /// Feed one key event. Returns true if the board consumed it.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        match event.key {
            Key::Escape => {
                // Abort the gesture, then fall back to select.
                self.tools.cancel_active(&mut self.store);
                self.set_tool(ToolKind::Select);
                true
            }
            Key::Delete | Key::Backspace if !self.text_focus => {
                self.delete_selection();
                true
            }
            Key::Char(c) if event.modifiers.command() => match c.to_ascii_lowercase() {
                'z' if event.modifiers.shift => self.store.redo(),
                'z' => self.store.undo(),
                'y' => self.store.redo(),
                _ => false,
            },
            Key::Char(c) if !self.text_focus => match self.shortcuts.lookup(c) {
                Some(kind) => {
                    self.set_tool(kind);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Delete every selected element as one undo step.
    pub fn delete_selection(&mut self) {
        let ids: Vec<_> = self.store.document().selection().iter().copied().collect();
        if ids.is_empty() {
            return;
        }
        self.store.with_undo("delete selection", |store| {
            for id in ids {
                store.remove_element(id, RemoveOptions { push_history: false });
            }
        });
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("active_tool", &self.tools.active())
            .field("elements", &self.store.document().len())
            .finish()
    }
}
