//! Pointer and keyboard event types, plus per-frame move coalescing.
//!
//! Hosts translate their native events into these types and feed them to
//! the [`Board`](crate::board::Board). Coordinates are stage coordinates;
//! tools convert to world space through the camera.

use kurbo::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Modifier keys held during an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Self::NONE
    };

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Scroll {
        position: Point,
        delta_y: f64,
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Scroll { position, .. } => position,
        }
    }
}

/// Keys the board reacts to. Characters cover tool shortcuts; the rest are
/// the editing chords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Delete,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }
}

/// Latches the newest pointer move between frame ticks so that high-rate
/// pointer devices produce at most one tool update per frame. Down, up,
/// and scroll events bypass the coalescer; a pending move is flushed first
/// so ordering is preserved.
#[derive(Debug, Default)]
pub struct MoveCoalescer {
    pending: Option<PointerEvent>,
}

impl MoveCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb a move event; any previously latched move is replaced.
    pub fn push(&mut self, event: PointerEvent) {
        debug_assert!(matches!(event, PointerEvent::Move { .. }));
        self.pending = Some(event);
    }

    /// Take the latched move, if any. Called on frame tick and before any
    /// non-move event is dispatched.
    pub fn flush(&mut self) -> Option<PointerEvent> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
