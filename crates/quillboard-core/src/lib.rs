//! Quillboard Core Library
//!
//! Platform-agnostic runtime for the Quillboard infinite-canvas whiteboard:
//! the document store, history, tools, anchor resolution, and persistence.

pub mod anchor;
pub mod board;
pub mod camera;
pub mod element;
pub mod history;
pub mod input;
pub mod shortcuts;
pub mod storage;
pub mod store;
pub mod tools;

pub use anchor::{AnchorHit, COMMIT_SNAP_THRESHOLD, LIVE_SNAP_THRESHOLD, resolve_anchor};
pub use board::Board;
pub use camera::Camera;
pub use element::{Element, ElementId, ElementKind, ElementStyle};
pub use history::{DEFAULT_HISTORY_LIMIT, History, Snapshot};
pub use input::{Key, KeyEvent, Modifiers, MouseButton, MoveCoalescer, PointerEvent};
pub use shortcuts::ShortcutMap;
pub use store::{
    AddOptions, Document, DocumentProjection, DocumentStore, ElementPatch, RemoveOptions,
    StoreConfig, StoreEvent, UpdateOptions,
};
pub use tools::{Tool, ToolKind, ToolManager, ToolPreview, ToolResponse};
