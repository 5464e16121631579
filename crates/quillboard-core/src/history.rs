//! Snapshot-based undo/redo with gesture batching.

use crate::camera::Camera;
use crate::element::{Element, ElementId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;

/// Default bound on the undo stack.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A full capture of document state, enough to restore it exactly.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub elements: HashMap<ElementId, Element>,
    pub z_order: Vec<ElementId>,
    pub selection: HashSet<ElementId>,
    pub camera: Camera,
}

/// One undoable step: the state to restore plus bookkeeping.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// State before the mutation this entry represents.
    pub before: Snapshot,
    /// Human-readable description (e.g. "move 3 elements").
    pub description: String,
    /// When the entry was recorded.
    pub at: Instant,
}

/// Linear two-stack history with nested batching.
///
/// A batch groups 1..N mutations under one entry so an interactive gesture
/// produces exactly one undo step. Batches nest; only the outermost commit
/// records an entry, and an aborted outermost batch hands back its "before"
/// snapshot for the caller to restore.
#[derive(Debug)]
pub struct History {
    past: VecDeque<HistoryEntry>,
    future: Vec<HistoryEntry>,
    batch_depth: usize,
    batch_before: Option<(Snapshot, String)>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            batch_depth: 0,
            batch_before: None,
            limit: limit.max(1),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    /// Record a single mutation with its pre-state. Ignored while a batch is
    /// open (the batch's own "before" snapshot covers it).
    pub fn record(&mut self, before: Snapshot, description: impl Into<String>) {
        if self.in_batch() {
            return;
        }
        self.push_entry(HistoryEntry {
            before,
            description: description.into(),
            at: Instant::now(),
        });
    }

    /// Open a batch. On the outermost call, captures the pre-batch state.
    pub fn begin_batch(&mut self, current: &Snapshot, label: impl Into<String>) {
        self.batch_depth += 1;
        if self.batch_depth == 1 {
            self.batch_before = Some((current.clone(), label.into()));
        }
    }

    /// Close a batch. At the outermost level: when committing, one entry is
    /// recorded and `None` returned; when aborting, the pre-batch snapshot is
    /// returned for the caller to restore, and nothing is recorded.
    pub fn end_batch(&mut self, commit: bool) -> Option<Snapshot> {
        if self.batch_depth == 0 {
            return None;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return None;
        }

        let (before, label) = self.batch_before.take()?;
        if commit {
            self.push_entry(HistoryEntry {
                before,
                description: label,
                at: Instant::now(),
            });
            None
        } else {
            Some(before)
        }
    }

    /// Pop the last entry; `current` is pushed onto the redo stack and the
    /// entry's pre-state is returned for the store to apply.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let entry = self.past.pop_back()?;
        let description = entry.description.clone();
        self.future.push(HistoryEntry {
            before: current,
            description,
            at: Instant::now(),
        });
        Some(entry.before)
    }

    /// Symmetric to `undo`, using the future stack.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let entry = self.future.pop()?;
        let description = entry.description.clone();
        self.past.push_back(HistoryEntry {
            before: current,
            description,
            at: Instant::now(),
        });
        Some(entry.before)
    }

    /// Number of undoable entries.
    pub fn depth(&self) -> usize {
        self.past.len()
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.past.push_back(entry);
        // Any new mutation invalidates the redo stack.
        self.future.clear();
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}
