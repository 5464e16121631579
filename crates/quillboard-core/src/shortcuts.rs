//! Data-driven keyboard shortcut map for tool switching.

use crate::tools::ToolKind;
use std::collections::HashMap;

/// Maps single characters to tools. The map is plain data so hosts can
/// rebind or extend it without touching the dispatch path.
#[derive(Debug, Clone)]
pub struct ShortcutMap {
    bindings: HashMap<char, ToolKind>,
}

impl Default for ShortcutMap {
    fn default() -> Self {
        let bindings = [
            ('v', ToolKind::Select),
            ('h', ToolKind::Pan),
            ('p', ToolKind::Pen),
            ('m', ToolKind::Marker),
            ('g', ToolKind::Highlighter),
            ('e', ToolKind::Eraser),
            ('r', ToolKind::Rectangle),
            ('o', ToolKind::Ellipse),
            ('d', ToolKind::Diamond),
            ('l', ToolKind::ConnectorLine),
            ('a', ToolKind::ConnectorArrow),
            ('t', ToolKind::Text),
            ('s', ToolKind::Sticky),
            ('b', ToolKind::Table),
            ('n', ToolKind::Mindmap),
            ('i', ToolKind::Image),
        ]
        .into_iter()
        .collect();
        Self { bindings }
    }
}

impl ShortcutMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a binding, case-insensitively.
    pub fn lookup(&self, c: char) -> Option<ToolKind> {
        c.to_lowercase().next().and_then(|c| self.bindings.get(&c)).copied()
    }

    /// Bind or rebind a character. An existing binding for the character is
    /// replaced.
    pub fn bind(&mut self, c: char, tool: ToolKind) {
        if let Some(lower) = c.to_lowercase().next() {
            self.bindings.insert(lower, tool);
        }
    }

    pub fn unbind(&mut self, c: char) {
        if let Some(lower) = c.to_lowercase().next() {
            self.bindings.remove(&lower);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_tool() {
        let map = ShortcutMap::default();
        assert_eq!(map.lookup('v'), Some(ToolKind::Select));
        assert_eq!(map.lookup('V'), Some(ToolKind::Select));
        assert_eq!(map.lookup('r'), Some(ToolKind::Rectangle));
        assert_eq!(map.lookup('z'), None);
    }

    #[test]
    fn test_rebind_replaces_existing() {
        let mut map = ShortcutMap::default();
        map.bind('r', ToolKind::Ellipse);
        assert_eq!(map.lookup('r'), Some(ToolKind::Ellipse));
        map.unbind('r');
        assert_eq!(map.lookup('r'), None);
    }
}
