use super::format::{TextFormat, TextFormatType};
use super::node::NodeKey;

/// Whether a point offset counts characters of a text node or children of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
    Text,
    Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub key: NodeKey,
    pub offset: usize,
    pub kind: PointKind,
}

impl Point {
    pub fn text(key: NodeKey, offset: usize) -> Self {
        Self {
            key,
            offset,
            kind: PointKind::Text,
        }
    }

    pub fn element(key: NodeKey, offset: usize) -> Self {
        Self {
            key,
            offset,
            kind: PointKind::Element,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == PointKind::Text
    }
}

/// A caret or contiguous range. `anchor` is where the selection started and may lie
/// after `focus` for backward selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSelection {
    pub anchor: Point,
    pub focus: Point,
    /// Format applied to the next inserted text.
    pub format: TextFormat,
    pub style: String,
}

impl RangeSelection {
    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
            format: TextFormat::empty(),
            style: String::new(),
        }
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    #[must_use]
    pub fn has_format(&self, format: TextFormatType) -> bool {
        self.format.has(format)
    }
}

/// Whole nodes selected as units, e.g. a horizontal rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSelection {
    pub keys: Vec<NodeKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Range(RangeSelection),
    Node(NodeSelection),
}

impl Selection {
    pub fn as_range(&self) -> Option<&RangeSelection> {
        match self {
            Selection::Range(range) => Some(range),
            Selection::Node(_) => None,
        }
    }

    pub fn as_range_mut(&mut self) -> Option<&mut RangeSelection> {
        match self {
            Selection::Range(range) => Some(range),
            Selection::Node(_) => None,
        }
    }
}

/// A run of selected characters inside one text node, `start..end` in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub key: NodeKey,
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
