//! Geometry of range selections: ordering points, resolving which nodes and
//! character runs a selection covers, and the caret stops used for movement.

use std::collections::HashMap;

use super::node::{NodeKey, NodeKind};
use super::selection::{Point, PointKind, RangeSelection, TextRange};
use super::state::EditorState;

impl EditorState {
    fn point_position(&self, point: &Point, order: &HashMap<NodeKey, usize>) -> (usize, usize) {
        let index = |key: NodeKey| order.get(&key).copied().unwrap_or(0);
        match point.kind {
            PointKind::Text => (index(point.key), point.offset),
            PointKind::Element => match self.children(point.key).get(point.offset) {
                Some(&child) => (index(child), 0),
                None => (index(self.last_descendant_or_self(point.key)), usize::MAX),
            },
        }
    }

    /// The selection's endpoints in document order.
    pub fn ordered_points(&self, range: &RangeSelection) -> (Point, Point) {
        let (_, order) = self.document_order();
        if self.point_position(&range.anchor, &order) <= self.point_position(&range.focus, &order)
        {
            (range.anchor, range.focus)
        } else {
            (range.focus, range.anchor)
        }
    }

    /// Rewrites an element point that sits next to a text node as a text point.
    pub fn resolve_point(&self, point: Point) -> Point {
        if point.kind == PointKind::Element {
            let children = self.children(point.key);
            if let Some(&child) = children.get(point.offset)
                && self.is_text(child)
            {
                return Point::text(child, 0);
            }
            if let Some(&child) = point.offset.checked_sub(1).and_then(|i| children.get(i))
                && self.is_text(child)
            {
                return Point::text(child, self.text_len(child));
            }
        }
        point
    }

    /// Resolved `(start, end)` of the current range selection.
    pub(crate) fn selection_bounds(&self) -> Option<(Point, Point, bool)> {
        let range = self.range_selection()?;
        let (start, end) = self.ordered_points(range);
        Some((
            self.resolve_point(start),
            self.resolve_point(end),
            range.is_collapsed(),
        ))
    }

    /// Half-open preorder window of nodes lying between `start` and `end`.
    fn window(
        &self,
        start: &Point,
        end: &Point,
        order: &HashMap<NodeKey, usize>,
    ) -> (usize, usize) {
        let index = |key: NodeKey| order.get(&key).copied().unwrap_or(0);
        let lo = match start.kind {
            PointKind::Text => index(start.key),
            PointKind::Element => match self.children(start.key).get(start.offset) {
                Some(&child) => index(child),
                None => index(self.last_descendant_or_self(start.key)) + 1,
            },
        };
        let hi = match end.kind {
            PointKind::Text => index(end.key) + 1,
            PointKind::Element => match end.offset.checked_sub(1) {
                None => index(end.key) + 1,
                Some(i) => match self.children(end.key).get(i) {
                    Some(&child) => index(self.last_descendant_or_self(child)) + 1,
                    None => index(self.last_descendant_or_self(end.key)) + 1,
                },
            },
        };
        (lo, hi)
    }

    /// The node the selection anchor rests in.
    pub fn anchor_node(&self) -> Option<NodeKey> {
        let range = self.range_selection()?;
        Some(self.resolve_point(range.anchor).key)
    }

    /// Every node the selection touches, in document order. A caret touches only
    /// the node it sits in.
    pub fn selected_nodes(&self) -> Vec<NodeKey> {
        let Some((start, end, collapsed)) = self.selection_bounds() else {
            return Vec::new();
        };
        if collapsed {
            return vec![start.key];
        }
        let (preorder, order) = self.document_order();
        let (lo, hi) = self.window(&start, &end, &order);
        preorder.get(lo..hi).map(<[_]>::to_vec).unwrap_or_default()
    }

    /// Character runs of every text node the selection touches. Runs may be empty
    /// when the selection only grazes a node's edge.
    pub fn selected_text_ranges(&self) -> Vec<TextRange> {
        let Some((start, end, collapsed)) = self.selection_bounds() else {
            return Vec::new();
        };
        if collapsed {
            return match start.kind {
                PointKind::Text => vec![TextRange {
                    key: start.key,
                    start: start.offset,
                    end: start.offset,
                }],
                PointKind::Element => Vec::new(),
            };
        }
        let (preorder, order) = self.document_order();
        let (lo, hi) = self.window(&start, &end, &order);
        preorder
            .get(lo..hi)
            .unwrap_or_default()
            .iter()
            .filter(|&&key| self.is_text(key))
            .map(|&key| {
                let len = self.text_len(key);
                let from = if key == start.key && start.is_text() {
                    start.offset.min(len)
                } else {
                    0
                };
                let to = if key == end.key && end.is_text() {
                    end.offset.min(len)
                } else {
                    len
                };
                TextRange {
                    key,
                    start: from,
                    end: to.max(from),
                }
            })
            .collect()
    }

    /// The selected characters as plain text, one line per block.
    pub fn selected_text(&self) -> String {
        let mut out = String::new();
        let mut block = None;
        for range in self.selected_text_ranges() {
            let Some(text) = self.text(range.key) else {
                continue;
            };
            let current = self.nearest_block(range.key);
            if block.is_some() && block != current {
                out.push('\n');
            }
            block = current;
            out.extend(
                text.text
                    .chars()
                    .skip(range.start)
                    .take(range.end - range.start),
            );
        }
        out
    }

    /// Leaf blocks covered by the selection, in document order.
    pub fn selected_blocks(&self) -> Vec<NodeKey> {
        let Some((start, end, _)) = self.selection_bounds() else {
            return Vec::new();
        };
        let mut blocks = Vec::new();
        let keys = std::iter::once(start.key)
            .chain(self.selected_nodes())
            .chain(std::iter::once(end.key));
        for key in keys {
            if let Some(block) = self.nearest_block(key)
                && !blocks.contains(&block)
            {
                blocks.push(block);
            }
        }
        let (_, order) = self.document_order();
        blocks.sort_by_key(|block| order.get(block).copied().unwrap_or(usize::MAX));
        blocks
    }

    /// Text or empty-block positions the caret can rest on, in document order.
    /// The end of one text node and the start of an adjacent one count once.
    pub(crate) fn caret_stops(&self) -> Vec<Point> {
        let mut stops = Vec::new();
        for block in self.leaf_blocks() {
            let mut previous_was_text = false;
            let mut any = false;
            for leaf in self.inline_leaves(block) {
                match self.text(leaf) {
                    Some(text) if !text.is_empty() => {
                        let first = usize::from(previous_was_text);
                        stops.extend((first..=text.len()).map(|offset| Point::text(leaf, offset)));
                        previous_was_text = true;
                        any = true;
                    }
                    Some(_) => {}
                    None => previous_was_text = false,
                }
            }
            if !any {
                stops.push(Point::element(block, 0));
            }
        }
        stops
    }

    fn inline_leaves(&self, block: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        for &child in self.children(block) {
            match self.kind(child) {
                Some(NodeKind::Link { .. }) => out.extend(self.inline_leaves(child)),
                Some(NodeKind::Text(_) | NodeKind::LineBreak) => out.push(child),
                _ => {}
            }
        }
        out
    }

    /// Index of the last stop at or before `point`.
    pub(crate) fn stop_index(&self, stops: &[Point], point: &Point) -> Option<usize> {
        let (_, order) = self.document_order();
        let target = self.point_position(&self.resolve_point(*point), &order);
        stops
            .iter()
            .rposition(|stop| self.point_position(stop, &order) <= target)
            .or(if stops.is_empty() { None } else { Some(0) })
    }
}
