use std::collections::{HashMap, HashSet};

use super::error::EditorError;
use super::format::TextFormat;
use super::node::{Node, NodeKey, NodeKind, TextNode};
use super::selection::{NodeSelection, Point, PointKind, RangeSelection, Selection};

/// Byte index of the `char_idx`-th character, clamped to the end of `s`.
pub(crate) fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// An immutable-by-convention snapshot of the document tree plus its selection.
///
/// Nodes live in an arena addressed by [`NodeKey`]. Keys are never reused within one
/// state, so a key captured before an edit either still names the same node or
/// resolves to nothing.
///
/// All mutation happens on a working copy inside [`Editor::update`](super::Editor::update);
/// readers only ever see committed states.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    nodes: Vec<Option<Node>>,
    selection: Option<Selection>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// A document holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::new(NodeKind::Root))],
            selection: None,
        }
    }

    // ----- lookup -----

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key.index()).and_then(Option::as_mut)
    }

    pub fn get(&self, key: NodeKey) -> Result<&Node, EditorError> {
        self.node(key).ok_or(EditorError::NodeNotFound(key))
    }

    fn get_mut(&mut self, key: NodeKey) -> Result<&mut Node, EditorError> {
        self.node_mut(key).ok_or(EditorError::NodeNotFound(key))
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.node(key).is_some()
    }

    pub fn kind(&self, key: NodeKey) -> Option<&NodeKind> {
        self.node(key).map(Node::kind)
    }

    pub fn kind_mut(&mut self, key: NodeKey) -> Result<&mut NodeKind, EditorError> {
        Ok(&mut self.get_mut(key)?.kind)
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.node(key).map_or(&[], |node| node.children.as_slice())
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.node(key).and_then(|node| node.parent)
    }

    pub fn index_in_parent(&self, key: NodeKey) -> Option<usize> {
        let parent = self.parent(key)?;
        self.children(parent).iter().position(|&child| child == key)
    }

    pub fn previous_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let index = self.index_in_parent(key)?;
        let parent = self.parent(key)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    pub fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let index = self.index_in_parent(key)?;
        let parent = self.parent(key)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn next_siblings(&self, key: NodeKey) -> Vec<NodeKey> {
        match (self.parent(key), self.index_in_parent(key)) {
            (Some(parent), Some(index)) => self.children(parent)[index + 1..].to_vec(),
            _ => Vec::new(),
        }
    }

    pub fn first_child(&self, key: NodeKey) -> Option<NodeKey> {
        self.children(key).first().copied()
    }

    pub fn last_child(&self, key: NodeKey) -> Option<NodeKey> {
        self.children(key).last().copied()
    }

    /// Whether `key` is reachable from the root.
    pub fn is_attached(&self, key: NodeKey) -> bool {
        let mut current = key;
        loop {
            if current == NodeKey::ROOT {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn text(&self, key: NodeKey) -> Option<&TextNode> {
        self.kind(key).and_then(NodeKind::as_text)
    }

    pub fn text_mut(&mut self, key: NodeKey) -> Result<&mut TextNode, EditorError> {
        match &mut self.get_mut(key)?.kind {
            NodeKind::Text(text) => Ok(text),
            _ => Err(EditorError::NotText(key)),
        }
    }

    pub fn is_text(&self, key: NodeKey) -> bool {
        self.text(key).is_some()
    }

    /// Length in characters of a text node; zero for anything else.
    pub fn text_len(&self, key: NodeKey) -> usize {
        self.text(key).map_or(0, TextNode::len)
    }

    // ----- creation and attachment -----

    /// Creates a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeKey {
        let key = NodeKey(self.nodes.len() as u32);
        self.nodes.push(Some(Node::new(kind)));
        key
    }

    pub fn create_text(&mut self, text: impl Into<String>, format: TextFormat) -> NodeKey {
        self.create(NodeKind::Text(TextNode::new(text, format)))
    }

    fn check_child(&self, parent: NodeKey, child: NodeKey) -> Result<(), EditorError> {
        let holder = self.get(parent)?;
        self.get(child)?;
        let invalid = EditorError::InvalidChild { parent, child };
        if !holder.kind.is_element() || child == NodeKey::ROOT {
            return Err(invalid);
        }
        let mut current = Some(parent);
        while let Some(key) = current {
            if key == child {
                return Err(invalid);
            }
            current = self.parent(key);
        }
        Ok(())
    }

    fn detach(&mut self, key: NodeKey) {
        let Some(parent) = self.parent(key) else {
            return;
        };
        if let Some(holder) = self.node_mut(parent) {
            holder.children.retain(|&child| child != key);
        }
        if let Some(node) = self.node_mut(key) {
            node.parent = None;
        }
    }

    /// Moves `child` (attached or not) to position `index` under `parent`.
    pub fn insert_child(
        &mut self,
        parent: NodeKey,
        index: usize,
        child: NodeKey,
    ) -> Result<(), EditorError> {
        self.check_child(parent, child)?;
        self.detach(child);
        let holder = self.get_mut(parent)?;
        let index = index.min(holder.children.len());
        holder.children.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn append(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), EditorError> {
        self.insert_child(parent, usize::MAX, child)
    }

    pub fn insert_before(&mut self, target: NodeKey, node: NodeKey) -> Result<(), EditorError> {
        let parent = self.parent(target).ok_or(EditorError::Detached(target))?;
        self.check_child(parent, node)?;
        self.detach(node);
        let index = self
            .index_in_parent(target)
            .ok_or(EditorError::Detached(target))?;
        self.insert_child(parent, index, node)
    }

    pub fn insert_after(&mut self, target: NodeKey, node: NodeKey) -> Result<(), EditorError> {
        let parent = self.parent(target).ok_or(EditorError::Detached(target))?;
        self.check_child(parent, node)?;
        self.detach(node);
        let index = self
            .index_in_parent(target)
            .ok_or(EditorError::Detached(target))?;
        self.insert_child(parent, index + 1, node)
    }

    /// Appends every child of `from` to `to`, preserving order.
    pub fn move_children(&mut self, from: NodeKey, to: NodeKey) -> Result<(), EditorError> {
        for child in self.children(from).to_vec() {
            self.append(to, child)?;
        }
        Ok(())
    }

    /// Removes `key` and its whole subtree. Selection points inside the subtree move
    /// to the position the node used to occupy.
    pub fn remove(&mut self, key: NodeKey) -> Result<(), EditorError> {
        if key == NodeKey::ROOT {
            return Err(EditorError::RootImmutable);
        }
        self.get(key)?;
        let subtree: HashSet<NodeKey> = self.subtree(key).into_iter().collect();
        if let (Some(parent), Some(index)) = (self.parent(key), self.index_in_parent(key)) {
            let fallback = self.sibling_point(key, parent, index);
            self.for_each_point(|point| {
                if subtree.contains(&point.key) {
                    *point = fallback;
                }
            });
            self.detach(key);
        }
        if let Some(Selection::Node(selection)) = &mut self.selection {
            selection.keys.retain(|k| !subtree.contains(k));
        }
        for k in subtree {
            self.nodes[k.index()] = None;
        }
        Ok(())
    }

    fn sibling_point(&self, key: NodeKey, parent: NodeKey, index: usize) -> Point {
        if let Some(previous) = self.previous_sibling(key)
            && self.is_text(previous)
        {
            return Point::text(previous, self.text_len(previous));
        }
        if let Some(next) = self.next_sibling(key)
            && self.is_text(next)
        {
            return Point::text(next, 0);
        }
        Point::element(parent, index)
    }

    /// Puts `with` where `key` is and removes `key`, optionally carrying its children over.
    pub fn replace(
        &mut self,
        key: NodeKey,
        with: NodeKey,
        include_children: bool,
    ) -> Result<NodeKey, EditorError> {
        if key == NodeKey::ROOT {
            return Err(EditorError::RootImmutable);
        }
        self.insert_before(key, with)?;
        if include_children {
            self.move_children(key, with)?;
            self.retarget_points(key, with);
        }
        self.remove(key)?;
        Ok(with)
    }

    /// Lifts the children of `key` into its parent and drops `key` itself.
    pub fn unwrap_element(&mut self, key: NodeKey) -> Result<(), EditorError> {
        for child in self.children(key).to_vec() {
            self.insert_before(key, child)?;
        }
        self.remove(key)
    }

    pub(crate) fn retarget_points(&mut self, from: NodeKey, to: NodeKey) {
        self.for_each_point(|point| {
            if point.key == from && point.kind == PointKind::Element {
                point.key = to;
            }
        });
    }

    fn for_each_point(&mut self, mut f: impl FnMut(&mut Point)) {
        if let Some(Selection::Range(range)) = &mut self.selection {
            f(&mut range.anchor);
            f(&mut range.focus);
        }
    }

    // ----- text -----

    /// Splits a text node at the given character offsets. The first part keeps `key`;
    /// the rest are new siblings inserted after it. Offsets at either end are ignored,
    /// so splitting at `0` or at the length returns `[key]`.
    pub fn split_text(
        &mut self,
        key: NodeKey,
        offsets: &[usize],
    ) -> Result<Vec<NodeKey>, EditorError> {
        let node = self.text(key).ok_or(EditorError::NotText(key))?.clone();
        let chars: Vec<char> = node.text.chars().collect();
        let mut cuts: Vec<usize> = offsets
            .iter()
            .copied()
            .filter(|&offset| offset > 0 && offset < chars.len())
            .collect();
        cuts.sort_unstable();
        cuts.dedup();
        if cuts.is_empty() {
            return Ok(vec![key]);
        }

        let mut bounds = vec![0];
        bounds.extend(cuts);
        bounds.push(chars.len());

        let attached = self.parent(key).is_some();
        let mut parts = vec![key];
        let mut previous = key;
        for window in bounds.windows(2).skip(1) {
            let part = self.create(NodeKind::Text(TextNode {
                text: chars[window[0]..window[1]].iter().collect(),
                format: node.format,
                style: node.style.clone(),
            }));
            if attached {
                self.insert_after(previous, part)?;
            }
            parts.push(part);
            previous = part;
        }
        self.text_mut(key)?.text = chars[..bounds[1]].iter().collect();

        let spans: Vec<(NodeKey, usize, usize)> = parts
            .iter()
            .zip(bounds.windows(2))
            .map(|(&part, window)| (part, window[0], window[1]))
            .collect();
        self.for_each_point(|point| {
            if point.kind != PointKind::Text || point.key != key {
                return;
            }
            if let Some(&(part, start, _)) = spans
                .iter()
                .find(|(_, start, end)| point.offset > *start && point.offset <= *end)
            {
                point.key = part;
                point.offset -= start;
            }
        });
        Ok(parts)
    }

    /// Splits a text node at one offset, returning the parts before and after it.
    pub fn split_at(
        &mut self,
        key: NodeKey,
        offset: usize,
    ) -> Result<(Option<NodeKey>, Option<NodeKey>), EditorError> {
        let len = self.text(key).ok_or(EditorError::NotText(key))?.len();
        if offset == 0 {
            return Ok((None, Some(key)));
        }
        if offset >= len {
            return Ok((Some(key), None));
        }
        let parts = self.split_text(key, &[offset])?;
        Ok((parts.first().copied(), parts.get(1).copied()))
    }

    /// Plain text of a subtree; sibling blocks are separated by a blank line.
    pub fn text_content(&self, key: NodeKey) -> String {
        let mut out = String::new();
        self.collect_text(key, &mut out);
        out
    }

    fn collect_text(&self, key: NodeKey, out: &mut String) {
        match self.kind(key) {
            Some(NodeKind::Text(text)) => out.push_str(&text.text),
            Some(NodeKind::LineBreak) => out.push('\n'),
            Some(NodeKind::HorizontalRule) | None => {}
            Some(_) => {
                let children = self.children(key);
                for (i, &child) in children.iter().enumerate() {
                    self.collect_text(child, out);
                    let is_block = self
                        .kind(child)
                        .is_some_and(|kind| kind.is_element() && !kind.is_inline());
                    if is_block && i + 1 < children.len() {
                        out.push_str("\n\n");
                    }
                }
            }
        }
    }

    // ----- traversal -----

    /// Every attached node in document order, root first.
    pub fn preorder(&self) -> Vec<NodeKey> {
        self.subtree(NodeKey::ROOT)
    }

    fn subtree(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Preorder plus a reverse index from key to position.
    pub(crate) fn document_order(&self) -> (Vec<NodeKey>, HashMap<NodeKey, usize>) {
        let preorder = self.preorder();
        let order = preorder
            .iter()
            .enumerate()
            .map(|(i, &key)| (key, i))
            .collect();
        (preorder, order)
    }

    pub fn last_descendant_or_self(&self, key: NodeKey) -> NodeKey {
        let mut current = key;
        while let Some(last) = self.last_child(current) {
            current = last;
        }
        current
    }

    pub fn first_text_descendant(&self, key: NodeKey) -> Option<NodeKey> {
        self.subtree(key).into_iter().find(|&k| self.is_text(k))
    }

    pub fn last_text_descendant(&self, key: NodeKey) -> Option<NodeKey> {
        self.subtree(key).into_iter().rev().find(|&k| self.is_text(k))
    }

    /// The ancestor-or-self of `key` whose parent is the root.
    pub fn top_level_element(&self, key: NodeKey) -> Option<NodeKey> {
        let mut current = key;
        loop {
            let parent = self.parent(current)?;
            if parent == NodeKey::ROOT {
                return Some(current);
            }
            current = parent;
        }
    }

    /// Nearest ancestor-or-self whose kind satisfies `predicate`.
    pub fn find_matching_parent(
        &self,
        key: NodeKey,
        predicate: impl Fn(&NodeKind) -> bool,
    ) -> Option<NodeKey> {
        let mut current = Some(key);
        while let Some(k) = current {
            if self.kind(k).is_some_and(&predicate) {
                return Some(k);
            }
            current = self.parent(k);
        }
        None
    }

    /// A list item whose first child is a list only exists to nest that list.
    pub fn is_nested_list_holder(&self, key: NodeKey) -> bool {
        self.kind(key).is_some_and(NodeKind::is_list_item)
            && self
                .first_child(key)
                .and_then(|child| self.kind(child))
                .is_some_and(NodeKind::is_list)
    }

    /// Blocks that directly hold inline content.
    pub fn is_leaf_block(&self, key: NodeKey) -> bool {
        match self.kind(key) {
            Some(
                NodeKind::Paragraph
                | NodeKind::Heading { .. }
                | NodeKind::Quote
                | NodeKind::Code { .. },
            ) => true,
            Some(NodeKind::ListItem { .. }) => !self.is_nested_list_holder(key),
            _ => false,
        }
    }

    pub fn nearest_block(&self, key: NodeKey) -> Option<NodeKey> {
        let mut current = Some(key);
        while let Some(k) = current {
            if self.is_leaf_block(k) {
                return Some(k);
            }
            current = self.parent(k);
        }
        None
    }

    pub fn leaf_blocks(&self) -> Vec<NodeKey> {
        self.preorder()
            .into_iter()
            .filter(|&key| self.is_leaf_block(key))
            .collect()
    }

    // ----- selection -----

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn range_selection(&self) -> Option<&RangeSelection> {
        self.selection.as_ref().and_then(Selection::as_range)
    }

    pub fn range_selection_mut(&mut self) -> Option<&mut RangeSelection> {
        self.selection.as_mut().and_then(Selection::as_range_mut)
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// Selects from `anchor` to `focus`, taking the pending format from the anchor's text.
    pub fn select(&mut self, anchor: Point, focus: Point) {
        let (format, style) = match self.text(anchor.key) {
            Some(text) if anchor.is_text() => (text.format, text.style.clone()),
            _ => (TextFormat::empty(), String::new()),
        };
        self.selection = Some(Selection::Range(RangeSelection {
            anchor,
            focus,
            format,
            style,
        }));
    }

    pub fn select_caret(&mut self, point: Point) {
        self.select(point, point);
    }

    pub fn select_text(&mut self, key: NodeKey, anchor_offset: usize, focus_offset: usize) {
        self.select(
            Point::text(key, anchor_offset),
            Point::text(key, focus_offset),
        );
    }

    pub fn select_node(&mut self, key: NodeKey) {
        self.selection = Some(Selection::Node(NodeSelection { keys: vec![key] }));
    }

    pub fn start_point(&self, key: NodeKey) -> Point {
        match self.kind(key) {
            Some(NodeKind::Text(_)) => Point::text(key, 0),
            Some(kind) if kind.is_element() => match self.first_text_descendant(key) {
                Some(text) => Point::text(text, 0),
                None => Point::element(key, 0),
            },
            _ => self.position_of(key, 0),
        }
    }

    pub fn end_point(&self, key: NodeKey) -> Point {
        match self.kind(key) {
            Some(NodeKind::Text(text)) => Point::text(key, text.len()),
            Some(kind) if kind.is_element() => match self.last_text_descendant(key) {
                Some(text) => Point::text(text, self.text_len(text)),
                None => Point::element(key, self.children(key).len()),
            },
            _ => self.position_of(key, 1),
        }
    }

    fn position_of(&self, key: NodeKey, shift: usize) -> Point {
        match (self.parent(key), self.index_in_parent(key)) {
            (Some(parent), Some(index)) => Point::element(parent, index + shift),
            _ => Point::element(NodeKey::ROOT, 0),
        }
    }

    pub fn select_start(&mut self, key: NodeKey) {
        let point = self.start_point(key);
        self.select_caret(point);
    }

    pub fn select_end(&mut self, key: NodeKey) {
        let point = self.end_point(key);
        self.select_caret(point);
    }

    /// Places the caret at the start of whatever follows `key`.
    pub fn select_next(&mut self, key: NodeKey) {
        let point = match self.next_sibling(key) {
            Some(next) => self.start_point(next),
            None => self.position_of(key, 1),
        };
        self.select_caret(point);
    }

    fn selection_keys(&self) -> Vec<NodeKey> {
        match &self.selection {
            Some(Selection::Range(range)) => vec![range.anchor.key, range.focus.key],
            Some(Selection::Node(selection)) => selection.keys.clone(),
            None => Vec::new(),
        }
    }

    fn point_is_valid(&self, point: &Point) -> bool {
        if !self.is_attached(point.key) {
            return false;
        }
        match self.kind(point.key) {
            Some(NodeKind::Text(_)) => point.is_text(),
            Some(kind) if kind.is_element() => !point.is_text(),
            _ => false,
        }
    }

    // ----- normalization -----

    /// Restores the tree invariants every committed state holds.
    pub(crate) fn normalize(&mut self) {
        self.prune_empty_inline();
        self.merge_adjacent_text();
        self.merge_adjacent_lists();
        self.prune_empty_lists();
        if self.children(NodeKey::ROOT).is_empty() {
            let paragraph = self.create(NodeKind::Paragraph);
            if let Some(node) = self.node_mut(paragraph) {
                node.parent = Some(NodeKey::ROOT);
            }
            if let Some(root) = self.node_mut(NodeKey::ROOT) {
                root.children.push(paragraph);
            }
        }
        self.repair_selection();
    }

    fn prune_empty_inline(&mut self) {
        let referenced = self.selection_keys();
        let doomed: Vec<NodeKey> = self
            .preorder()
            .into_iter()
            .filter(|key| !referenced.contains(key))
            .filter(|&key| match self.kind(key) {
                Some(NodeKind::Text(text)) => text.is_empty(),
                Some(NodeKind::Link { .. }) => self.children(key).is_empty(),
                _ => false,
            })
            .collect();
        for key in doomed {
            if let Err(err) = self.remove(key) {
                log::warn!("Failed to prune empty node {key}: {err}");
            }
        }
    }

    fn merge_adjacent_text(&mut self) {
        for parent in self.preorder() {
            let mut i = 0;
            loop {
                let children = self.children(parent);
                if i + 1 >= children.len() {
                    break;
                }
                let (first, second) = (children[i], children[i + 1]);
                let mergeable = match (self.text(first), self.text(second)) {
                    (Some(a), Some(b)) => a.format == b.format && a.style == b.style,
                    _ => false,
                };
                if mergeable {
                    self.merge_text(first, second);
                } else {
                    i += 1;
                }
            }
        }
    }

    fn merge_text(&mut self, first: NodeKey, second: NodeKey) {
        let shift = self.text_len(first);
        let tail = self
            .text(second)
            .map(|text| text.text.clone())
            .unwrap_or_default();
        if let Ok(text) = self.text_mut(first) {
            text.text.push_str(&tail);
        }
        self.for_each_point(|point| {
            if point.key == second && point.is_text() {
                point.key = first;
                point.offset += shift;
            }
        });
        self.detach(second);
        self.nodes[second.index()] = None;
    }

    fn merge_adjacent_lists(&mut self) {
        for parent in self.preorder() {
            let mut i = 0;
            loop {
                let children = self.children(parent);
                if i + 1 >= children.len() {
                    break;
                }
                let (first, second) = (children[i], children[i + 1]);
                let same_type = match (self.kind(first), self.kind(second)) {
                    (
                        Some(NodeKind::List { list_type: a, .. }),
                        Some(NodeKind::List { list_type: b, .. }),
                    ) => a == b,
                    _ => false,
                };
                if !same_type {
                    i += 1;
                    continue;
                }
                let moved = self
                    .move_children(second, first)
                    .and_then(|()| self.remove(second));
                if let Err(err) = moved {
                    log::warn!("Failed to merge list {second} into {first}: {err}");
                    i += 1;
                }
            }
        }
    }

    fn prune_empty_lists(&mut self) {
        loop {
            let empty: Vec<NodeKey> = self
                .preorder()
                .into_iter()
                .filter(|&key| {
                    self.kind(key).is_some_and(NodeKind::is_list) && self.children(key).is_empty()
                })
                .collect();
            if empty.is_empty() {
                return;
            }
            for key in empty {
                if let Err(err) = self.remove(key) {
                    log::warn!("Failed to prune empty list {key}: {err}");
                    return;
                }
            }
        }
    }

    fn repair_selection(&mut self) {
        let broken = match &self.selection {
            Some(Selection::Range(range)) => {
                !self.point_is_valid(&range.anchor) || !self.point_is_valid(&range.focus)
            }
            Some(Selection::Node(selection)) => {
                selection.keys.iter().any(|&key| !self.is_attached(key))
            }
            None => false,
        };
        if broken {
            log::debug!("Selection pointed at a removed node; moving it to the document end");
            let last = self.last_child(NodeKey::ROOT).unwrap_or(NodeKey::ROOT);
            self.select_end(last);
            return;
        }

        let limits: Vec<usize> = match &self.selection {
            Some(Selection::Range(range)) => [range.anchor, range.focus]
                .iter()
                .map(|point| match point.kind {
                    PointKind::Text => self.text_len(point.key),
                    PointKind::Element => self.children(point.key).len(),
                })
                .collect(),
            _ => return,
        };
        if let Some(Selection::Range(range)) = &mut self.selection {
            range.anchor.offset = range.anchor.offset.min(limits[0]);
            range.focus.offset = range.focus.offset.min(limits[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph_with(state: &mut EditorState, text: &str) -> (NodeKey, NodeKey) {
        let paragraph = state.create(NodeKind::Paragraph);
        let text = state.create_text(text, TextFormat::empty());
        state.append(NodeKey::ROOT, paragraph).unwrap();
        state.append(paragraph, text).unwrap();
        (paragraph, text)
    }

    #[test]
    fn split_text_keeps_first_key_and_moves_points() {
        let mut state = EditorState::new();
        let (paragraph, text) = paragraph_with(&mut state, "hello world");
        state.select_text(text, 2, 7);

        let parts = state.split_text(text, &[2, 7]).unwrap();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], text);
        assert_eq!(state.children(paragraph), parts.as_slice());
        let texts: Vec<_> = parts
            .iter()
            .map(|&k| state.text(k).unwrap().text.clone())
            .collect();
        assert_eq!(texts, vec!["he", "llo w", "orld"]);
        let range = state.range_selection().unwrap();
        assert_eq!(range.anchor, Point::text(parts[0], 2));
        assert_eq!(range.focus, Point::text(parts[1], 5));
    }

    #[test]
    fn split_at_edges_is_a_no_op() {
        let mut state = EditorState::new();
        let (_, text) = paragraph_with(&mut state, "abc");
        assert_eq!(state.split_at(text, 0).unwrap(), (None, Some(text)));
        assert_eq!(state.split_at(text, 3).unwrap(), (Some(text), None));
    }

    #[test]
    fn removing_a_node_moves_the_caret_to_its_sibling() {
        let mut state = EditorState::new();
        let (paragraph, first) = paragraph_with(&mut state, "a");
        let link = state.create(NodeKind::Link {
            url: "https://example.com".into(),
        });
        let inner = state.create_text("b", TextFormat::empty());
        state.append(paragraph, link).unwrap();
        state.append(link, inner).unwrap();
        state.select_text(inner, 1, 1);

        state.remove(link).unwrap();

        assert!(!state.contains(inner));
        assert_eq!(
            state.range_selection().unwrap().anchor,
            Point::text(first, 1)
        );
    }

    #[test]
    fn cannot_append_an_ancestor() {
        let mut state = EditorState::new();
        let (paragraph, _) = paragraph_with(&mut state, "a");
        assert_eq!(
            state.append(paragraph, NodeKey::ROOT),
            Err(EditorError::InvalidChild {
                parent: paragraph,
                child: NodeKey::ROOT
            })
        );
    }

    #[test]
    fn normalize_merges_equal_text_and_keeps_caret() {
        let mut state = EditorState::new();
        let (paragraph, first) = paragraph_with(&mut state, "ab");
        let second = state.create_text("cd", TextFormat::empty());
        state.append(paragraph, second).unwrap();
        state.select_text(second, 1, 1);

        state.normalize();

        assert_eq!(state.children(paragraph), &[first]);
        assert_eq!(state.text(first).unwrap().text, "abcd");
        assert_eq!(
            state.range_selection().unwrap().anchor,
            Point::text(first, 3)
        );
    }

    #[test]
    fn normalize_gives_an_empty_root_a_paragraph() {
        let mut state = EditorState::new();
        state.normalize();
        let children = state.children(NodeKey::ROOT);
        assert_eq!(children.len(), 1);
        assert_eq!(state.kind(children[0]), Some(&NodeKind::Paragraph));
    }

    #[test]
    fn text_content_separates_blocks() {
        let mut state = EditorState::new();
        paragraph_with(&mut state, "one");
        paragraph_with(&mut state, "two");
        assert_eq!(state.text_content(NodeKey::ROOT), "one\n\ntwo");
    }
}
