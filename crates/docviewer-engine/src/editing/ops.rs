//! Selection-driven editing primitives: typing, deleting, splitting blocks and
//! moving the caret. Each operation acts on the current range selection and
//! leaves a collapsed caret behind.

use super::error::EditorError;
use super::node::{NodeKey, NodeKind, TextNode};
use super::selection::{Point, PointKind, TextRange};
use super::state::{EditorState, char_to_byte};

/// Where deletion starts, relative to the split boundary text.
enum Lower {
    After(NodeKey),
    At(NodeKey),
    Element(Point),
}

/// Where deletion ends.
enum Upper {
    At(NodeKey),
    Before(NodeKey),
    Element(Point),
}

impl EditorState {
    /// Inserts `text` at the caret (replacing any selected content) using the
    /// selection's pending format.
    pub fn insert_text(&mut self, text: &str) -> Result<(), EditorError> {
        let Some(range) = self.range_selection() else {
            return Ok(());
        };
        if !range.is_collapsed() {
            self.remove_text()?;
        }
        let Some(range) = self.range_selection().cloned() else {
            return Ok(());
        };
        if text.is_empty() {
            return Ok(());
        }
        let inserted = text.chars().count();
        let anchor = self.resolve_point(range.anchor);

        if anchor.is_text() {
            let node = self.text(anchor.key).ok_or(EditorError::NotText(anchor.key))?;
            if node.format == range.format && node.style == range.style {
                let node = self.text_mut(anchor.key)?;
                let at = char_to_byte(&node.text, anchor.offset);
                node.text.insert_str(at, text);
                self.select_caret(Point::text(anchor.key, anchor.offset + inserted));
                return Ok(());
            }
        }

        let key = self.create(NodeKind::Text(TextNode {
            text: text.to_string(),
            format: range.format,
            style: range.style.clone(),
        }));
        let (parent, index) = self.insertion_slot(anchor)?;
        self.insert_child(parent, index, key)?;
        self.select_caret(Point::text(key, inserted));
        Ok(())
    }

    /// Inserts inline nodes at the caret. The caret ends inside the last node when
    /// it is an element, otherwise right after it.
    pub fn insert_nodes(&mut self, nodes: &[NodeKey]) -> Result<(), EditorError> {
        let Some(range) = self.range_selection() else {
            return Ok(());
        };
        if !range.is_collapsed() {
            self.remove_text()?;
        }
        let Some(range) = self.range_selection().cloned() else {
            return Ok(());
        };
        let anchor = self.resolve_point(range.anchor);
        let (parent, mut index) = self.insertion_slot(anchor)?;
        for &node in nodes {
            self.insert_child(parent, index, node)?;
            index += 1;
        }
        if let Some(&last) = nodes.last() {
            let caret = match self.kind(last) {
                Some(NodeKind::Text(text)) => Point::text(last, text.len()),
                Some(kind) if kind.is_element() => {
                    Point::element(last, self.children(last).len())
                }
                _ => Point::element(parent, index),
            };
            self.select_caret(caret);
        }
        Ok(())
    }

    /// Parent and child index where inline content belongs for a caret at `point`,
    /// splitting a text node or creating a block when needed.
    fn insertion_slot(&mut self, point: Point) -> Result<(NodeKey, usize), EditorError> {
        if point.is_text() {
            return match self.split_at(point.key, point.offset)? {
                (Some(left), _) => {
                    let parent = self.parent(left).ok_or(EditorError::Detached(left))?;
                    let index = self.index_in_parent(left).unwrap_or(0);
                    Ok((parent, index + 1))
                }
                (None, Some(right)) => {
                    let parent = self.parent(right).ok_or(EditorError::Detached(right))?;
                    Ok((parent, self.index_in_parent(right).unwrap_or(0)))
                }
                (None, None) => Err(EditorError::NotText(point.key)),
            };
        }
        let container = match self.kind(point.key) {
            Some(kind) if kind.accepts_inline() => return Ok((point.key, point.offset)),
            Some(NodeKind::List { list_type, .. }) => {
                let checked = (*list_type == super::node::ListType::Check).then_some(false);
                self.create(NodeKind::ListItem { checked })
            }
            _ => self.create(NodeKind::Paragraph),
        };
        if self.kind(point.key).is_some_and(NodeKind::is_element) {
            self.insert_child(point.key, point.offset, container)?;
        } else {
            self.insert_after(point.key, container)?;
        }
        Ok((container, 0))
    }

    /// Deletes the selected content, merging the blocks the selection spans.
    pub fn remove_text(&mut self) -> Result<(), EditorError> {
        let Some((start, end, collapsed)) = self.selection_bounds() else {
            return Ok(());
        };
        if collapsed {
            return Ok(());
        }

        if start.is_text() && end.is_text() && start.key == end.key {
            let text = self.text_mut(start.key)?;
            let from = char_to_byte(&text.text, start.offset);
            let to = char_to_byte(&text.text, end.offset);
            text.text.replace_range(from..to, "");
            self.select_caret(start);
            return Ok(());
        }

        let start_block = self.nearest_block(start.key);
        let end_block = self.nearest_block(end.key);

        let lower = if start.is_text() {
            match self.split_at(start.key, start.offset)? {
                (Some(left), _) => Lower::After(left),
                _ => Lower::At(start.key),
            }
        } else {
            Lower::Element(start)
        };
        let upper = if end.is_text() {
            match self.split_at(end.key, end.offset)? {
                (Some(left), _) => Upper::At(left),
                _ => Upper::Before(end.key),
            }
        } else {
            Upper::Element(end)
        };

        let (preorder, order) = self.document_order();
        let index = |key: NodeKey| order.get(&key).copied().unwrap_or(0);
        let lo = match lower {
            Lower::After(key) => index(key) + 1,
            Lower::At(key) => index(key),
            Lower::Element(point) => match self.children(point.key).get(point.offset) {
                Some(&child) => index(child),
                None => index(self.last_descendant_or_self(point.key)) + 1,
            },
        };
        let hi = match upper {
            Upper::At(key) => index(key) + 1,
            Upper::Before(key) => index(key),
            Upper::Element(point) => match point.offset.checked_sub(1) {
                None => index(point.key),
                Some(i) => match self.children(point.key).get(i) {
                    Some(&child) => index(self.last_descendant_or_self(child)) + 1,
                    None => index(self.last_descendant_or_self(point.key)) + 1,
                },
            },
        };
        let caret = match lower {
            Lower::After(key) => Point::text(key, self.text_len(key)),
            Lower::At(key) => match (self.parent(key), self.index_in_parent(key)) {
                (Some(parent), Some(i)) => Point::element(parent, i),
                _ => start,
            },
            Lower::Element(point) => point,
        };
        let window: Vec<NodeKey> = preorder.get(lo..hi).map(<[_]>::to_vec).unwrap_or_default();

        for &key in &window {
            if self.contains(key) && !self.kind(key).is_some_and(NodeKind::is_element) {
                self.remove(key)?;
            }
        }

        if let (Some(target), Some(source)) = (start_block, end_block)
            && target != source
            && self.contains(target)
            && self.contains(source)
        {
            self.move_children(source, target)?;
            self.remove(source)?;
        }

        for &key in window.iter().rev() {
            let emptied = key != NodeKey::ROOT
                && Some(key) != start_block
                && self.contains(key)
                && self.kind(key).is_some_and(NodeKind::is_element)
                && self.children(key).is_empty();
            if emptied {
                self.remove(key)?;
            }
        }

        let caret = if self.contains(caret.key) {
            caret
        } else {
            start_block.map_or(caret, |block| self.end_point(block))
        };
        self.select_caret(caret);
        Ok(())
    }

    /// Splits the caret's block in two (Enter). Code blocks get a line break instead,
    /// and an empty list item leaves its list.
    pub fn insert_paragraph(&mut self) -> Result<(), EditorError> {
        let Some(range) = self.range_selection() else {
            return Ok(());
        };
        if !range.is_collapsed() {
            self.remove_text()?;
        }
        let Some((caret, _, _)) = self.selection_bounds() else {
            return Ok(());
        };
        let Some(block) = self.nearest_block(caret.key) else {
            let paragraph = self.create(NodeKind::Paragraph);
            self.append(NodeKey::ROOT, paragraph)?;
            self.select_start(paragraph);
            return Ok(());
        };
        let kind = self.get(block)?.kind().clone();

        if let NodeKind::Code { .. } = kind {
            let line_break = self.create(NodeKind::LineBreak);
            return self.insert_nodes(&[line_break]);
        }
        if kind.is_list_item() && self.text_content(block).is_empty() {
            let paragraph = self.replace_block(block, NodeKind::Paragraph)?;
            self.select_start(paragraph);
            return Ok(());
        }

        let split = self.child_index_at(block, caret)?;
        let count = self.children(block).len();
        if split == 0 && count > 0 {
            let paragraph = self.create(NodeKind::Paragraph);
            self.insert_before(block, paragraph)?;
            self.select_start(block);
            return Ok(());
        }

        let next_kind = match kind {
            NodeKind::ListItem { checked } => NodeKind::ListItem {
                checked: checked.map(|_| false),
            },
            NodeKind::Heading { tag } if split < count => NodeKind::Heading { tag },
            _ => NodeKind::Paragraph,
        };
        let next = self.create(next_kind);
        self.insert_after(block, next)?;
        for child in self.children(block)[split..].to_vec() {
            self.append(next, child)?;
        }
        self.select_start(next);
        Ok(())
    }

    /// Index among `block`'s children where content after `point` begins.
    fn child_index_at(&mut self, block: NodeKey, point: Point) -> Result<usize, EditorError> {
        if point.key == block && point.kind == PointKind::Element {
            return Ok(point.offset);
        }
        let mut child = point.key;
        while self.parent(child) != Some(block) {
            child = self.parent(child).ok_or(EditorError::Detached(child))?;
        }
        let index = self.index_in_parent(child).unwrap_or(0);
        if point.is_text() && child == point.key {
            return Ok(match self.split_at(point.key, point.offset)? {
                (Some(left), _) => self.index_in_parent(left).map_or(index, |i| i + 1),
                (None, _) => index,
            });
        }
        Ok(if self.start_point(child) == point {
            index
        } else {
            index + 1
        })
    }

    /// Backspace: deletes the selection, the character before the caret, or joins
    /// the caret's block with the previous one.
    pub fn delete_backward(&mut self) -> Result<(), EditorError> {
        let Some(range) = self.range_selection().cloned() else {
            return Ok(());
        };
        if !range.is_collapsed() {
            return self.remove_text();
        }
        let caret = range.anchor;
        let stops = self.caret_stops();
        let Some(current) = self.stop_index(&stops, &caret) else {
            return Ok(());
        };
        let block = self.nearest_block(stops[current].key);
        let previous = current.checked_sub(1).map(|i| stops[i]);

        if let Some(previous) = previous
            && self.nearest_block(previous.key) == block
        {
            self.select(previous, caret);
            return self.remove_text();
        }

        let Some(block) = block else {
            return Ok(());
        };
        if self.kind(block) != Some(&NodeKind::Paragraph) {
            let paragraph = self.replace_block(block, NodeKind::Paragraph)?;
            self.select_start(paragraph);
            return Ok(());
        }
        if let Some(top) = self.top_level_element(block)
            && let Some(rule) = self.previous_sibling(top)
            && self.kind(rule) == Some(&NodeKind::HorizontalRule)
        {
            self.remove(rule)?;
            self.select_caret(caret);
            return Ok(());
        }
        if let Some(previous) = previous {
            self.select(previous, caret);
            self.remove_text()?;
        }
        Ok(())
    }

    /// Moves the focus one caret stop. Without `extend` a range collapses toward
    /// the direction of travel first.
    pub fn move_caret(&mut self, forward: bool, extend: bool) {
        let Some(range) = self.range_selection().cloned() else {
            return;
        };
        if !extend && !range.is_collapsed() {
            let (start, end) = self.ordered_points(&range);
            self.select_caret(if forward { end } else { start });
            return;
        }
        let stops = self.caret_stops();
        let Some(current) = self.stop_index(&stops, &range.focus) else {
            return;
        };
        let next = if forward {
            (current + 1).min(stops.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        let focus = stops[next];
        if extend {
            self.select(range.anchor, focus);
        } else {
            self.select_caret(focus);
        }
    }

    /// Home/End within the focus block.
    pub fn move_to_block_edge(&mut self, end: bool) {
        let Some(range) = self.range_selection().cloned() else {
            return;
        };
        let focus = self.resolve_point(range.focus);
        if let Some(block) = self.nearest_block(focus.key) {
            let point = if end {
                self.end_point(block)
            } else {
                self.start_point(block)
            };
            self.select_caret(point);
        }
    }

    /// Splits a text node so that `range` becomes a node of its own, returning it.
    pub fn isolate_text(&mut self, range: TextRange) -> Result<NodeKey, EditorError> {
        let len = self.text_len(range.key);
        let parts = self.split_text(range.key, &[range.start, range.end])?;
        let index = usize::from(range.start > 0 && range.start < len);
        Ok(parts.get(index).copied().unwrap_or(range.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::format::TextFormat;
    use crate::editing::node::{HeadingTag, ListType};
    use pretty_assertions::assert_eq;

    fn doc(blocks: &[(NodeKind, &str)]) -> (EditorState, Vec<NodeKey>, Vec<NodeKey>) {
        let mut state = EditorState::new();
        let mut block_keys = Vec::new();
        let mut text_keys = Vec::new();
        for (kind, text) in blocks {
            let block = state.create(kind.clone());
            state.append(NodeKey::ROOT, block).unwrap();
            let text = state.create_text(*text, TextFormat::empty());
            state.append(block, text).unwrap();
            block_keys.push(block);
            text_keys.push(text);
        }
        (state, block_keys, text_keys)
    }

    fn texts(state: &EditorState) -> Vec<String> {
        state
            .children(NodeKey::ROOT)
            .iter()
            .map(|&k| state.text_content(k))
            .collect()
    }

    #[test]
    fn typing_with_a_pending_format_creates_a_new_run() {
        let (mut state, blocks, text) = doc(&[(NodeKind::Paragraph, "ab")]);
        state.select_text(text[0], 1, 1);
        state.range_selection_mut().unwrap().format = TextFormat::BOLD;

        state.insert_text("X").unwrap();

        let children = state.children(blocks[0]).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(state.text(children[1]).unwrap().format, TextFormat::BOLD);
        assert_eq!(texts(&state), vec!["aXb"]);
    }

    #[test]
    fn removing_across_blocks_merges_them() {
        let (mut state, _, text) = doc(&[
            (NodeKind::Paragraph, "hello"),
            (NodeKind::Paragraph, "world"),
        ]);
        state.select(Point::text(text[0], 2), Point::text(text[1], 3));

        state.remove_text().unwrap();
        state.normalize();

        assert_eq!(texts(&state), vec!["held"]);
        assert_eq!(
            state.range_selection().unwrap().anchor,
            Point::text(text[0], 2)
        );
    }

    #[test]
    fn enter_in_the_middle_of_a_heading_keeps_the_heading() {
        let (mut state, _, text) = doc(&[(NodeKind::Heading { tag: HeadingTag::H2 }, "title")]);
        state.select_text(text[0], 2, 2);

        state.insert_paragraph().unwrap();

        let kinds: Vec<_> = state
            .children(NodeKey::ROOT)
            .iter()
            .map(|&k| state.kind(k).unwrap().clone())
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Heading { tag: HeadingTag::H2 },
                NodeKind::Heading { tag: HeadingTag::H2 }
            ]
        );
        assert_eq!(texts(&state), vec!["ti", "tle"]);
    }

    #[test]
    fn enter_at_the_end_of_a_heading_starts_a_paragraph() {
        let (mut state, _, text) = doc(&[(NodeKind::Heading { tag: HeadingTag::H1 }, "title")]);
        state.select_text(text[0], 5, 5);

        state.insert_paragraph().unwrap();

        let last = state.last_child(NodeKey::ROOT).unwrap();
        assert_eq!(state.kind(last), Some(&NodeKind::Paragraph));
        assert_eq!(
            state.range_selection().unwrap().anchor,
            Point::element(last, 0)
        );
    }

    #[test]
    fn backspace_at_the_start_of_a_heading_makes_it_a_paragraph() {
        let (mut state, _, text) = doc(&[
            (NodeKind::Paragraph, "a"),
            (NodeKind::Heading { tag: HeadingTag::H1 }, "b"),
        ]);
        state.select_text(text[1], 0, 0);

        state.delete_backward().unwrap();

        let second = state.children(NodeKey::ROOT)[1];
        assert_eq!(state.kind(second), Some(&NodeKind::Paragraph));
        assert_eq!(texts(&state), vec!["a", "b"]);
    }

    #[test]
    fn backspace_joins_paragraphs() {
        let (mut state, _, text) = doc(&[(NodeKind::Paragraph, "a"), (NodeKind::Paragraph, "b")]);
        state.select_text(text[1], 0, 0);

        state.delete_backward().unwrap();
        state.normalize();

        assert_eq!(texts(&state), vec!["ab"]);
    }

    #[test]
    fn enter_in_an_empty_list_item_leaves_the_list() {
        let mut state = EditorState::new();
        let list = state.create(NodeKind::List {
            list_type: ListType::Bullet,
            start: 1,
        });
        let item = state.create(NodeKind::ListItem { checked: None });
        state.append(NodeKey::ROOT, list).unwrap();
        state.append(list, item).unwrap();
        state.select_caret(Point::element(item, 0));

        state.insert_paragraph().unwrap();
        state.normalize();

        let only = state.children(NodeKey::ROOT);
        assert_eq!(only.len(), 1);
        assert_eq!(state.kind(only[0]), Some(&NodeKind::Paragraph));
    }

    #[test]
    fn caret_moves_across_blocks() {
        let (mut state, _, text) = doc(&[(NodeKind::Paragraph, "a"), (NodeKind::Paragraph, "b")]);
        state.select_text(text[0], 1, 1);
        state.move_caret(true, false);
        assert_eq!(
            state.range_selection().unwrap().focus,
            Point::text(text[1], 0)
        );
        state.move_caret(true, true);
        let range = state.range_selection().unwrap();
        assert_eq!(range.anchor, Point::text(text[1], 0));
        assert_eq!(range.focus, Point::text(text[1], 1));
    }
}
