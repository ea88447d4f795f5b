//! Clearing inline formats and block types from the selection.

use crate::editing::{EditorError, EditorState, NodeKey, NodeKind, TextFormat};

/// Strips inline formats from the selected characters and turns the blocks they sit
/// in back into paragraphs.
///
/// - Only the selected part of a text node loses its format and style; the node is
///   split at the selection edges first. A caret clears nothing inline.
/// - The parent of every touched text node is cleared even for a caret: a link is
///   unwrapped, then a heading, quote, code block or list item becomes a paragraph
///   that keeps its children.
/// - Horizontal rules lying between the selection ends are removed whole. They are
///   never the parent of a text node, so clearing parents does not reach them.
pub fn clear_formatting(state: &mut EditorState) -> Result<(), EditorError> {
    if state.range_selection().is_none() {
        return Ok(());
    }
    let rules: Vec<NodeKey> = state
        .selected_nodes()
        .into_iter()
        .filter(|&key| state.kind(key) == Some(&NodeKind::HorizontalRule))
        .collect();

    let mut touched = Vec::new();
    for range in state.selected_text_ranges() {
        let key = if range.is_empty() {
            range.key
        } else {
            let key = state.isolate_text(range)?;
            let text = state.text_mut(key)?;
            text.format = TextFormat::empty();
            text.style.clear();
            key
        };
        touched.push(key);
    }

    for key in touched {
        if state.contains(key) {
            clear_parent(state, key)?;
        }
    }
    for rule in rules {
        if state.is_attached(rule) {
            state.remove(rule)?;
        }
    }
    if let Some(range) = state.range_selection_mut() {
        range.format = TextFormat::empty();
        range.style.clear();
    }
    Ok(())
}

fn clear_parent(state: &mut EditorState, key: NodeKey) -> Result<(), EditorError> {
    let Some(mut parent) = state.parent(key) else {
        return Ok(());
    };
    if state.kind(parent).is_some_and(NodeKind::is_link) {
        state.unwrap_element(parent)?;
        let Some(next) = state.parent(key) else {
            return Ok(());
        };
        parent = next;
    }
    match state.kind(parent) {
        Some(
            NodeKind::Heading { .. }
            | NodeKind::Quote
            | NodeKind::Code { .. }
            | NodeKind::ListItem { .. },
        ) => {
            log::trace!("Clearing block {parent} to a paragraph");
            state.replace_block(parent, NodeKind::Paragraph)?;
        }
        _ => {}
    }
    Ok(())
}
