//! Indent and outdent for list items; other blocks fall through to the default
//! handler.

use crate::editing::{
    Command, CommandPriority, Editor, EditorError, EditorState, ListenerId, NodeKey, NodeKind,
};

pub fn register(editor: &mut Editor) -> ListenerId {
    editor.register_command(CommandPriority::Low, |command, tx| {
        let indent = match command {
            Command::IndentContent => true,
            Command::OutdentContent => false,
            _ => return Ok(false),
        };
        let items = selected_list_items(tx);
        if items.is_empty() {
            return Ok(false);
        }
        for item in items {
            if indent {
                if can_indent(tx, item)? {
                    tx.indent_list_item(item)?;
                }
            } else {
                tx.outdent_list_item(item)?;
            }
        }
        Ok(true)
    })
}

fn selected_list_items(state: &EditorState) -> Vec<NodeKey> {
    state
        .selected_blocks()
        .into_iter()
        .filter(|&block| state.kind(block).is_some_and(NodeKind::is_list_item))
        .collect()
}

/// Rejects indenting into nothing: the first item of a top-level list has no item to
/// nest under and stays put.
pub fn can_indent(state: &EditorState, item: NodeKey) -> Result<bool, EditorError> {
    state.get(item)?;
    Ok(state.previous_sibling(item).is_some() || state.list_depth(item) > 0)
}
