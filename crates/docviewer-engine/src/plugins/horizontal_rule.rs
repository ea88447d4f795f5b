use crate::editing::{
    Command, CommandPriority, Editor, EditorError, EditorState, ListenerId, NodeKey, NodeKind,
};

pub fn register(editor: &mut Editor) -> ListenerId {
    editor.register_command(CommandPriority::Editor, |command, tx| {
        if *command != Command::InsertHorizontalRule {
            return Ok(false);
        }
        insert_horizontal_rule(tx)
    })
}

/// Puts a rule at the caret's top-level block: an empty block is replaced, any other
/// gets the rule after it. The caret moves to the paragraph following the rule,
/// which is created when nothing follows.
///
/// Returns `false` without a range selection.
pub fn insert_horizontal_rule(state: &mut EditorState) -> Result<bool, EditorError> {
    let Some(anchor) = state.anchor_node() else {
        return Ok(false);
    };
    let block = state.top_level_element(anchor).unwrap_or(anchor);
    let rule = state.create(NodeKind::HorizontalRule);
    if block == NodeKey::ROOT {
        state.append(NodeKey::ROOT, rule)?;
    } else if state.text_content(block).is_empty()
        && state.kind(block) != Some(&NodeKind::HorizontalRule)
    {
        state.replace(block, rule, false)?;
    } else {
        state.insert_after(block, rule)?;
    }

    let next = match state.next_sibling(rule) {
        Some(next) => next,
        None => {
            let paragraph = state.create(NodeKind::Paragraph);
            state.insert_after(rule, paragraph)?;
            paragraph
        }
    };
    state.select_start(next);
    Ok(true)
}
