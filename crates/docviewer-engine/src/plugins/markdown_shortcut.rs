use crate::editing::{Command, CommandPriority, Editor, ListenerId};
use crate::markdown::{MARKDOWN_TRANSFORMERS, run_element_shortcuts};

/// Typing a block trigger such as `## ` at the start of a paragraph converts it.
pub fn register(editor: &mut Editor) -> ListenerId {
    editor.register_command(CommandPriority::High, |command, tx| {
        let Command::InsertText(text) = command else {
            return Ok(false);
        };
        tx.insert_text(text)?;
        if text.ends_with(' ') {
            run_element_shortcuts(tx, &MARKDOWN_TRANSFORMERS)?;
        }
        Ok(true)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{EditorState, HeadingTag, NodeKey, NodeKind};

    #[test]
    fn typing_a_heading_trigger_converts_the_paragraph() {
        let mut state = EditorState::new();
        let paragraph = state.create(NodeKind::Paragraph);
        state.append(NodeKey::ROOT, paragraph).unwrap();
        state.select_start(paragraph);
        let mut editor = Editor::new("test", state);
        register(&mut editor);

        for text in ["#", "#", " ", "Title"] {
            editor.dispatch_command(Command::InsertText(text.into()));
        }

        let block = editor.state().children(NodeKey::ROOT)[0];
        assert_eq!(
            editor.state().kind(block),
            Some(&NodeKind::Heading { tag: HeadingTag::H2 })
        );
        assert_eq!(editor.state().text_content(block), "Title");
    }
}
