use crate::editing::{Command, CommandPriority, Editor, ListenerId};

use super::accessibility::AccessibilityPlugin;

/// Tab indents and Shift+Tab outdents, but only while focus is inside the editor;
/// otherwise Tab is left alone so keyboard users can move on.
pub fn register(editor: &mut Editor, accessibility: &AccessibilityPlugin) -> ListenerId {
    let accessibility = accessibility.clone();
    editor.register_command(CommandPriority::Editor, move |command, tx| {
        let Command::KeyTab { shift } = command else {
            return Ok(false);
        };
        if !accessibility.tab_indentation_enabled() {
            return Ok(false);
        }
        tx.dispatch(if *shift {
            &Command::OutdentContent
        } else {
            &Command::IndentContent
        })?;
        Ok(true)
    })
}
