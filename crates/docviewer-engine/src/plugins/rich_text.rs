//! Default editing behaviour: typing, Enter, Backspace/Delete and inline formats.

use crate::editing::{Command, CommandPriority, Editor, EditorError, ListenerId, Transaction};

pub fn register(editor: &mut Editor) -> ListenerId {
    editor.register_command(CommandPriority::Editor, handle)
}

fn handle(command: &Command, tx: &mut Transaction<'_>) -> Result<bool, EditorError> {
    match command {
        Command::FormatText(format) => tx.format_text(*format)?,
        Command::InsertText(text) => tx.insert_text(text)?,
        Command::InsertParagraph | Command::KeyEnter { ctrl: false } => tx.insert_paragraph()?,
        Command::DeleteCharacter { backward: true } => tx.delete_backward()?,
        Command::DeleteCharacter { backward: false } => {
            if tx.range_selection().is_some_and(|range| range.is_collapsed()) {
                tx.move_caret(true, true);
            }
            tx.remove_text()?;
        }
        // Outside lists there is nothing to nest; a tab character stands in.
        Command::IndentContent => tx.insert_text("\t")?,
        Command::OutdentContent => {}
        _ => return Ok(false),
    }
    Ok(true)
}
