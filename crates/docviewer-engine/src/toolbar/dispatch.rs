//! Toolbar actions that run against an [`Editor`]. Each is one atomic update.

use crate::editing::{BlockConstructor, Command, Editor, TextFormatType};

use super::clear_format::clear_formatting;

/// Toggles an inline format over the selection via [`Command::FormatText`].
pub fn format_inline(editor: &mut Editor, format: TextFormatType) -> bool {
    editor.update(|tx| {
        if tx.range_selection().is_some() {
            tx.dispatch(&Command::FormatText(format))?;
        }
        Ok(())
    })
}

/// Converts the selected blocks with `constructor`.
pub fn format_block(editor: &mut Editor, constructor: BlockConstructor) -> bool {
    log::debug!("Formatting blocks as {constructor:?}");
    editor.update(|tx| tx.set_blocks_type(constructor))
}

pub fn insert_horizontal_rule(editor: &mut Editor) -> bool {
    editor.dispatch_command(Command::InsertHorizontalRule)
}

pub fn clear_format(editor: &mut Editor) -> bool {
    editor.update(|tx| clear_formatting(tx))
}
