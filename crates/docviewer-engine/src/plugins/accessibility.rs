use std::cell::Cell;
use std::rc::Rc;

use crate::editing::{Command, CommandPriority, Editor, ListenerId};

/// Where keyboard focus sits relative to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessibilityFocus {
    /// Typing goes into the document; Tab indents.
    #[default]
    FocusInEditor,
    /// The editor as a whole has focus, so Tab moves on to the next control.
    FocusOnEditor,
}

/// Lets keyboard users leave the editor: Escape steps out to the editor as a whole,
/// Ctrl+Enter or focusing steps back in.
#[derive(Debug, Clone, Default)]
pub struct AccessibilityPlugin {
    focus: Rc<Cell<AccessibilityFocus>>,
}

impl AccessibilityPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> AccessibilityFocus {
        self.focus.get()
    }

    pub fn tab_indentation_enabled(&self) -> bool {
        self.focus() == AccessibilityFocus::FocusInEditor
    }

    pub fn register(&self, editor: &mut Editor) -> ListenerId {
        let focus = self.focus.clone();
        editor.register_command(CommandPriority::Critical, move |command, _| {
            Ok(match command {
                Command::KeyEscape => {
                    focus.set(AccessibilityFocus::FocusOnEditor);
                    true
                }
                Command::KeyEnter { ctrl: true } => {
                    focus.set(AccessibilityFocus::FocusInEditor);
                    true
                }
                Command::Focus => {
                    focus.set(AccessibilityFocus::FocusInEditor);
                    false
                }
                _ => false,
            })
        })
    }
}
