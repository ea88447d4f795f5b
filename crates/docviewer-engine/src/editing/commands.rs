use std::ops::{Deref, DerefMut};

use super::error::EditorError;
use super::format::TextFormatType;
use super::state::EditorState;

/// Identifies a registered listener so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Commands flowing through the editor's dispatch chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    KeyEscape,
    KeyEnter { ctrl: bool },
    KeyTab { shift: bool },
    Focus,
    FormatText(TextFormatType),
    InsertText(String),
    InsertParagraph,
    DeleteCharacter { backward: bool },
    InsertHorizontalRule,
    /// `Some(url)` links the selection; `None` removes links from it.
    ToggleLink(Option<String>),
    IndentContent,
    OutdentContent,
}

/// Handlers run from highest to lowest priority; the first to return `true` stops
/// the dispatch. Built-in behaviour registers at [`CommandPriority::Editor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandPriority {
    Editor,
    Low,
    Normal,
    High,
    Critical,
}

pub type CommandHandler =
    Box<dyn FnMut(&Command, &mut Transaction<'_>) -> Result<bool, EditorError>>;

struct CommandEntry {
    id: ListenerId,
    priority: CommandPriority,
    handler: Option<CommandHandler>,
}

#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub(crate) fn register(&mut self, id: ListenerId, priority: CommandPriority, handler: CommandHandler) {
        self.entries.push(CommandEntry {
            id,
            priority,
            handler: Some(handler),
        });
    }

    pub(crate) fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry indices, highest priority first, registration order within a priority.
    fn dispatch_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| self.entries[b].priority.cmp(&self.entries[a].priority));
        order
    }
}

/// The mutable view handed to update closures and command handlers: the working
/// copy of the editor state plus the ability to dispatch further commands.
pub struct Transaction<'a> {
    state: &'a mut EditorState,
    commands: &'a mut CommandRegistry,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(state: &'a mut EditorState, commands: &'a mut CommandRegistry) -> Self {
        Self { state, commands }
    }

    pub fn state(&self) -> &EditorState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        self.state
    }

    /// Runs `command` through the handler chain. A handler is not re-entered while
    /// it is running, so dispatching from inside a handler reaches only the others.
    pub fn dispatch(&mut self, command: &Command) -> Result<bool, EditorError> {
        for index in self.commands.dispatch_order() {
            let Some(mut handler) = self
                .commands
                .entries
                .get_mut(index)
                .and_then(|entry| entry.handler.take())
            else {
                continue;
            };
            let result = handler(command, self);
            if let Some(entry) = self.commands.entries.get_mut(index) {
                entry.handler = Some(handler);
            }
            if result? {
                log::trace!("{command:?} handled by listener {index}");
                return Ok(true);
            }
        }
        log::trace!("{command:?} not handled");
        Ok(false)
    }
}

impl Deref for Transaction<'_> {
    type Target = EditorState;

    fn deref(&self) -> &EditorState {
        self.state
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut EditorState {
        self.state
    }
}
