use super::commands::{Command, CommandPriority, CommandRegistry, ListenerId, Transaction};
use super::error::EditorError;
use super::state::EditorState;

pub type UpdateListener = Box<dyn FnMut(&EditorState)>;
pub type ErrorHandler = Box<dyn FnMut(&EditorError)>;

/// Owns the committed [`EditorState`] and the listeners plugins register.
///
/// ## Update model
///
/// - [`Editor::update`] clones the committed state, runs the closure against the copy
///   and commits it only when the closure succeeds.
/// - A committed change notifies every update listener exactly once, no matter how
///   many edits or nested command dispatches the closure performed.
/// - A failing update reports to the error handler and marks the editor failed;
///   later updates are ignored and the last good state stays readable.
pub struct Editor {
    namespace: String,
    state: EditorState,
    commands: CommandRegistry,
    update_listeners: Vec<(ListenerId, UpdateListener)>,
    on_error: ErrorHandler,
    failed: bool,
    next_id: u64,
}

impl Editor {
    pub fn new(namespace: impl Into<String>, mut state: EditorState) -> Self {
        state.normalize();
        Self {
            namespace: namespace.into(),
            state,
            commands: CommandRegistry::default(),
            update_listeners: Vec::new(),
            on_error: Box::new(|err| log::error!("Editor update failed: {err}")),
            failed: false,
            next_id: 0,
        }
    }

    pub fn with_error_handler(mut self, handler: impl FnMut(&EditorError) + 'static) -> Self {
        self.on_error = Box::new(handler);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn read<R>(&self, f: impl FnOnce(&EditorState) -> R) -> R {
        f(&self.state)
    }

    /// Runs `f` as one atomic update. Returns `true` when a changed state was committed.
    pub fn update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<(), EditorError>,
    {
        if self.failed {
            log::debug!("Ignoring update on failed editor {}", self.namespace);
            return false;
        }
        let mut working = self.state.clone();
        let result = f(&mut Transaction::new(&mut working, &mut self.commands));
        match result {
            Ok(()) => {
                working.normalize();
                if working == self.state {
                    return false;
                }
                self.state = working;
                self.notify();
                true
            }
            Err(err) => {
                self.failed = true;
                (self.on_error)(&err);
                false
            }
        }
    }

    /// Replaces the whole state, e.g. after importing a document.
    pub fn set_state(&mut self, mut state: EditorState) {
        state.normalize();
        self.state = state;
        self.notify();
    }

    /// Dispatches `command` inside its own update. Returns whether a handler took it.
    pub fn dispatch_command(&mut self, command: Command) -> bool {
        let mut handled = false;
        self.update(|tx| {
            handled = tx.dispatch(&command)?;
            Ok(())
        });
        handled
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.update_listeners {
            listener(&self.state);
        }
    }

    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    pub fn register_update_listener(
        &mut self,
        listener: impl FnMut(&EditorState) + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.update_listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unregister_update_listener(&mut self, id: ListenerId) -> bool {
        let before = self.update_listeners.len();
        self.update_listeners.retain(|(listener_id, _)| *listener_id != id);
        self.update_listeners.len() != before
    }

    pub fn register_command(
        &mut self,
        priority: CommandPriority,
        handler: impl FnMut(&Command, &mut Transaction<'_>) -> Result<bool, EditorError> + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.commands.register(id, priority, Box::new(handler));
        id
    }

    pub fn unregister_command(&mut self, id: ListenerId) -> bool {
        self.commands.unregister(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::node::{NodeKey, NodeKind};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn editor_with_text(text: &str) -> Editor {
        let mut state = EditorState::new();
        let paragraph = state.create(NodeKind::Paragraph);
        let key = state.create_text(text, Default::default());
        state.append(NodeKey::ROOT, paragraph).unwrap();
        state.append(paragraph, key).unwrap();
        state.select_end(key);
        Editor::new("test", state)
    }

    #[test]
    fn an_update_notifies_listeners_once() {
        let mut editor = editor_with_text("ab");
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        editor.register_update_listener(move |_| seen.set(seen.get() + 1));

        editor.update(|tx| {
            tx.insert_text("c")?;
            tx.insert_text("d")?;
            Ok(())
        });

        assert_eq!(calls.get(), 1);
        assert_eq!(editor.state().text_content(NodeKey::ROOT), "abcd");
    }

    #[test]
    fn an_unchanged_update_does_not_notify() {
        let mut editor = editor_with_text("ab");
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        editor.register_update_listener(move |_| seen.set(seen.get() + 1));

        assert!(!editor.update(|_| Ok(())));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn a_failed_update_keeps_the_last_good_state() {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = errors.clone();
        let mut editor =
            editor_with_text("ab").with_error_handler(move |err| sink.borrow_mut().push(err.clone()));

        editor.update(|tx| {
            tx.insert_text("zzz")?;
            Err(EditorError::Other("boom".into()))
        });

        assert!(editor.is_failed());
        assert_eq!(editor.state().text_content(NodeKey::ROOT), "ab");
        assert_eq!(errors.borrow().len(), 1);
        assert!(!editor.update(|tx| tx.insert_text("x")));
    }

    #[test]
    fn higher_priority_handlers_run_first() {
        let mut editor = editor_with_text("");
        let order = Rc::new(RefCell::new(Vec::new()));
        for (priority, name) in [
            (CommandPriority::Editor, "editor"),
            (CommandPriority::Critical, "critical"),
            (CommandPriority::Normal, "normal"),
        ] {
            let order = order.clone();
            editor.register_command(priority, move |_, _| {
                order.borrow_mut().push(name);
                Ok(false)
            });
        }

        assert!(!editor.dispatch_command(Command::KeyEscape));
        assert_eq!(*order.borrow(), vec!["critical", "normal", "editor"]);
    }

    #[test]
    fn handlers_can_dispatch_other_commands() {
        let mut editor = editor_with_text("");
        editor.register_command(CommandPriority::Low, |command, tx| {
            Ok(match command {
                Command::KeyTab { .. } => tx.dispatch(&Command::IndentContent)?,
                _ => false,
            })
        });
        let indents = Rc::new(Cell::new(0));
        let seen = indents.clone();
        editor.register_command(CommandPriority::Editor, move |command, _| {
            let hit = *command == Command::IndentContent;
            if hit {
                seen.set(seen.get() + 1);
            }
            Ok(hit)
        });

        assert!(editor.dispatch_command(Command::KeyTab { shift: false }));
        assert_eq!(indents.get(), 1);
    }

    #[test]
    fn unregistered_handlers_stop_receiving_commands() {
        let mut editor = editor_with_text("");
        let id = editor.register_command(CommandPriority::Normal, |_, _| Ok(true));
        assert!(editor.dispatch_command(Command::Focus));
        assert!(editor.unregister_command(id));
        assert!(!editor.dispatch_command(Command::Focus));
    }
}
