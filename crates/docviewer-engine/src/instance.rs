//! The handle a host keeps to read markdown back out of a mounted editor.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::editing::EditorState;
use crate::markdown::{MARKDOWN_TRANSFORMERS, convert_to_markdown_string};

/// Passed to the change callback after every committed update.
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a> {
    state: &'a EditorState,
}

impl<'a> ChangeEvent<'a> {
    pub fn state(&self) -> &'a EditorState {
        self.state
    }

    /// The state that triggered this event, as markdown.
    pub fn markdown_string(&self) -> String {
        convert_to_markdown_string(self.state, &MARKDOWN_TRANSFORMERS)
    }
}

type ChangeCallback = Box<dyn FnMut(ChangeEvent<'_>)>;

#[derive(Default)]
struct Inner {
    editor_state: Option<EditorState>,
    on_change: Option<ChangeCallback>,
}

/// Shared between the host and the editor's change listener; clones refer to the
/// same instance.
#[derive(Clone, Default)]
pub struct MarkdownEditorInstance {
    inner: Rc<RefCell<Inner>>,
}

impl fmt::Debug for MarkdownEditorInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MarkdownEditorInstance")
            .field("has_state", &inner.editor_state.is_some())
            .field("has_on_change", &inner.on_change.is_some())
            .finish()
    }
}

impl MarkdownEditorInstance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_change(on_change: impl FnMut(ChangeEvent<'_>) + 'static) -> Self {
        let instance = Self::new();
        instance.inner.borrow_mut().on_change = Some(Box::new(on_change));
        instance
    }

    /// Stores `state` and reports it to the change callback.
    pub fn on_state_change(&self, state: &EditorState) {
        // The callback is taken out while it runs so it may read this instance.
        let callback = {
            let mut inner = self.inner.borrow_mut();
            inner.editor_state = Some(state.clone());
            inner.on_change.take()
        };
        if let Some(mut callback) = callback {
            callback(ChangeEvent { state });
            let mut inner = self.inner.borrow_mut();
            if inner.on_change.is_none() {
                inner.on_change = Some(callback);
            }
        }
    }

    pub fn editor_state(&self) -> Option<EditorState> {
        self.inner.borrow().editor_state.clone()
    }

    /// Markdown for the last stored state, or an empty string before the first change.
    pub fn get_markdown_string(&self) -> String {
        self.inner
            .borrow()
            .editor_state
            .as_ref()
            .map(|state| convert_to_markdown_string(state, &MARKDOWN_TRANSFORMERS))
            .unwrap_or_default()
    }
}
