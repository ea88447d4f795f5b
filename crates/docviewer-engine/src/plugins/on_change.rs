use crate::editing::{Editor, EditorState, ListenerId};

/// Forwards every committed state to `on_change`.
pub fn register(editor: &mut Editor, on_change: impl FnMut(&EditorState) + 'static) -> ListenerId {
    editor.register_update_listener(on_change)
}
