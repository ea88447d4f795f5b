use std::cell::RefCell;
use std::rc::Rc;

use crate::editing::{
    Editor, EditorState, ListenerId, NodeKey, NodeKind, TextFormatType,
};

use super::block_type::BlockType;

/// What the toolbar highlights for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolbarState {
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_strike_through: bool,
    pub is_code: bool,
    pub is_link: bool,
    pub active_block: BlockType,
}

/// Derives the toolbar state from a committed editor state.
///
/// Returns `None` without a range selection, in which case the toolbar keeps
/// showing what it showed before.
pub fn synchronize(state: &EditorState) -> Option<ToolbarState> {
    let range = state.range_selection()?;
    let anchor = range.anchor.key;
    let is_link = state.kind(anchor).is_some_and(NodeKind::is_link)
        || state
            .parent(anchor)
            .and_then(|parent| state.kind(parent))
            .is_some_and(NodeKind::is_link);

    let element = if anchor == NodeKey::ROOT {
        Some(anchor)
    } else {
        state.top_level_element(anchor)
    };

    let active_block = match element.and_then(|key| state.kind(key)) {
        Some(NodeKind::List { list_type, .. }) => {
            let nearest = state
                .find_matching_parent(anchor, NodeKind::is_list)
                .and_then(|list| match state.kind(list) {
                    Some(NodeKind::List { list_type, .. }) => Some(*list_type),
                    _ => None,
                });
            BlockType::from(nearest.unwrap_or(*list_type))
        }
        Some(NodeKind::Heading { tag }) => BlockType::Heading(*tag),
        Some(kind) => BlockType::from_key(kind.type_name()).unwrap_or_default(),
        None => BlockType::Paragraph,
    };

    Some(ToolbarState {
        is_bold: range.has_format(TextFormatType::Bold),
        is_italic: range.has_format(TextFormatType::Italic),
        is_strike_through: range.has_format(TextFormatType::Strikethrough),
        is_code: range.has_format(TextFormatType::Code),
        is_link,
        active_block,
    })
}

/// Keeps a shared [`ToolbarState`] in step with the editor.
#[derive(Debug, Clone, Default)]
pub struct ToolbarSync {
    state: Rc<RefCell<ToolbarState>>,
}

impl ToolbarSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ToolbarState {
        *self.state.borrow()
    }

    pub fn register(&self, editor: &mut Editor) -> ListenerId {
        if let Some(initial) = editor.read(synchronize) {
            *self.state.borrow_mut() = initial;
        }
        let shared = self.state.clone();
        editor.register_update_listener(move |state| {
            if let Some(next) = synchronize(state) {
                *shared.borrow_mut() = next;
            }
        })
    }
}
