use crate::editing::{BlockConstructor, Editor, HeadingTag};

use super::block_type::BlockType;
use super::dispatch::format_block;

/// Dropdown for the six heading levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadingSelector {
    open: bool,
}

impl HeadingSelector {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle_open(&mut self) {
        self.open = !self.open;
    }

    pub fn is_active(active_block: BlockType) -> bool {
        active_block.heading_tag().is_some()
    }

    /// The level digit shown on the button; `1` when no heading is active.
    pub fn label(active_block: BlockType) -> u8 {
        active_block.heading_tag().map_or(1, HeadingTag::level)
    }

    /// Entries listed while open, as `(tag, level)`.
    pub fn options() -> impl Iterator<Item = (HeadingTag, u8)> {
        HeadingTag::ALL.into_iter().map(|tag| (tag, tag.level()))
    }

    pub fn choose(&mut self, editor: &mut Editor, tag: HeadingTag) -> bool {
        self.open = false;
        format_block(editor, BlockConstructor::Heading(tag))
    }
}
