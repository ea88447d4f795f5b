use std::fmt;
use std::str::FromStr;

use crate::editing::{HeadingTag, ListType};

/// The block kinds the toolbar can show as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    Bullet,
    Check,
    Code,
    Heading(HeadingTag),
    Number,
    #[default]
    Paragraph,
    Quote,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type: {0}")]
pub struct UnknownBlockType(pub String);

impl BlockType {
    pub const ALL: [BlockType; 12] = [
        BlockType::Bullet,
        BlockType::Check,
        BlockType::Code,
        BlockType::Heading(HeadingTag::H1),
        BlockType::Heading(HeadingTag::H2),
        BlockType::Heading(HeadingTag::H3),
        BlockType::Heading(HeadingTag::H4),
        BlockType::Heading(HeadingTag::H5),
        BlockType::Heading(HeadingTag::H6),
        BlockType::Number,
        BlockType::Paragraph,
        BlockType::Quote,
    ];

    /// The key used to look the block up, e.g. `h2` or `bullet`.
    pub fn key(self) -> &'static str {
        match self {
            BlockType::Bullet => "bullet",
            BlockType::Check => "check",
            BlockType::Code => "code",
            BlockType::Heading(tag) => tag.as_str(),
            BlockType::Number => "number",
            BlockType::Paragraph => "paragraph",
            BlockType::Quote => "quote",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            BlockType::Bullet => "Bulleted List",
            BlockType::Check => "Check List",
            BlockType::Code => "Code Block",
            BlockType::Heading(HeadingTag::H1) => "Heading 1",
            BlockType::Heading(HeadingTag::H2) => "Heading 2",
            BlockType::Heading(HeadingTag::H3) => "Heading 3",
            BlockType::Heading(HeadingTag::H4) => "Heading 4",
            BlockType::Heading(HeadingTag::H5) => "Heading 5",
            BlockType::Heading(HeadingTag::H6) => "Heading 6",
            BlockType::Number => "Numbered List",
            BlockType::Paragraph => "Normal",
            BlockType::Quote => "Quote",
        }
    }

    pub fn from_key(key: &str) -> Option<BlockType> {
        BlockType::ALL.into_iter().find(|block| block.key() == key)
    }

    pub fn heading_tag(self) -> Option<HeadingTag> {
        match self {
            BlockType::Heading(tag) => Some(tag),
            _ => None,
        }
    }
}

impl From<ListType> for BlockType {
    fn from(list_type: ListType) -> Self {
        match list_type {
            ListType::Bullet => BlockType::Bullet,
            ListType::Number => BlockType::Number,
            ListType::Check => BlockType::Check,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::from_key(s).ok_or_else(|| UnknownBlockType(s.to_string()))
    }
}
