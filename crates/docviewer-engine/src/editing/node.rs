use std::fmt;

use super::format::TextFormat;

/// Stable identity of a node inside one [`EditorState`](super::EditorState) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub(crate) u32);

impl NodeKey {
    pub const ROOT: NodeKey = NodeKey(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingTag {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingTag {
    pub const ALL: [HeadingTag; 6] = [
        HeadingTag::H1,
        HeadingTag::H2,
        HeadingTag::H3,
        HeadingTag::H4,
        HeadingTag::H5,
        HeadingTag::H6,
    ];

    pub fn level(self) -> u8 {
        match self {
            HeadingTag::H1 => 1,
            HeadingTag::H2 => 2,
            HeadingTag::H3 => 3,
            HeadingTag::H4 => 4,
            HeadingTag::H5 => 5,
            HeadingTag::H6 => 6,
        }
    }

    pub fn from_level(level: usize) -> Option<HeadingTag> {
        HeadingTag::ALL.get(level.checked_sub(1)?).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeadingTag::H1 => "h1",
            HeadingTag::H2 => "h2",
            HeadingTag::H3 => "h3",
            HeadingTag::H4 => "h4",
            HeadingTag::H5 => "h5",
            HeadingTag::H6 => "h6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListType {
    Bullet,
    Number,
    Check,
}

impl ListType {
    pub fn as_str(self) -> &'static str {
        match self {
            ListType::Bullet => "bullet",
            ListType::Number => "number",
            ListType::Check => "check",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextNode {
    pub text: String,
    pub format: TextFormat,
    pub style: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>, format: TextFormat) -> Self {
        Self {
            text: text.into(),
            format,
            style: String::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The closed set of node types an editor document can contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading { tag: HeadingTag },
    Quote,
    Code { language: Option<String> },
    List { list_type: ListType, start: u32 },
    ListItem { checked: Option<bool> },
    Link { url: String },
    HorizontalRule,
    LineBreak,
    Text(TextNode),
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Quote => "quote",
            NodeKind::Code { .. } => "code",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem { .. } => "listitem",
            NodeKind::Link { .. } => "link",
            NodeKind::HorizontalRule => "horizontalrule",
            NodeKind::LineBreak => "linebreak",
            NodeKind::Text(_) => "text",
        }
    }

    /// Elements can hold children.
    pub fn is_element(&self) -> bool {
        !matches!(
            self,
            NodeKind::Text(_) | NodeKind::LineBreak | NodeKind::HorizontalRule
        )
    }

    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text(_) | NodeKind::LineBreak | NodeKind::Link { .. }
        )
    }

    /// Whether inline content (text, links, line breaks) may be placed directly inside.
    pub fn accepts_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Paragraph
                | NodeKind::Heading { .. }
                | NodeKind::Quote
                | NodeKind::Code { .. }
                | NodeKind::ListItem { .. }
                | NodeKind::Link { .. }
        )
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text(_))
    }

    pub fn is_link(&self) -> bool {
        matches!(self, NodeKind::Link { .. })
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NodeKind::List { .. })
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, NodeKind::ListItem { .. })
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}
