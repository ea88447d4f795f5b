//! Which buttons the toolbar shows for a [`ToolbarState`] and what pressing them
//! does.
//!
//! While the caret is in a code block the toolbar shrinks to the code-block
//! button, the language selector and clear formatting. Everywhere else it shows
//! four groups: block types, inline formats, the horizontal rule and clear
//! formatting.

use crate::editing::{BlockConstructor, Editor, ListType, TextFormatType};

use super::block_type::BlockType;
use super::dispatch::{clear_format, format_block, format_inline, insert_horizontal_rule};
use super::heading_selector::HeadingSelector;
use super::link_editor::LinkEditor;
use super::sync::ToolbarState;

const LABEL_PREFIX: &str = "scm-documentation-viewer-plugin.editor.toolbar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarAction {
    Paragraph,
    BulletList,
    NumberList,
    Quote,
    CodeBlock,
    Bold,
    Italic,
    Strikethrough,
    Link,
    InlineCode,
    HorizontalRule,
    ClearFormat,
}

/// What the caller has to do after an action ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarEffect {
    /// The editor ran an update; `true` when it committed a change.
    Updated(bool),
    /// Show the link form.
    OpenLinkEditor(LinkEditor),
}

impl ToolbarAction {
    pub fn icon(self) -> &'static str {
        match self {
            ToolbarAction::Paragraph => "paragraph",
            ToolbarAction::BulletList => "list-ul",
            ToolbarAction::NumberList => "list-ol",
            ToolbarAction::Quote => "quote-right",
            ToolbarAction::CodeBlock | ToolbarAction::InlineCode => "code",
            ToolbarAction::Bold => "bold",
            ToolbarAction::Italic => "italic",
            ToolbarAction::Strikethrough => "strikethrough",
            ToolbarAction::Link => "link",
            ToolbarAction::HorizontalRule => "minus",
            ToolbarAction::ClearFormat => "eraser",
        }
    }

    /// Last segment of the translation key for the button's accessible label.
    pub fn label_key(self) -> &'static str {
        match self {
            ToolbarAction::Paragraph => "paragraph",
            ToolbarAction::BulletList => "ul",
            ToolbarAction::NumberList => "ol",
            ToolbarAction::Quote => "quote",
            ToolbarAction::CodeBlock => "codeBlock",
            ToolbarAction::Bold => "bold",
            ToolbarAction::Italic => "italic",
            ToolbarAction::Strikethrough => "strikethrough",
            ToolbarAction::Link => "link",
            ToolbarAction::InlineCode => "code",
            ToolbarAction::HorizontalRule => "hr",
            ToolbarAction::ClearFormat => "clear",
        }
    }

    pub fn label(self) -> String {
        format!("{LABEL_PREFIX}.{}", self.label_key())
    }

    pub fn apply(self, editor: &mut Editor) -> ToolbarEffect {
        let updated = match self {
            ToolbarAction::Paragraph => format_block(editor, BlockConstructor::Paragraph),
            ToolbarAction::BulletList => {
                format_block(editor, BlockConstructor::List(ListType::Bullet))
            }
            ToolbarAction::NumberList => {
                format_block(editor, BlockConstructor::List(ListType::Number))
            }
            ToolbarAction::Quote => format_block(editor, BlockConstructor::Quote),
            ToolbarAction::CodeBlock => format_block(editor, BlockConstructor::Code),
            ToolbarAction::Bold => format_inline(editor, TextFormatType::Bold),
            ToolbarAction::Italic => format_inline(editor, TextFormatType::Italic),
            ToolbarAction::Strikethrough => format_inline(editor, TextFormatType::Strikethrough),
            ToolbarAction::InlineCode => format_inline(editor, TextFormatType::Code),
            ToolbarAction::HorizontalRule => insert_horizontal_rule(editor),
            ToolbarAction::ClearFormat => clear_format(editor),
            ToolbarAction::Link => return ToolbarEffect::OpenLinkEditor(LinkEditor::open(editor)),
        };
        ToolbarEffect::Updated(updated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    pub action: ToolbarAction,
    pub icon: &'static str,
    pub label: String,
    pub is_active: bool,
}

impl ToolbarButton {
    fn new(action: ToolbarAction, is_active: bool) -> Self {
        Self {
            action,
            icon: action.icon(),
            label: action.label(),
            is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarItem {
    Button(ToolbarButton),
    HeadingSelector { is_active: bool, level: u8 },
    CodeLanguageSelector,
}

impl ToolbarItem {
    pub fn is_active(&self) -> bool {
        match self {
            ToolbarItem::Button(button) => button.is_active,
            ToolbarItem::HeadingSelector { is_active, .. } => *is_active,
            ToolbarItem::CodeLanguageSelector => false,
        }
    }
}

/// Where an item sits in its group, for rounding the group's outer corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPosition {
    Single,
    First,
    Middle,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonGroup {
    pub items: Vec<ToolbarItem>,
}

impl ButtonGroup {
    fn of(items: impl IntoIterator<Item = ToolbarItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub fn position(&self, index: usize) -> GroupPosition {
        let last = self.items.len().saturating_sub(1);
        match index {
            _ if last == 0 => GroupPosition::Single,
            0 => GroupPosition::First,
            i if i >= last => GroupPosition::Last,
            _ => GroupPosition::Middle,
        }
    }

    pub fn positioned(&self) -> impl Iterator<Item = (GroupPosition, &ToolbarItem)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (self.position(i), item))
    }
}

pub fn toolbar_layout(state: &ToolbarState) -> Vec<ButtonGroup> {
    let button = |action, is_active| ToolbarItem::Button(ToolbarButton::new(action, is_active));
    let clear = ButtonGroup::of([button(ToolbarAction::ClearFormat, false)]);

    if state.active_block == BlockType::Code {
        return vec![
            ButtonGroup::of([button(ToolbarAction::CodeBlock, true)]),
            ButtonGroup::of([ToolbarItem::CodeLanguageSelector]),
            clear,
        ];
    }

    let block = state.active_block;
    vec![
        ButtonGroup::of([
            button(ToolbarAction::Paragraph, block == BlockType::Paragraph),
            ToolbarItem::HeadingSelector {
                is_active: HeadingSelector::is_active(block),
                level: HeadingSelector::label(block),
            },
            button(ToolbarAction::BulletList, block == BlockType::Bullet),
            button(ToolbarAction::NumberList, block == BlockType::Number),
            button(ToolbarAction::Quote, block == BlockType::Quote),
            button(ToolbarAction::CodeBlock, false),
        ]),
        ButtonGroup::of([
            button(ToolbarAction::Bold, state.is_bold),
            button(ToolbarAction::Italic, state.is_italic),
            button(ToolbarAction::Strikethrough, state.is_strike_through),
            button(ToolbarAction::Link, state.is_link),
            button(ToolbarAction::InlineCode, state.is_code),
        ]),
        ButtonGroup::of([button(ToolbarAction::HorizontalRule, false)]),
        clear,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::HeadingTag;
    use pretty_assertions::assert_eq;

    fn actions(groups: &[ButtonGroup]) -> Vec<Vec<String>> {
        groups
            .iter()
            .map(|group| {
                group
                    .items
                    .iter()
                    .map(|item| match item {
                        ToolbarItem::Button(button) => button.icon.to_string(),
                        ToolbarItem::HeadingSelector { level, .. } => format!("h{level}"),
                        ToolbarItem::CodeLanguageSelector => "language".to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn normal_mode_has_four_groups() {
        let groups = toolbar_layout(&ToolbarState::default());
        assert_eq!(
            actions(&groups),
            vec![
                vec!["paragraph", "h1", "list-ul", "list-ol", "quote-right", "code"],
                vec!["bold", "italic", "strikethrough", "link", "code"],
                vec!["minus"],
                vec!["eraser"],
            ]
        );
        assert!(groups[0].items[0].is_active());
        assert!(!groups[0].items[1].is_active());
    }

    #[test]
    fn code_mode_shows_the_language_selector() {
        let state = ToolbarState {
            active_block: BlockType::Code,
            ..ToolbarState::default()
        };
        let groups = toolbar_layout(&state);
        assert_eq!(
            actions(&groups),
            vec![vec!["code"], vec!["language"], vec!["eraser"]]
        );
        assert!(groups[0].items[0].is_active());
    }

    #[test]
    fn active_flags_follow_the_state() {
        let state = ToolbarState {
            is_italic: true,
            is_link: true,
            active_block: BlockType::Heading(HeadingTag::H2),
            ..ToolbarState::default()
        };
        let groups = toolbar_layout(&state);
        let active: Vec<bool> = groups[1].items.iter().map(ToolbarItem::is_active).collect();
        assert_eq!(active, vec![false, true, false, true, false]);
        assert_eq!(
            groups[0].items[1],
            ToolbarItem::HeadingSelector {
                is_active: true,
                level: 2
            }
        );
        assert!(!groups[0].items[0].is_active());
    }

    #[test]
    fn positions_within_groups() {
        let groups = toolbar_layout(&ToolbarState::default());
        let positions: Vec<GroupPosition> = groups[1].positioned().map(|(p, _)| p).collect();
        assert_eq!(
            positions,
            vec![
                GroupPosition::First,
                GroupPosition::Middle,
                GroupPosition::Middle,
                GroupPosition::Middle,
                GroupPosition::Last,
            ]
        );
        assert_eq!(groups[2].position(0), GroupPosition::Single);
    }

    #[test]
    fn labels_use_translation_keys() {
        assert_eq!(
            ToolbarAction::CodeBlock.label(),
            "scm-documentation-viewer-plugin.editor.toolbar.codeBlock"
        );
        assert_eq!(ToolbarAction::HorizontalRule.label_key(), "hr");
    }
}
