//! The composition root: builds an [`Editor`] from markdown and wires up every
//! plugin the documentation editor uses.

use crate::editing::{Command, Editor, EditorError, NodeKey, NodeKind, TextFormat};
use crate::instance::MarkdownEditorInstance;
use crate::markdown::{MARKDOWN_TRANSFORMERS, convert_from_markdown_string};
use crate::plugins::{self, AccessibilityPlugin};
use crate::toolbar::{ToolbarState, ToolbarSync};

pub const DEFAULT_NAMESPACE: &str = "markdownEditor";

/// Node types an editor accepts on top of root, paragraph, text and line break.
pub const EDITOR_NODES: [&str; 7] = [
    "heading",
    "quote",
    "code",
    "link",
    "list",
    "listitem",
    "horizontalrule",
];

const BASE_NODES: [&str; 4] = ["root", "paragraph", "text", "linebreak"];

/// Class names attached to rendered content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub root: String,
    pub bold: String,
    pub italic: String,
    pub strikethrough: String,
    pub code: String,
    pub nested_list_item: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            root: "root".into(),
            bold: "bold".into(),
            italic: "italic".into(),
            strikethrough: "strikethrough".into(),
            code: "codeBlock".into(),
            nested_list_item: "nestedListItem".into(),
        }
    }
}

impl Theme {
    /// Classes for a text run, in bold, italic, strikethrough order.
    pub fn text_classes(&self, format: TextFormat) -> Vec<&str> {
        [
            (TextFormat::BOLD, &self.bold),
            (TextFormat::ITALIC, &self.italic),
            (TextFormat::STRIKETHROUGH, &self.strikethrough),
        ]
        .into_iter()
        .filter(|(flag, _)| format.contains(*flag))
        .map(|(_, class)| class.as_str())
        .collect()
    }

    /// Class for a block, if the theme styles it.
    pub fn block_class(&self, kind: &NodeKind, nested: bool) -> Option<&str> {
        match kind {
            NodeKind::Root => Some(self.root.as_str()),
            NodeKind::Code { .. } => Some(self.code.as_str()),
            NodeKind::ListItem { .. } if nested => Some(self.nested_list_item.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub namespace: String,
    pub theme: Theme,
    pub nodes: Vec<&'static str>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            theme: Theme::default(),
            nodes: EDITOR_NODES.to_vec(),
        }
    }
}

impl EditorConfig {
    pub fn supports(&self, kind: &NodeKind) -> bool {
        let name = kind.type_name();
        BASE_NODES.contains(&name) || self.nodes.contains(&name)
    }
}

/// A mounted markdown editor with its plugins.
pub struct MarkdownEditor {
    editor: Editor,
    config: EditorConfig,
    accessibility: AccessibilityPlugin,
    toolbar: ToolbarSync,
}

impl MarkdownEditor {
    pub fn new(initial_content: &str, instance: &MarkdownEditorInstance) -> Result<Self, EditorError> {
        Self::with_config(initial_content, instance, EditorConfig::default())
    }

    pub fn with_config(
        initial_content: &str,
        instance: &MarkdownEditorInstance,
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        let state = convert_from_markdown_string(initial_content, &MARKDOWN_TRANSFORMERS)?;
        if let Some(kind) = state
            .preorder()
            .into_iter()
            .filter_map(|key| state.kind(key))
            .find(|kind| !config.supports(kind))
        {
            return Err(EditorError::Other(format!(
                "node type {} is not registered with {}",
                kind.type_name(),
                config.namespace
            )));
        }

        let namespace = config.namespace.clone();
        let mut editor = Editor::new(config.namespace.clone(), state).with_error_handler(
            move |err| log::error!("Editor {namespace} failed: {err}"),
        );

        let accessibility = AccessibilityPlugin::new();
        accessibility.register(&mut editor);
        let toolbar = ToolbarSync::new();
        toolbar.register(&mut editor);
        plugins::rich_text::register(&mut editor);
        let instance = instance.clone();
        plugins::on_change::register(&mut editor, move |state| instance.on_state_change(state));
        plugins::markdown_shortcut::register(&mut editor);
        plugins::link::register(&mut editor);
        plugins::list::register(&mut editor);
        plugins::horizontal_rule::register(&mut editor);
        plugins::tab_indentation::register(&mut editor, &accessibility);

        log::debug!(
            "Mounted editor {} with {} blocks",
            config.namespace,
            editor.state().children(NodeKey::ROOT).len()
        );
        Ok(Self {
            editor,
            config,
            accessibility,
            toolbar,
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn accessibility(&self) -> &AccessibilityPlugin {
        &self.accessibility
    }

    pub fn toolbar_state(&self) -> ToolbarState {
        self.toolbar.current()
    }

    pub fn dispatch(&mut self, command: Command) -> bool {
        self.editor.dispatch_command(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{HeadingTag, Point};
    use crate::plugins::AccessibilityFocus;
    use crate::toolbar::BlockType;
    use pretty_assertions::assert_eq;

    #[test]
    fn typing_reaches_the_instance_as_markdown() {
        let instance = MarkdownEditorInstance::new();
        let mut editor = MarkdownEditor::new("# Title", &instance).unwrap();
        assert_eq!(instance.get_markdown_string(), "");

        editor.dispatch(Command::InsertText(" here".into()));
        assert_eq!(instance.get_markdown_string(), "# Title here");
        assert_eq!(
            editor.toolbar_state().active_block,
            BlockType::Heading(HeadingTag::H1)
        );
    }

    #[test]
    fn enter_splits_the_paragraph_through_the_full_chain() {
        let instance = MarkdownEditorInstance::new();
        let mut editor = MarkdownEditor::new("abcd", &instance).unwrap();
        editor.editor_mut().update(|tx| {
            let run = tx.first_text_descendant(NodeKey::ROOT).unwrap();
            tx.select_caret(Point::text(run, 2));
            Ok(())
        });

        assert!(editor.dispatch(Command::KeyEnter { ctrl: false }));
        assert_eq!(instance.get_markdown_string(), "ab\n\ncd");
    }

    #[test]
    fn escape_disables_tab_indentation() {
        let instance = MarkdownEditorInstance::new();
        let mut editor = MarkdownEditor::new("text", &instance).unwrap();
        assert!(editor.dispatch(Command::KeyTab { shift: false }));
        assert_eq!(instance.get_markdown_string(), "text\t");

        assert!(editor.dispatch(Command::KeyEscape));
        assert_eq!(editor.accessibility().focus(), AccessibilityFocus::FocusOnEditor);
        assert!(!editor.dispatch(Command::KeyTab { shift: false }));

        editor.dispatch(Command::KeyEnter { ctrl: true });
        assert!(editor.accessibility().tab_indentation_enabled());
    }

    #[test]
    fn default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.namespace, "markdownEditor");
        assert!(config.supports(&NodeKind::HorizontalRule));
        assert!(config.supports(&NodeKind::Paragraph));
    }

    #[test]
    fn unregistered_nodes_are_rejected() {
        let config = EditorConfig {
            nodes: vec!["heading"],
            ..EditorConfig::default()
        };
        let instance = MarkdownEditorInstance::new();
        let result = MarkdownEditor::with_config("> quoted", &instance, config);
        assert!(matches!(result, Err(EditorError::Other(_))));
    }

    #[test]
    fn theme_classes() {
        let theme = Theme::default();
        assert_eq!(
            theme.text_classes(TextFormat::BOLD | TextFormat::STRIKETHROUGH | TextFormat::CODE),
            vec!["bold", "strikethrough"]
        );
        assert_eq!(
            theme.block_class(&NodeKind::ListItem { checked: None }, true),
            Some("nestedListItem")
        );
        assert_eq!(theme.block_class(&NodeKind::ListItem { checked: None }, false), None);
    }
}
