use crate::composer::MarkdownEditor;
use crate::editing::EditorError;
use crate::instance::MarkdownEditorInstance;

/// Inputs of the documentation page's editor.
pub struct DocumentationEditorProps {
    pub content: Option<String>,
    pub disabled: bool,
    pub on_change: Box<dyn FnMut(String)>,
}

/// Mounts a markdown editor for `props.content` whose changes reach
/// `props.on_change` as markdown. A disabled editor mounts nothing.
pub fn documentation_editor(
    props: DocumentationEditorProps,
) -> Result<Option<MarkdownEditor>, EditorError> {
    let DocumentationEditorProps {
        content,
        disabled,
        mut on_change,
    } = props;
    if disabled {
        return Ok(None);
    }
    let instance =
        MarkdownEditorInstance::with_on_change(move |event| on_change(event.markdown_string()));
    MarkdownEditor::new(content.as_deref().unwrap_or_default(), &instance).map(Some)
}
