//! Horizontal rules: `---`, `***` or `___` on a line of their own, always written
//! back as `***`.

use crate::editing::{EditorError, EditorState, NodeKey, NodeKind};

use super::transformers::{ElementTransformer, ExportChildren, ReplaceContext};

pub struct HorizontalRule;

impl HorizontalRule {
    pub const PATTERN: &'static str = r"^(---|\*\*\*|___)\s?$";
    pub const EXPORT: &'static str = "***";
}

pub fn transformer() -> ElementTransformer {
    ElementTransformer {
        name: "horizontal_rule",
        reg_exp: regex::Regex::new(HorizontalRule::PATTERN).expect("Invalid horizontal rule regex"),
        export,
        replace,
    }
}

fn export(
    state: &EditorState,
    node: NodeKey,
    _export_children: &ExportChildren<'_>,
) -> Option<String> {
    (state.kind(node) == Some(&NodeKind::HorizontalRule)).then(|| HorizontalRule::EXPORT.to_string())
}

/// Imports always replace the matched paragraph. While typing, the paragraph is only
/// replaced when something follows it; otherwise the rule goes in front so the caret
/// keeps an empty paragraph to continue in.
fn replace(state: &mut EditorState, ctx: ReplaceContext<'_>) -> Result<(), EditorError> {
    let line = state.create(NodeKind::HorizontalRule);
    if ctx.is_import || state.next_sibling(ctx.parent).is_some() {
        state.replace(ctx.parent, line, false)?;
    } else {
        state.insert_before(ctx.parent, line)?;
    }
    state.select_next(line);
    Ok(())
}
