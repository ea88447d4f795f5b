use crate::editing::{Editor, EditorState, NodeKey, NodeKind};

/// Languages offered for code blocks as `(key, display name)`.
pub const CODE_LANGUAGES: [(&str, &str); 5] = [
    ("text", "Text"),
    ("js", "JavaScript"),
    ("java", "Java"),
    ("ts", "TypeScript"),
    ("go", "GoLang"),
];

pub const DEFAULT_CODE_LANGUAGE: &str = "text";

pub fn language_name(key: &str) -> Option<&'static str> {
    CODE_LANGUAGES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| *name)
}

/// The dropdown shown in place of the block buttons while the caret is in a code
/// block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLanguageSelector {
    value: String,
}

impl Default for CodeLanguageSelector {
    fn default() -> Self {
        Self {
            value: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }
}

impl CodeLanguageSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Picks up the language of the code block around the anchor. Blocks without a
    /// language leave the current value alone.
    pub fn sync(&mut self, state: &EditorState) {
        if let Some(code) = code_block(state)
            && let Some(NodeKind::Code {
                language: Some(language),
            }) = state.kind(code)
        {
            self.value.clone_from(language);
        }
    }

    /// Retags the code block around the anchor. Unknown keys and carets outside a
    /// code block change nothing.
    pub fn select_language(&mut self, editor: &mut Editor, key: &str) -> bool {
        if language_name(key).is_none() {
            log::debug!("Ignoring unknown code language {key}");
            return false;
        }
        let mut retagged = false;
        editor.update(|tx| {
            if let Some(code) = code_block(tx.state())
                && let NodeKind::Code { language } = tx.kind_mut(code)?
            {
                *language = Some(key.to_string());
                retagged = true;
            }
            Ok(())
        });
        if retagged {
            self.value = key.to_string();
        }
        retagged
    }
}

fn code_block(state: &EditorState) -> Option<NodeKey> {
    let anchor = state.anchor_node()?;
    state.find_matching_parent(anchor, |kind| matches!(kind, NodeKind::Code { .. }))
}
