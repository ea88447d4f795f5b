//! The modal form behind the toolbar's link button.

use crate::editing::{Command, Editor, EditorState, NodeKind};
use crate::plugins::link::link_ancestor;

/// Form state of an open link editor. Dropping it closes the modal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkEditor {
    pub href: String,
    pub text: String,
}

impl LinkEditor {
    /// Opens the editor, prefilled from the link around the anchor or, outside a
    /// link, with the selected text and an empty target.
    pub fn open(editor: &Editor) -> Self {
        editor.read(Self::prefill)
    }

    fn prefill(state: &EditorState) -> Self {
        let Some(anchor) = state.anchor_node() else {
            return Self::default();
        };
        match link_ancestor(state, anchor) {
            Some(link) => Self {
                href: match state.kind(link) {
                    Some(NodeKind::Link { url }) => url.clone(),
                    _ => String::new(),
                },
                text: state.text_content(link),
            },
            None => Self {
                href: String::new(),
                text: state.selected_text(),
            },
        }
    }

    /// Replaces the selection, or the link around it, with a link to `href` showing
    /// `text`. Consumes the editor: the modal closes whether or not anything changed.
    pub fn submit(self, editor: &mut Editor) -> bool {
        let Self { href, text } = self;
        log::debug!("Submitting link to {href}");
        editor.update(|tx| {
            let Some(anchor) = tx.anchor_node() else {
                return Ok(());
            };
            if let Some(link) = link_ancestor(tx.state(), anchor) {
                tx.remove(link)?;
            }
            tx.remove_text()?;
            let link = tx.create(NodeKind::Link { url: href.clone() });
            tx.insert_nodes(&[link])?;
            tx.insert_text(&text)?;
            tx.dispatch(&Command::ToggleLink(Some(href)))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{NodeKey, Point, TextFormat};
    use crate::plugins;
    use pretty_assertions::assert_eq;

    fn links(state: &EditorState) -> Vec<(String, String)> {
        state
            .preorder()
            .into_iter()
            .filter_map(|k| match state.kind(k) {
                Some(NodeKind::Link { url }) => Some((url.clone(), state.text_content(k))),
                _ => None,
            })
            .collect()
    }

    fn editor_with(text: &str) -> (Editor, NodeKey) {
        let mut state = EditorState::new();
        let paragraph = state.create(NodeKind::Paragraph);
        state.append(NodeKey::ROOT, paragraph).unwrap();
        let run = state.create_text(text, TextFormat::empty());
        state.append(paragraph, run).unwrap();
        let mut editor = Editor::new("test", state);
        plugins::link::register(&mut editor);
        (editor, run)
    }

    #[test]
    fn empty_selection_inserts_a_new_link() {
        let (mut editor, run) = editor_with("see ");
        editor.update(|tx| {
            tx.select_caret(Point::text(run, 4));
            Ok(())
        });

        let mut form = LinkEditor::open(&editor);
        assert_eq!(form, LinkEditor::default());
        form.href = "https://example.com".into();
        form.text = "Example".into();
        assert!(form.submit(&mut editor));

        let state = editor.state();
        assert_eq!(
            links(state),
            vec![("https://example.com".into(), "Example".into())]
        );
        assert_eq!(state.text_content(NodeKey::ROOT), "see Example");
    }

    #[test]
    fn selection_prefills_the_text() {
        let (mut editor, run) = editor_with("read the docs");
        editor.update(|tx| {
            tx.select_text(run, 9, 13);
            Ok(())
        });
        let form = LinkEditor::open(&editor);
        assert_eq!(form.text, "docs");
        assert_eq!(form.href, "");

        LinkEditor {
            href: "/docs".into(),
            ..form
        }
        .submit(&mut editor);

        assert_eq!(links(editor.state()), vec![("/docs".into(), "docs".into())]);
        assert_eq!(editor.state().text_content(NodeKey::ROOT), "read the docs");
    }

    #[test]
    fn editing_an_existing_link_replaces_it() {
        let (mut editor, _) = editor_with("go ");
        editor.update(|tx| {
            let paragraph = tx.children(NodeKey::ROOT)[0];
            let link = tx.create(NodeKind::Link { url: "/old".into() });
            let label = tx.create_text("home", TextFormat::empty());
            tx.append(paragraph, link)?;
            tx.append(link, label)?;
            tx.select_caret(Point::text(label, 2));
            Ok(())
        });

        let mut form = LinkEditor::open(&editor);
        assert_eq!(form.href, "/old");
        assert_eq!(form.text, "home");
        form.href = "/new".into();
        form.text = "start".into();
        form.submit(&mut editor);

        assert_eq!(links(editor.state()), vec![("/new".into(), "start".into())]);
        assert_eq!(editor.state().text_content(NodeKey::ROOT), "go start");
    }
}
