//! `ToggleLink`: wraps the selected text in a link, retargets the link around the
//! caret, or removes links from the selection.

use crate::editing::{
    Command, CommandPriority, Editor, EditorError, EditorState, ListenerId, NodeKey, NodeKind,
    TextRange,
};

pub fn register(editor: &mut Editor) -> ListenerId {
    editor.register_command(CommandPriority::Editor, |command, tx| {
        let Command::ToggleLink(url) = command else {
            return Ok(false);
        };
        toggle_link(tx, url.as_deref())?;
        Ok(true)
    })
}

/// The link enclosing `key`, if any.
pub fn link_ancestor(state: &EditorState, key: NodeKey) -> Option<NodeKey> {
    state.find_matching_parent(key, NodeKind::is_link)
}

pub fn toggle_link(state: &mut EditorState, url: Option<&str>) -> Result<(), EditorError> {
    let Some(collapsed) = state.range_selection().map(|range| range.is_collapsed()) else {
        return Ok(());
    };
    let Some(url) = url else {
        for key in state.selected_nodes() {
            if let Some(link) = link_ancestor(state, key) {
                state.unwrap_element(link)?;
            }
        }
        return Ok(());
    };

    if collapsed {
        if let Some(anchor) = state.anchor_node()
            && let Some(link) = link_ancestor(state, anchor)
        {
            set_url(state, link, url)?;
        }
        return Ok(());
    }

    let ranges: Vec<TextRange> = state
        .selected_text_ranges()
        .into_iter()
        .filter(|r| !r.is_empty())
        .collect();
    let mut current: Option<NodeKey> = None;
    for r in ranges {
        let key = state.isolate_text(r)?;
        let Some(parent) = state.parent(key) else {
            continue;
        };
        if let Some(link) = link_ancestor(state, parent) {
            set_url(state, link, url)?;
            continue;
        }
        // Runs that follow each other inside one parent share a link.
        let link = match current.filter(|&link| state.next_sibling(link) == Some(key)) {
            Some(link) => link,
            None => {
                let link = state.create(NodeKind::Link {
                    url: url.to_string(),
                });
                state.insert_before(key, link)?;
                link
            }
        };
        state.append(link, key)?;
        current = Some(link);
    }
    Ok(())
}

fn set_url(state: &mut EditorState, link: NodeKey, url: &str) -> Result<(), EditorError> {
    if let NodeKind::Link { url: current } = state.kind_mut(link)? {
        *current = url.to_string();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Point, TextFormat};
    use pretty_assertions::assert_eq;

    fn paragraph(runs: &[(&str, TextFormat)]) -> (EditorState, Vec<NodeKey>) {
        let mut state = EditorState::new();
        let block = state.create(NodeKind::Paragraph);
        state.append(NodeKey::ROOT, block).unwrap();
        let keys = runs
            .iter()
            .map(|(text, format)| {
                let run = state.create_text(*text, *format);
                state.append(block, run).unwrap();
                run
            })
            .collect();
        (state, keys)
    }

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

    #[test]
    fn wraps_exactly_the_selected_characters() {
        let (mut state, keys) = paragraph(&[("read the docs", TextFormat::empty())]);
        state.select_text(keys[0], 9, 13);
        toggle_link(&mut state, Some("https://example.com")).unwrap();
        assert_eq!(
            links(&state),
            vec![("https://example.com".into(), "docs".into())]
        );
        assert_eq!(state.text_content(NodeKey::ROOT), "read the docs");
    }

    #[test]
    fn adjacent_runs_share_one_link() {
        let (mut state, keys) = paragraph(&[
            ("plain ", TextFormat::empty()),
            ("bold", TextFormat::BOLD),
        ]);
        state.select(Point::text(keys[0], 0), Point::text(keys[1], 4));
        toggle_link(&mut state, Some("/a")).unwrap();
        assert_eq!(links(&state), vec![("/a".into(), "plain bold".into())]);
    }

    #[test]
    fn caret_inside_a_link_retargets_it() {
        let (mut state, keys) = paragraph(&[("docs", TextFormat::empty())]);
        state.select_text(keys[0], 0, 4);
        toggle_link(&mut state, Some("/old")).unwrap();
        state.select_caret(Point::text(keys[0], 2));
        toggle_link(&mut state, Some("/new")).unwrap();
        assert_eq!(links(&state), vec![("/new".into(), "docs".into())]);
    }

    #[test]
    fn none_removes_links_from_the_selection() {
        let (mut state, keys) = paragraph(&[("docs", TextFormat::empty())]);
        state.select_text(keys[0], 0, 4);
        toggle_link(&mut state, Some("/a")).unwrap();
        toggle_link(&mut state, None).unwrap();
        assert!(links(&state).is_empty());
        assert_eq!(state.text_content(NodeKey::ROOT), "docs");
    }
}
