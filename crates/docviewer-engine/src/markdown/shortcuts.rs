use crate::editing::{EditorError, EditorState, NodeKey, NodeKind};

use super::transformers::{ReplaceContext, Transformer};

/// Turns the block around the caret into an element when the text typed so far is a
/// block trigger such as `# ` or `- `. Only fires when the caret sits in the first
/// text of a top-level block, right after a space, and the trigger spans everything
/// before the caret.
///
/// Returns whether a transformer ran.
pub fn run_element_shortcuts(
    state: &mut EditorState,
    transformers: &[Transformer],
) -> Result<bool, EditorError> {
    let Some(range) = state.range_selection() else {
        return Ok(false);
    };
    if !range.is_collapsed() || !range.anchor.is_text() {
        return Ok(false);
    }
    let (anchor, offset) = (range.anchor.key, range.anchor.offset);
    let Some(parent) = state.parent(anchor) else {
        return Ok(false);
    };
    if state.parent(parent) != Some(NodeKey::ROOT)
        || matches!(state.kind(parent), Some(NodeKind::Code { .. }))
        || state.first_child(parent) != Some(anchor)
    {
        return Ok(false);
    }
    let Some(text) = state.text(anchor).map(|node| node.text.clone()) else {
        return Ok(false);
    };
    if offset == 0 || text.chars().nth(offset - 1) != Some(' ') {
        return Ok(false);
    }

    for transformer in transformers.iter().filter_map(Transformer::as_element) {
        let Some(captures) = transformer.reg_exp.captures(&text) else {
            continue;
        };
        let matched = captures.get(0).map_or(0, |m| m.as_str().chars().count());
        if matched != offset {
            continue;
        }
        log::debug!("Markdown shortcut {} in block {parent}", transformer.name);
        let next_siblings = state.next_siblings(anchor);
        let (leading, remainder) = state.split_at(anchor, offset)?;
        if let Some(leading) = leading {
            state.remove(leading)?;
        }
        let children = remainder.into_iter().chain(next_siblings).collect();
        (transformer.replace)(
            state,
            ReplaceContext {
                parent,
                children,
                captures: &captures,
                is_import: false,
            },
        )?;
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{HeadingTag, ListType, Point, TextFormat};
    use crate::markdown::MARKDOWN_TRANSFORMERS;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn typed(text: &str, caret: usize) -> (EditorState, NodeKey) {
        let mut state = EditorState::new();
        let paragraph = state.create(NodeKind::Paragraph);
        let run = state.create_text(text, TextFormat::empty());
        state.append(NodeKey::ROOT, paragraph).unwrap();
        state.append(paragraph, run).unwrap();
        state.select_caret(Point::text(run, caret));
        (state, run)
    }

    fn top_kind(state: &EditorState) -> NodeKind {
        let block = state.children(NodeKey::ROOT)[0];
        state.kind(block).unwrap().clone()
    }

    #[rstest]
    #[case("## ", NodeKind::Heading { tag: HeadingTag::H2 })]
    #[case("> ", NodeKind::Quote)]
    #[case("```ts ", NodeKind::Code { language: Some("ts".into()) })]
    #[case("- ", NodeKind::List { list_type: ListType::Bullet, start: 1 })]
    #[case("3. ", NodeKind::List { list_type: ListType::Number, start: 3 })]
    fn triggers_convert_the_block(#[case] trigger: &str, #[case] expected: NodeKind) {
        let (mut state, _) = typed(trigger, trigger.chars().count());
        assert!(run_element_shortcuts(&mut state, &MARKDOWN_TRANSFORMERS).unwrap());
        assert_eq!(top_kind(&state), expected);
    }

    #[test]
    fn text_after_the_trigger_moves_into_the_block() {
        let (mut state, _) = typed("# Title", 2);
        assert!(run_element_shortcuts(&mut state, &MARKDOWN_TRANSFORMERS).unwrap());
        let heading = state.children(NodeKey::ROOT)[0];
        assert_eq!(state.text_content(heading), "Title");
    }

    #[test]
    fn caret_away_from_the_trigger_does_nothing() {
        let (mut state, _) = typed("# Title ", 8);
        assert!(!run_element_shortcuts(&mut state, &MARKDOWN_TRANSFORMERS).unwrap());
        assert_eq!(top_kind(&state), NodeKind::Paragraph);
    }

    #[test]
    fn rule_shortcut_leaves_a_paragraph_to_type_in() {
        let (mut state, _) = typed("--- ", 4);
        assert!(run_element_shortcuts(&mut state, &MARKDOWN_TRANSFORMERS).unwrap());
        let kinds: Vec<_> = state
            .children(NodeKey::ROOT)
            .iter()
            .map(|&k| state.kind(k).unwrap().type_name())
            .collect();
        assert_eq!(kinds, vec!["horizontalrule", "paragraph"]);
    }
}
