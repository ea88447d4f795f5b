use std::sync::LazyLock;

use regex::Regex;

use crate::editing::{EditorError, EditorState, NodeKey, NodeKind};

use super::inline::{InlineParser, append_inline};
use super::transformers::{ReplaceContext, Transformer};

/// A fence line, opening or closing. Unlike the as-you-type code shortcut, nothing
/// may follow the language name.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*```(\w{1,10})?\s?$").expect("Invalid code fence regex")
});

/// Builds a document from markdown.
///
/// Lines are processed one at a time:
///
/// - a fence line with a matching closing fence further down becomes a code block
///   holding everything in between; an unclosed fence is an ordinary line
/// - a line matching an element transformer becomes that block, with the rest of the
///   line parsed as inline content
/// - any other non-empty line continues the previous paragraph, quote or last list
///   item after a line break, or starts a new paragraph
///
/// Empty paragraphs are dropped and the caret ends up at the end of the document.
pub fn convert_from_markdown_string(
    markdown: &str,
    transformers: &[Transformer],
) -> Result<EditorState, EditorError> {
    let mut state = EditorState::new();
    let parser = InlineParser::new(transformers);
    let lines: Vec<&str> = markdown.split('\n').collect();

    let mut i = 0;
    while i < lines.len() {
        if let Some(end) = import_code_block(&mut state, &lines, i)? {
            i = end + 1;
            continue;
        }
        import_line(&mut state, &parser, transformers, lines[i])?;
        i += 1;
    }

    remove_empty_paragraphs(&mut state)?;
    state.select_end(NodeKey::ROOT);
    state.normalize();
    log::trace!(
        "Imported {} lines into {} blocks",
        lines.len(),
        state.children(NodeKey::ROOT).len()
    );
    Ok(state)
}

/// Returns the index of the closing fence when `start` opens a closed code block.
fn import_code_block(
    state: &mut EditorState,
    lines: &[&str],
    start: usize,
) -> Result<Option<usize>, EditorError> {
    let Some(open) = CODE_FENCE.captures(lines[start]) else {
        return Ok(None);
    };
    let Some(end) = (start + 1..lines.len()).find(|&j| CODE_FENCE.is_match(lines[j])) else {
        return Ok(None);
    };

    let language = open.get(1).map(|m| m.as_str().to_string());
    let code = state.create(NodeKind::Code { language });
    state.append(NodeKey::ROOT, code)?;
    for (n, line) in lines[start + 1..end].iter().enumerate() {
        if n > 0 {
            let line_break = state.create(NodeKind::LineBreak);
            state.append(code, line_break)?;
        }
        if !line.is_empty() {
            let text = state.create_text(*line, Default::default());
            state.append(code, text)?;
        }
    }
    Ok(Some(end))
}

fn import_line(
    state: &mut EditorState,
    parser: &InlineParser<'_>,
    transformers: &[Transformer],
    line: &str,
) -> Result<(), EditorError> {
    let paragraph = state.create(NodeKind::Paragraph);
    state.append(NodeKey::ROOT, paragraph)?;

    for transformer in transformers.iter().filter_map(Transformer::as_element) {
        let Some(captures) = transformer.reg_exp.captures(line) else {
            continue;
        };
        let rest = &line[captures.get(0).map_or(0, |m| m.end())..];
        let children = append_inline(state, paragraph, &parser.parse(rest))?;
        return (transformer.replace)(
            state,
            ReplaceContext {
                parent: paragraph,
                children,
                captures: &captures,
                is_import: true,
            },
        );
    }

    let trimmed = line.trim();
    append_inline(state, paragraph, &parser.parse(trimmed))?;
    if trimmed.is_empty() {
        return Ok(());
    }
    let Some(target) = continuation_target(state, paragraph) else {
        return Ok(());
    };
    let line_break = state.create(NodeKind::LineBreak);
    state.append(target, line_break)?;
    state.move_children(paragraph, target)?;
    state.remove(paragraph)
}

/// The block a plain line continues, if the block before it has text to continue.
fn continuation_target(state: &EditorState, paragraph: NodeKey) -> Option<NodeKey> {
    let previous = state.previous_sibling(paragraph)?;
    let target = match state.kind(previous)? {
        NodeKind::Paragraph | NodeKind::Quote => previous,
        NodeKind::List { .. } => {
            let last = state.last_descendant_or_self(previous);
            state.find_matching_parent(last, NodeKind::is_list_item)?
        }
        _ => return None,
    };
    (!state.text_content(target).is_empty()).then_some(target)
}

fn is_empty_paragraph(state: &EditorState, key: NodeKey) -> bool {
    if state.kind(key) != Some(&NodeKind::Paragraph) {
        return false;
    }
    match state.children(key) {
        [] => true,
        [only] => state
            .text(*only)
            .is_some_and(|text| text.len() <= 3 && text.text.chars().all(char::is_whitespace)),
        _ => false,
    }
}

fn remove_empty_paragraphs(state: &mut EditorState) -> Result<(), EditorError> {
    for block in state.children(NodeKey::ROOT).to_vec() {
        if state.children(NodeKey::ROOT).len() > 1 && is_empty_paragraph(state, block) {
            state.remove(block)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{HeadingTag, ListType, TextFormat};
    use crate::markdown::MARKDOWN_TRANSFORMERS;
    use pretty_assertions::assert_eq;

    fn import(markdown: &str) -> EditorState {
        convert_from_markdown_string(markdown, &MARKDOWN_TRANSFORMERS).unwrap()
    }

    fn block_types(state: &EditorState) -> Vec<&'static str> {
        state
            .children(NodeKey::ROOT)
            .iter()
            .map(|&k| state.kind(k).unwrap().type_name())
            .collect()
    }

    #[test]
    fn headings_and_paragraphs() {
        let state = import("## Setup\n\nRun the **installer**.");
        assert_eq!(block_types(&state), vec!["heading", "paragraph"]);
        let heading = state.children(NodeKey::ROOT)[0];
        assert_eq!(
            state.kind(heading),
            Some(&NodeKind::Heading { tag: HeadingTag::H2 })
        );
        let paragraph = state.children(NodeKey::ROOT)[1];
        let bold = state.children(paragraph)[1];
        assert_eq!(state.text(bold).unwrap().text, "installer");
        assert_eq!(state.text(bold).unwrap().format, TextFormat::BOLD);
    }

    #[test]
    fn fenced_code_keeps_lines_verbatim() {
        let state = import("```rust\nlet a = *b;\n\nfn main() {}\n```");
        assert_eq!(block_types(&state), vec!["code"]);
        let code = state.children(NodeKey::ROOT)[0];
        assert_eq!(
            state.kind(code),
            Some(&NodeKind::Code {
                language: Some("rust".into())
            })
        );
        assert_eq!(state.text_content(code), "let a = *b;\n\nfn main() {}");
    }

    #[test]
    fn unclosed_fence_is_a_plain_line() {
        let state = import("```js\nvar x;");
        assert_eq!(block_types(&state), vec!["paragraph"]);
        assert_eq!(state.text_content(NodeKey::ROOT), "```js\nvar x;");
    }

    #[test]
    fn plain_lines_continue_the_previous_block() {
        let state = import("first line\nsecond line\n\n- item\n  wrapped");
        assert_eq!(block_types(&state), vec!["paragraph", "list"]);
        let paragraph = state.children(NodeKey::ROOT)[0];
        assert_eq!(state.text_content(paragraph), "first line\nsecond line");
        let list = state.children(NodeKey::ROOT)[1];
        let item = state.children(list)[0];
        assert_eq!(state.text_content(item), "item\nwrapped");
    }

    #[test]
    fn consecutive_quote_lines_merge() {
        let state = import("> one\n> two");
        assert_eq!(block_types(&state), vec!["quote"]);
        assert_eq!(state.text_content(NodeKey::ROOT), "one\ntwo");
    }

    #[test]
    fn indented_items_nest_under_the_previous_item() {
        let state = import("- one\n    - inner\n- two");
        assert_eq!(block_types(&state), vec!["list"]);
        let list = state.children(NodeKey::ROOT)[0];
        assert_eq!(state.children(list).len(), 3);
        let inner = state
            .preorder()
            .into_iter()
            .find(|&k| state.text(k).is_some_and(|t| t.text == "inner"))
            .and_then(|k| state.parent(k))
            .unwrap();
        assert_eq!(state.list_depth(inner), 1);
        assert_eq!(
            state.kind(list),
            Some(&NodeKind::List {
                list_type: ListType::Bullet,
                start: 1
            })
        );
    }

    #[test]
    fn nested_list_of_another_type_stays_inside_the_parent() {
        let state = import("1. a\n    - b\n2. c");
        assert_eq!(block_types(&state), vec!["list"]);
        let list = state.children(NodeKey::ROOT)[0];
        assert_eq!(
            state.kind(list),
            Some(&NodeKind::List {
                list_type: ListType::Number,
                start: 1
            })
        );
        let children = state.children(list).to_vec();
        assert_eq!(children.len(), 3);
        assert!(state.is_nested_list_holder(children[1]));
        let nested = state.first_child(children[1]).unwrap();
        assert_eq!(
            state.kind(nested),
            Some(&NodeKind::List {
                list_type: ListType::Bullet,
                start: 1
            })
        );
        assert_eq!(state.text_content(nested), "b");
    }

    #[test]
    fn oversized_list_number_is_plain_text() {
        let state = import("99999999999999999999. x");
        assert_eq!(block_types(&state), vec!["paragraph"]);
        assert_eq!(state.text_content(NodeKey::ROOT), "99999999999999999999. x");
    }

    #[test]
    fn unterminated_fence_leaves_the_rest_as_paragraphs() {
        let state = import("```go\nfmt\n\n# Title");
        assert_eq!(block_types(&state), vec!["paragraph", "heading"]);
        let paragraph = state.children(NodeKey::ROOT)[0];
        assert_eq!(state.text_content(paragraph), "```go\nfmt");
    }

    #[test]
    fn blank_input_still_has_a_paragraph() {
        let state = import("\n\n");
        assert_eq!(block_types(&state), vec!["paragraph"]);
    }

    #[test]
    fn caret_ends_at_the_document_end() {
        let state = import("one\n\ntwo");
        let last = state.last_text_descendant(NodeKey::ROOT).unwrap();
        let range = state.range_selection().unwrap();
        assert_eq!(range.anchor.key, last);
        assert_eq!(range.anchor.offset, 3);
    }
}
