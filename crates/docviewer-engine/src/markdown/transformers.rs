use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::editing::{
    EditorError, EditorState, HeadingTag, ListType, NodeKey, NodeKind, TextFormatType,
};

use super::hr;
use super::kinds::{CodeFence, LIST_INDENT_SIZE};

/// Renders the inline children of a node to markdown.
pub type ExportChildren<'a> = dyn Fn(NodeKey) -> String + 'a;

/// Exports a node this transformer owns, or `None` to let the next one try.
pub type ElementExport = fn(&EditorState, NodeKey, &ExportChildren<'_>) -> Option<String>;

/// Turns a matched paragraph into the transformer's block.
pub type ElementReplace = fn(&mut EditorState, ReplaceContext<'_>) -> Result<(), EditorError>;

/// Everything a block transformer needs when its pattern matched.
pub struct ReplaceContext<'a> {
    /// The paragraph whose leading text matched.
    pub parent: NodeKey,
    /// Content left after the matched prefix.
    pub children: Vec<NodeKey>,
    pub captures: &'a Captures<'a>,
    /// `true` while importing a document, `false` for an as-you-type shortcut.
    pub is_import: bool,
}

pub struct ElementTransformer {
    pub name: &'static str,
    pub reg_exp: Regex,
    pub export: ElementExport,
    pub replace: ElementReplace,
}

/// Inline formats written as a symmetric tag around text, e.g. `**bold**`.
pub struct TextFormatTransformer {
    pub format: &'static [TextFormatType],
    pub tag: &'static str,
    /// Whether the tag may open or close in the middle of a word.
    pub intraword: bool,
}

/// Inline elements with their own syntax, e.g. links.
pub struct TextMatchTransformer {
    pub name: &'static str,
    pub export: ElementExport,
}

pub enum Transformer {
    Element(ElementTransformer),
    TextFormat(TextFormatTransformer),
    TextMatch(TextMatchTransformer),
}

impl Transformer {
    pub fn as_element(&self) -> Option<&ElementTransformer> {
        match self {
            Transformer::Element(transformer) => Some(transformer),
            _ => None,
        }
    }

    pub fn as_text_format(&self) -> Option<&TextFormatTransformer> {
        match self {
            Transformer::TextFormat(transformer) => Some(transformer),
            _ => None,
        }
    }

    pub fn as_text_match(&self) -> Option<&TextMatchTransformer> {
        match self {
            Transformer::TextMatch(transformer) => Some(transformer),
            _ => None,
        }
    }
}

/// The editor's transformer table. The horizontal rule comes first so `***` and
/// `---` lines become rules rather than emphasis or list items.
pub static MARKDOWN_TRANSFORMERS: LazyLock<Vec<Transformer>> = LazyLock::new(|| {
    let mut transformers = vec![Transformer::Element(hr::transformer())];
    transformers.extend(element_transformers().into_iter().map(Transformer::Element));
    transformers.extend(TEXT_FORMAT_TRANSFORMERS.map(Transformer::TextFormat));
    transformers.push(Transformer::TextMatch(LINK));
    transformers
});

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid transformer regex")
}

pub fn element_transformers() -> Vec<ElementTransformer> {
    vec![
        ElementTransformer {
            name: "heading",
            reg_exp: regex(r"^(#{1,6})\s"),
            export: export_heading,
            replace: replace_heading,
        },
        ElementTransformer {
            name: "quote",
            reg_exp: regex(r"^>\s"),
            export: export_quote,
            replace: replace_quote,
        },
        ElementTransformer {
            name: "code",
            reg_exp: regex(r"^[ \t]*```(\w{1,10})?\s"),
            export: export_code,
            replace: replace_code,
        },
        ElementTransformer {
            name: "check_list",
            reg_exp: regex(r"^(\s*)(?:-\s)?\s?(\[(\s|x)?\])\s"),
            export: export_list,
            replace: |state, ctx| replace_list(state, ctx, ListType::Check),
        },
        ElementTransformer {
            name: "unordered_list",
            reg_exp: regex(r"^(\s*)[-*+]\s"),
            export: export_list,
            replace: |state, ctx| replace_list(state, ctx, ListType::Bullet),
        },
        ElementTransformer {
            name: "ordered_list",
            reg_exp: regex(r"^(\s*)(\d{1,9})\.\s"),
            export: export_list,
            replace: |state, ctx| replace_list(state, ctx, ListType::Number),
        },
    ]
}

pub const TEXT_FORMAT_TRANSFORMERS: [TextFormatTransformer; 9] = [
    TextFormatTransformer {
        format: &[TextFormatType::Code],
        tag: "`",
        intraword: true,
    },
    TextFormatTransformer {
        format: &[TextFormatType::Bold, TextFormatType::Italic],
        tag: "***",
        intraword: true,
    },
    TextFormatTransformer {
        format: &[TextFormatType::Bold, TextFormatType::Italic],
        tag: "___",
        intraword: false,
    },
    TextFormatTransformer {
        format: &[TextFormatType::Bold],
        tag: "**",
        intraword: true,
    },
    TextFormatTransformer {
        format: &[TextFormatType::Bold],
        tag: "__",
        intraword: false,
    },
    TextFormatTransformer {
        format: &[TextFormatType::Highlight],
        tag: "==",
        intraword: true,
    },
    TextFormatTransformer {
        format: &[TextFormatType::Italic],
        tag: "*",
        intraword: true,
    },
    TextFormatTransformer {
        format: &[TextFormatType::Italic],
        tag: "_",
        intraword: false,
    },
    TextFormatTransformer {
        format: &[TextFormatType::Strikethrough],
        tag: "~~",
        intraword: true,
    },
];

pub const LINK: TextMatchTransformer = TextMatchTransformer {
    name: "link",
    export: export_link,
};

fn export_link(
    state: &EditorState,
    node: NodeKey,
    export_children: &ExportChildren<'_>,
) -> Option<String> {
    match state.kind(node) {
        Some(NodeKind::Link { url }) => Some(format!("[{}]({url})", export_children(node))),
        _ => None,
    }
}

/// Builds a block of `kind` in place of the matched paragraph and puts the caret
/// at its start.
pub(crate) fn create_block(
    state: &mut EditorState,
    ctx: ReplaceContext<'_>,
    kind: NodeKind,
) -> Result<NodeKey, EditorError> {
    let block = state.create(kind);
    for child in ctx.children {
        state.append(block, child)?;
    }
    state.replace(ctx.parent, block, false)?;
    state.select_start(block);
    Ok(block)
}

fn export_heading(
    state: &EditorState,
    node: NodeKey,
    export_children: &ExportChildren<'_>,
) -> Option<String> {
    match state.kind(node) {
        Some(NodeKind::Heading { tag }) => Some(format!(
            "{} {}",
            "#".repeat(usize::from(tag.level())),
            export_children(node)
        )),
        _ => None,
    }
}

fn replace_heading(state: &mut EditorState, ctx: ReplaceContext<'_>) -> Result<(), EditorError> {
    let level = ctx.captures.get(1).map_or(1, |m| m.as_str().len());
    let tag = HeadingTag::from_level(level).unwrap_or(HeadingTag::H1);
    create_block(state, ctx, NodeKind::Heading { tag }).map(drop)
}

fn export_quote(
    state: &EditorState,
    node: NodeKey,
    export_children: &ExportChildren<'_>,
) -> Option<String> {
    if state.kind(node) != Some(&NodeKind::Quote) {
        return None;
    }
    let lines: Vec<String> = export_children(node)
        .split('\n')
        .map(|line| format!("> {line}"))
        .collect();
    Some(lines.join("\n"))
}

fn replace_quote(state: &mut EditorState, ctx: ReplaceContext<'_>) -> Result<(), EditorError> {
    if ctx.is_import
        && let Some(previous) = state.previous_sibling(ctx.parent)
        && state.kind(previous) == Some(&NodeKind::Quote)
    {
        let line_break = state.create(NodeKind::LineBreak);
        state.append(previous, line_break)?;
        for child in ctx.children {
            state.append(previous, child)?;
        }
        state.remove(ctx.parent)?;
        state.select_start(previous);
        return Ok(());
    }
    create_block(state, ctx, NodeKind::Quote).map(drop)
}

fn export_code(
    state: &EditorState,
    node: NodeKey,
    _export_children: &ExportChildren<'_>,
) -> Option<String> {
    let Some(NodeKind::Code { language }) = state.kind(node) else {
        return None;
    };
    let text = state.text_content(node);
    let body = if text.is_empty() {
        String::new()
    } else {
        format!("\n{text}")
    };
    Some(format!(
        "{fence}{}{body}\n{fence}",
        language.as_deref().unwrap_or_default(),
        fence = CodeFence::TICKS
    ))
}

fn replace_code(state: &mut EditorState, ctx: ReplaceContext<'_>) -> Result<(), EditorError> {
    let language = ctx.captures.get(1).map(|m| m.as_str().to_string());
    create_block(state, ctx, NodeKind::Code { language }).map(drop)
}

/// Nesting depth from leading whitespace: one level per tab or per four spaces.
pub(crate) fn get_indent(whitespace: &str) -> usize {
    let tabs = whitespace.chars().filter(|&c| c == '\t').count();
    let spaces = whitespace.chars().filter(|&c| c == ' ').count();
    tabs + spaces / LIST_INDENT_SIZE
}

fn is_list_of(state: &EditorState, key: NodeKey, list_type: ListType) -> bool {
    matches!(state.kind(key), Some(NodeKind::List { list_type: t, .. }) if *t == list_type)
}

fn replace_list(
    state: &mut EditorState,
    ctx: ReplaceContext<'_>,
    list_type: ListType,
) -> Result<(), EditorError> {
    let checked = (list_type == ListType::Check)
        .then(|| ctx.captures.get(3).is_some_and(|m| m.as_str() == "x"));
    let item = state.create(NodeKind::ListItem { checked });
    for child in ctx.children {
        state.append(item, child)?;
    }
    let start = match list_type {
        ListType::Number => ctx
            .captures
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(1),
        _ => 1,
    };
    let indent = get_indent(ctx.captures.get(1).map_or("", |m| m.as_str()));

    let parent = ctx.parent;
    let previous_list = state
        .previous_sibling(parent)
        .filter(|&key| state.kind(key).is_some_and(NodeKind::is_list));
    if indent > 0
        && let Some(previous) = previous_list
    {
        // Nested items belong to the list above whatever its type.
        nest_list_item(state, previous, item, list_type, start, indent)?;
        state.remove(parent)?;
    } else if let Some(next) = state.next_sibling(parent)
        && is_list_of(state, next, list_type)
    {
        state.insert_child(next, 0, item)?;
        state.remove(parent)?;
    } else if let Some(previous) = previous_list.filter(|&key| is_list_of(state, key, list_type)) {
        state.append(previous, item)?;
        state.remove(parent)?;
    } else {
        let list = state.create(NodeKind::List { list_type, start });
        state.replace(parent, list, false)?;
        if indent == 0 {
            state.append(list, item)?;
        } else {
            nest_list_item(state, list, item, list_type, start, indent)?;
        }
    }
    state.select_start(item);
    Ok(())
}

/// Appends `item` `depth` levels below `list`, following the trailing nested list at
/// each level and creating the levels that are missing. The innermost list must
/// have the item's own type.
fn nest_list_item(
    state: &mut EditorState,
    list: NodeKey,
    item: NodeKey,
    list_type: ListType,
    start: u32,
    depth: usize,
) -> Result<(), EditorError> {
    let mut container = list;
    for level in 1..=depth {
        let innermost = level == depth;
        let trailing = state
            .last_child(container)
            .filter(|&key| state.is_nested_list_holder(key))
            .and_then(|holder| state.first_child(holder))
            .filter(|&inner| !innermost || is_list_of(state, inner, list_type));
        container = match trailing {
            Some(inner) => inner,
            None => {
                let nested = if innermost {
                    NodeKind::List { list_type, start }
                } else {
                    let Some(&NodeKind::List { list_type, .. }) = state.kind(container) else {
                        return Err(EditorError::Other(format!("{container} is not a list")));
                    };
                    NodeKind::List {
                        list_type,
                        start: 1,
                    }
                };
                let holder = state.create(NodeKind::ListItem { checked: None });
                let inner = state.create(nested);
                state.append(holder, inner)?;
                state.append(container, holder)?;
                inner
            }
        };
    }
    state.append(container, item)
}

fn export_list(
    state: &EditorState,
    node: NodeKey,
    export_children: &ExportChildren<'_>,
) -> Option<String> {
    if !state.kind(node).is_some_and(NodeKind::is_list) {
        return None;
    }
    Some(list_export(state, node, export_children, 0))
}

fn list_export(
    state: &EditorState,
    list: NodeKey,
    export_children: &ExportChildren<'_>,
    depth: usize,
) -> String {
    let Some(&NodeKind::List { list_type, start }) = state.kind(list) else {
        return String::new();
    };
    let indent = " ".repeat(depth * LIST_INDENT_SIZE);
    let mut lines = Vec::new();
    let mut number = start;
    for &item in state.children(list) {
        if state.is_nested_list_holder(item) {
            if let Some(nested) = state.first_child(item) {
                lines.push(list_export(state, nested, export_children, depth + 1));
            }
            continue;
        }
        let marker = match (list_type, state.kind(item)) {
            (ListType::Number, _) => format!("{number}. "),
            (ListType::Check, Some(NodeKind::ListItem { checked: Some(true) })) => {
                "- [x] ".to_string()
            }
            (ListType::Check, _) => "- [ ] ".to_string(),
            (ListType::Bullet, _) => "- ".to_string(),
        };
        lines.push(format!("{indent}{marker}{}", export_children(item)));
        number += 1;
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn rule_is_first_in_the_table() {
        let first = MARKDOWN_TRANSFORMERS[0].as_element().map(|t| t.name);
        assert_eq!(first, Some("horizontal_rule"));
    }

    #[rstest]
    #[case("", 0)]
    #[case("  ", 0)]
    #[case("    ", 1)]
    #[case("\t", 1)]
    #[case("\t    ", 2)]
    fn indent_levels(#[case] whitespace: &str, #[case] expected: usize) {
        assert_eq!(get_indent(whitespace), expected);
    }

    #[rstest]
    #[case("unordered_list", "- item", true)]
    #[case("unordered_list", "-item", false)]
    #[case("ordered_list", "12. item", true)]
    #[case("check_list", "- [x] done", true)]
    #[case("heading", "### three", true)]
    #[case("heading", "####### seven", false)]
    #[case("quote", "> said", true)]
    fn element_patterns(#[case] name: &str, #[case] line: &str, #[case] matches: bool) {
        let transformers = element_transformers();
        let transformer = transformers.iter().find(|t| t.name == name).unwrap();
        assert_eq!(transformer.reg_exp.is_match(line), matches);
    }
}
