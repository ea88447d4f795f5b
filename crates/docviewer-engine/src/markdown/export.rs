use crate::editing::{EditorState, NodeKey, NodeKind, TextFormat, TextFormatType};

use super::kinds::{CodeSpan, Escape};
use super::transformers::{ElementTransformer, TextMatchTransformer, Transformer};

/// Serializes the document to markdown. Top-level blocks are separated by a blank
/// line; empty paragraphs produce nothing.
pub fn convert_to_markdown_string(state: &EditorState, transformers: &[Transformer]) -> String {
    Exporter::new(state, transformers).export()
}

struct Exporter<'a> {
    state: &'a EditorState,
    elements: Vec<&'a ElementTransformer>,
    /// Single-format tags in table order, one per format.
    formats: Vec<(TextFormatType, &'a str)>,
    text_matches: Vec<&'a TextMatchTransformer>,
}

impl<'a> Exporter<'a> {
    fn new(state: &'a EditorState, transformers: &'a [Transformer]) -> Self {
        let mut formats: Vec<(TextFormatType, &str)> = Vec::new();
        for transformer in transformers.iter().filter_map(Transformer::as_text_format) {
            if let [single] = transformer.format
                && !formats.iter().any(|(f, _)| f == single)
            {
                formats.push((*single, transformer.tag));
            }
        }
        Self {
            state,
            elements: transformers.iter().filter_map(Transformer::as_element).collect(),
            formats,
            text_matches: transformers.iter().filter_map(Transformer::as_text_match).collect(),
        }
    }

    fn export(&self) -> String {
        let blocks: Vec<String> = self
            .state
            .children(NodeKey::ROOT)
            .iter()
            .filter_map(|&block| self.export_top_level(block))
            .collect();
        blocks.join("\n\n")
    }

    fn export_top_level(&self, block: NodeKey) -> Option<String> {
        let children = |key: NodeKey| self.export_children(key);
        for transformer in &self.elements {
            if let Some(out) = (transformer.export)(self.state, block, &children) {
                return Some(out);
            }
        }
        let out = self.export_children(block);
        if out.is_empty() && self.state.kind(block) == Some(&NodeKind::Paragraph) {
            return None;
        }
        Some(out)
    }

    fn export_children(&self, node: NodeKey) -> String {
        let children = |key: NodeKey| self.export_children(key);
        let mut out = String::new();
        'children: for &child in self.state.children(node) {
            match self.state.kind(child) {
                Some(NodeKind::LineBreak) => out.push('\n'),
                Some(NodeKind::Text(_)) => out.push_str(&self.export_text(child)),
                Some(kind) if kind.is_element() => {
                    for transformer in &self.text_matches {
                        if let Some(text) = (transformer.export)(self.state, child, &children) {
                            out.push_str(&text);
                            continue 'children;
                        }
                    }
                    out.push_str(&self.export_children(child));
                }
                _ => {}
            }
        }
        out
    }

    fn export_text(&self, key: NodeKey) -> String {
        let Some(node) = self.state.text(key) else {
            return String::new();
        };
        let format = node.format;
        let previous = self.sibling_format(key, false);
        let next = self.sibling_format(key, true);
        let opens = |f: TextFormatType| !previous.is_some_and(|p| p.has(f));
        let closes = |f: TextFormatType| !next.is_some_and(|n| n.has(f));

        let mut out = if format.has(TextFormatType::Code) {
            let tick = char::from(CodeSpan::TICK);
            let mut code = String::new();
            if opens(TextFormatType::Code) {
                code.push(tick);
            }
            code.push_str(&node.text);
            if closes(TextFormatType::Code) {
                code.push(tick);
            }
            code
        } else {
            escape(&node.text)
        };

        let mut opening = String::new();
        let mut closing = String::new();
        for &(f, tag) in &self.formats {
            if f == TextFormatType::Code || !format.has(f) {
                continue;
            }
            if opens(f) {
                opening.push_str(tag);
            }
            if closes(f) {
                closing.insert_str(0, tag);
            }
        }
        out.insert_str(0, &opening);
        out.push_str(&closing);
        out
    }

    fn sibling_format(&self, key: NodeKey, forward: bool) -> Option<TextFormat> {
        let sibling = if forward {
            self.state.next_sibling(key)
        } else {
            self.state.previous_sibling(key)
        }?;
        self.state.text(sibling).map(|text| text.format)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if Escape::ESCAPED.contains(&c) {
            out.push(char::from(Escape::BACKSLASH));
        }
        out.push(c);
    }
    out
}
