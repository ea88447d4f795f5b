use crate::editing::{EditorError, EditorState, NodeKey, NodeKind, TextFormat, TextFormatType, TextNode};

use super::cursor::Cursor;
use super::kinds::{CodeSpan, Escape, LinkSyntax};
use super::transformers::{TextFormatTransformer, Transformer};

/// Inline content of one markdown line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    Text { text: String, format: TextFormat },
    Link { url: String, children: Vec<InlineNode> },
}

/// Cursor-based inline parser driven by the text-format transformers in a table.
///
/// ## Precedence
///
/// 1. Backslash escapes
/// 2. Code spans, a raw zone: `` `**not bold**` `` stays literal
/// 3. Links `[text](url)`, when the table has a link transformer
/// 4. Emphasis tags, longest tag first so `***` beats `**` beats `*`
pub struct InlineParser<'t> {
    tags: Vec<&'t TextFormatTransformer>,
    code: bool,
    links: bool,
}

impl<'t> InlineParser<'t> {
    pub fn new(transformers: &'t [Transformer]) -> Self {
        let mut tags: Vec<&TextFormatTransformer> = transformers
            .iter()
            .filter_map(Transformer::as_text_format)
            .collect();
        let code = tags.iter().any(|t| t.format == [TextFormatType::Code]);
        tags.retain(|t| t.format != [TextFormatType::Code]);
        tags.sort_by_key(|t| std::cmp::Reverse(t.tag.len()));
        let links = transformers
            .iter()
            .filter_map(Transformer::as_text_match)
            .any(|t| t.name == "link");
        Self { tags, code, links }
    }

    pub fn parse(&self, s: &str) -> Vec<InlineNode> {
        self.parse_with(s, TextFormat::empty())
    }

    fn parse_with(&self, s: &str, format: TextFormat) -> Vec<InlineNode> {
        let mut cur = Cursor::new(s);
        let mut out = Vec::new();
        let mut text = String::new();
        let mut text_start = 0;

        fn flush(out: &mut Vec<InlineNode>, text: &mut String, format: TextFormat) {
            if !text.is_empty() {
                out.push(InlineNode::Text {
                    text: std::mem::take(text),
                    format,
                });
            }
        }

        while !cur.eof() {
            let start = cur.i;
            if cur.peek() == Some(Escape::BACKSLASH)
                && cur.peek_at(1).is_some_and(|b| b.is_ascii_punctuation())
            {
                text.push_str(&s[text_start..start]);
                cur.bump();
                text_start = cur.i;
                cur.bump();
                continue;
            }
            let parsed = self
                .try_parse_code_span(&mut cur, format)
                .map(|node| vec![node])
                .or_else(|| self.try_parse_link(&mut cur, format).map(|node| vec![node]))
                .or_else(|| self.try_parse_emphasis(&mut cur, format));
            if let Some(nodes) = parsed {
                text.push_str(&s[text_start..start]);
                flush(&mut out, &mut text, format);
                out.extend(nodes);
                text_start = cur.i;
                continue;
            }
            cur.bump();
        }
        text.push_str(&s[text_start..]);
        flush(&mut out, &mut text, format);
        merge_adjacent(out)
    }

    /// On failure the cursor is restored.
    fn try_parse_code_span(&self, cur: &mut Cursor<'_>, format: TextFormat) -> Option<InlineNode> {
        if !self.code || cur.peek() != Some(CodeSpan::TICK) {
            return None;
        }
        let saved = cur.clone();
        cur.bump();
        let inner_start = cur.i;
        while !cur.eof() && cur.peek() != Some(CodeSpan::TICK) {
            cur.bump();
        }
        let inner_end = cur.i;
        if cur.peek() != Some(CodeSpan::TICK) || inner_end == inner_start {
            *cur = saved;
            return None;
        }
        cur.bump();
        Some(InlineNode::Text {
            text: cur.s[inner_start..inner_end].to_string(),
            format: format | TextFormat::CODE,
        })
    }

    fn try_parse_link(&self, cur: &mut Cursor<'_>, format: TextFormat) -> Option<InlineNode> {
        if !self.links || cur.peek() != Some(LinkSyntax::OPEN) {
            return None;
        }
        let saved = cur.clone();
        cur.bump();
        let text_start = cur.i;
        while !cur.eof() && cur.peek() != Some(LinkSyntax::CLOSE) {
            if cur.peek() == Some(LinkSyntax::OPEN) {
                *cur = saved;
                return None;
            }
            cur.bump();
        }
        let text_end = cur.i;
        if !cur.starts_with(&[LinkSyntax::CLOSE, LinkSyntax::URL_OPEN]) || text_end == text_start {
            *cur = saved;
            return None;
        }
        cur.bump_n(2);
        let url_start = cur.i;
        while let Some(b) = cur.peek() {
            if b == LinkSyntax::URL_CLOSE || b.is_ascii_whitespace() || b == LinkSyntax::URL_OPEN {
                break;
            }
            cur.bump();
        }
        let url_end = cur.i;
        if cur.peek() != Some(LinkSyntax::URL_CLOSE) || url_end == url_start {
            *cur = saved;
            return None;
        }
        cur.bump();
        Some(InlineNode::Link {
            url: cur.s[url_start..url_end].to_string(),
            children: self.parse_with(&cur.s[text_start..text_end], format),
        })
    }

    fn try_parse_emphasis(&self, cur: &mut Cursor<'_>, format: TextFormat) -> Option<Vec<InlineNode>> {
        let first = cur.peek()?;
        let run = cur.run_of(first);
        for transformer in &self.tags {
            let tag = transformer.tag.as_bytes();
            if tag[0] != first || run != tag.len() {
                continue;
            }
            let opens_word = cur.peek_at(tag.len()).is_some_and(|b| !b.is_ascii_whitespace());
            let after_word = cur.prev_char().is_some_and(char::is_alphanumeric);
            if !opens_word || (!transformer.intraword && after_word) {
                continue;
            }
            let inner_start = cur.i + tag.len();
            let Some(close) = find_closing(cur.s, inner_start, transformer) else {
                continue;
            };
            let inner = &cur.s[inner_start..close];
            let added = transformer
                .format
                .iter()
                .fold(TextFormat::empty(), |acc, f| acc | f.flag());
            cur.i = close + tag.len();
            return Some(self.parse_with(inner, format | added));
        }
        None
    }
}

/// Byte index of the tag closing an emphasis opened just before `from`.
fn find_closing(s: &str, from: usize, transformer: &TextFormatTransformer) -> Option<usize> {
    let tag = transformer.tag.as_bytes();
    let mut cur = Cursor::new(s);
    cur.i = from;
    while let Some(b) = cur.peek() {
        if b == Escape::BACKSLASH {
            cur.bump_n(2);
            continue;
        }
        if b == CodeSpan::TICK {
            let saved = cur.clone();
            cur.bump();
            while !cur.eof() && cur.peek() != Some(CodeSpan::TICK) {
                cur.bump();
            }
            if cur.eof() {
                cur = saved;
                cur.bump();
            } else {
                cur.bump();
            }
            continue;
        }
        if b == tag[0] {
            // A longer run closes at its end (`**a *b***`) unless its leftover
            // delimiters open the next span (`**a***b*`).
            let run = cur.run_of(b);
            let reopens = run > tag.len()
                && s[cur.i + run..].chars().next().is_some_and(|c| !c.is_whitespace());
            let close = if reopens {
                cur.i
            } else {
                cur.i + run.saturating_sub(tag.len())
            };
            let closes = run >= tag.len()
                && close > from
                && cur.prev_char().is_some_and(|c| !c.is_whitespace());
            let before_word = s[close + tag.len()..]
                .chars()
                .next()
                .is_some_and(char::is_alphanumeric);
            if closes && (transformer.intraword || !before_word) {
                return Some(close);
            }
            cur.bump_n(run);
            continue;
        }
        cur.bump();
    }
    None
}

fn merge_adjacent(nodes: Vec<InlineNode>) -> Vec<InlineNode> {
    let mut out: Vec<InlineNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let (
            Some(InlineNode::Text { text, format }),
            InlineNode::Text {
                text: next,
                format: next_format,
            },
        ) = (out.last_mut(), &node)
            && format == next_format
        {
            text.push_str(next);
            continue;
        }
        out.push(node);
    }
    out
}

/// Creates editor nodes for `nodes` and appends them under `parent`.
pub fn append_inline(
    state: &mut EditorState,
    parent: NodeKey,
    nodes: &[InlineNode],
) -> Result<Vec<NodeKey>, EditorError> {
    let mut keys = Vec::with_capacity(nodes.len());
    for node in nodes {
        let key = match node {
            InlineNode::Text { text, format } => {
                state.create(NodeKind::Text(TextNode::new(text.clone(), *format)))
            }
            InlineNode::Link { url, children } => {
                let link = state.create(NodeKind::Link { url: url.clone() });
                append_inline(state, link, children)?;
                link
            }
        };
        state.append(parent, key)?;
        keys.push(key);
    }
    Ok(keys)
}
