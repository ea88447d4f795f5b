//! Turns editor state and toolbar layout into ratatui text.

use docviewer_engine::editing::{ListType, TextFormat, TextRange};
use docviewer_engine::toolbar::{ButtonGroup, GroupPosition, ToolbarItem};
use docviewer_engine::{EditorState, NodeKey, NodeKind};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const CARET: &str = "▏";

struct DocumentWriter<'a> {
    state: &'a EditorState,
    selected: Vec<TextRange>,
    caret: Option<(NodeKey, usize)>,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
}

/// Renders the document block by block, marking the caret and selection.
pub fn document_lines(state: &EditorState) -> Vec<Line<'static>> {
    let caret = state
        .range_selection()
        .filter(|range| range.is_collapsed())
        .map(|range| state.resolve_point(range.anchor))
        .map(|point| (point.key, point.offset));
    let selected = state
        .range_selection()
        .filter(|range| !range.is_collapsed())
        .map(|_| state.selected_text_ranges())
        .unwrap_or_default();

    let mut writer = DocumentWriter {
        state,
        selected,
        caret,
        lines: Vec::new(),
        current: Vec::new(),
    };
    for &block in state.children(NodeKey::ROOT) {
        writer.block(block, "");
        writer.lines.push(Line::default());
    }
    writer.lines.pop();
    writer.lines
}

impl DocumentWriter<'_> {
    fn block(&mut self, key: NodeKey, indent: &str) {
        let Some(kind) = self.state.kind(key) else {
            return;
        };
        match kind {
            NodeKind::Heading { tag } => {
                let marker = format!("{} ", "#".repeat(usize::from(tag.level())));
                self.inline_block(key, &marker, Style::default().add_modifier(Modifier::BOLD));
            }
            NodeKind::Quote => {
                self.inline_block(key, "> ", Style::default().fg(Color::Gray));
            }
            NodeKind::Code { language } => {
                let fence = Style::default().fg(Color::DarkGray);
                let open = format!("```{}", language.as_deref().unwrap_or_default());
                self.lines.push(Line::styled(open, fence));
                self.inline_block(key, "", Style::default().fg(Color::Green));
                self.lines.push(Line::styled("```", fence));
            }
            NodeKind::List { list_type, start } => {
                let (list_type, start) = (*list_type, *start);
                self.list(key, list_type, start, indent);
            }
            NodeKind::HorizontalRule => {
                self.lines.push(Line::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            _ => self.inline_block(key, indent, Style::default()),
        }
    }

    fn list(&mut self, list: NodeKey, list_type: ListType, start: u32, indent: &str) {
        let mut number = start;
        for &item in self.state.children(list) {
            if self.state.is_nested_list_holder(item) {
                let nested = format!("{indent}    ");
                for &child in self.state.children(item) {
                    self.block(child, &nested);
                }
                continue;
            }
            let marker = match (list_type, self.state.kind(item)) {
                (ListType::Number, _) => format!("{indent}{number}. "),
                (ListType::Check, Some(NodeKind::ListItem { checked: Some(true) })) => {
                    format!("{indent}- [x] ")
                }
                (ListType::Check, _) => format!("{indent}- [ ] "),
                (ListType::Bullet, _) => format!("{indent}• "),
            };
            number += 1;
            self.inline_block(item, &marker, Style::default());
        }
    }

    fn inline_block(&mut self, key: NodeKey, marker: &str, base: Style) {
        self.current.push(Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)));
        if self.caret == Some((key, 0)) && self.state.children(key).is_empty() {
            self.current.push(Span::raw(CARET));
        }
        self.inline_children(key, base);
        self.flush();
    }

    fn inline_children(&mut self, key: NodeKey, base: Style) {
        for &child in self.state.children(key) {
            match self.state.kind(child) {
                Some(NodeKind::Text(text)) => {
                    let style = text_style(base, text.format);
                    self.text(child, &text.text, style);
                }
                Some(NodeKind::LineBreak) => self.flush(),
                Some(NodeKind::Link { .. }) => {
                    let style = base.fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
                    self.inline_children(child, style);
                }
                _ => {}
            }
        }
    }

    fn text(&mut self, key: NodeKey, text: &str, style: Style) {
        let chars: Vec<char> = text.chars().collect();
        let slice = |from: usize, to: usize| chars[from..to].iter().collect::<String>();

        if let Some(range) = self.selected.iter().find(|r| r.key == key && !r.is_empty()) {
            let (start, end) = (range.start.min(chars.len()), range.end.min(chars.len()));
            self.current.push(Span::styled(slice(0, start), style));
            self.current.push(Span::styled(
                slice(start, end),
                style.add_modifier(Modifier::REVERSED),
            ));
            self.current.push(Span::styled(slice(end, chars.len()), style));
            return;
        }
        match self.caret {
            Some((caret, offset)) if caret == key => {
                let offset = offset.min(chars.len());
                self.current.push(Span::styled(slice(0, offset), style));
                self.current.push(Span::raw(CARET));
                self.current.push(Span::styled(slice(offset, chars.len()), style));
            }
            _ => self.current.push(Span::styled(text.to_string(), style)),
        }
    }

    fn flush(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
    }
}

fn text_style(base: Style, format: TextFormat) -> Style {
    let mut style = base;
    if format.contains(TextFormat::BOLD) {
        style = style.add_modifier(Modifier::BOLD);
    }
    if format.contains(TextFormat::ITALIC) {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if format.contains(TextFormat::STRIKETHROUGH) {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if format.contains(TextFormat::CODE) {
        style = style.fg(Color::Yellow);
    }
    style
}

/// The toolbar as one line of bracketed groups. `focused` indexes the flattened
/// items and is highlighted.
pub fn toolbar_line(groups: &[ButtonGroup], language: &str, focused: Option<usize>) -> Line<'static> {
    let mut spans = Vec::new();
    let mut index = 0;
    for group in groups {
        for (position, item) in group.positioned() {
            let open = matches!(position, GroupPosition::Single | GroupPosition::First);
            let close = matches!(position, GroupPosition::Single | GroupPosition::Last);
            if open {
                spans.push(Span::raw("["));
            }
            let mut style = Style::default();
            if item.is_active() {
                style = style.fg(Color::Black).bg(Color::Cyan);
            }
            if focused == Some(index) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(item_label(item, language), style));
            spans.push(Span::raw(if close { "] " } else { "|" }));
            index += 1;
        }
    }
    Line::from(spans)
}

pub fn item_label(item: &ToolbarItem, language: &str) -> String {
    match item {
        ToolbarItem::Button(button) => format!(" {} ", button.icon),
        ToolbarItem::HeadingSelector { level, .. } => format!(" H{level} ▾ "),
        ToolbarItem::CodeLanguageSelector => {
            let name = docviewer_engine::toolbar::code_language::language_name(language)
                .unwrap_or(language);
            format!(" {name} ▾ ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docviewer_engine::toolbar::{ToolbarState, toolbar_layout};
    use docviewer_engine::{MARKDOWN_TRANSFORMERS, convert_from_markdown_string};
    use pretty_assertions::assert_eq;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn blocks_render_with_their_markers() {
        let state = convert_from_markdown_string(
            "## Setup\n\n- one\n- two\n\n```go\nfmt.Println()\n```\n\n***\n\nDone",
            &MARKDOWN_TRANSFORMERS,
        )
        .unwrap();

        assert_eq!(
            plain(&document_lines(&state)),
            vec![
                "## Setup".to_string(),
                String::new(),
                "• one".to_string(),
                "• two".to_string(),
                String::new(),
                "```go".to_string(),
                "fmt.Println()".to_string(),
                "```".to_string(),
                String::new(),
                "─".repeat(40),
                String::new(),
                format!("Done{CARET}"),
            ]
        );
    }

    #[test]
    fn toolbar_marks_the_active_block_and_focus() {
        let groups = toolbar_layout(&ToolbarState::default());
        let line = toolbar_line(&groups, "text", Some(0));
        let first = line.spans.iter().find(|span| span.content == " paragraph ").unwrap();
        assert_eq!(first.style.bg, Some(Color::Cyan));
        assert!(first.style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn language_selector_shows_the_display_name() {
        assert_eq!(item_label(&ToolbarItem::CodeLanguageSelector, "go"), " GoLang ▾ ");
    }
}
