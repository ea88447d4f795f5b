//! Delimiter constants, owned by the syntax they belong to. Parser and exporter
//! code refers to these rather than spelling the bytes out.

/// Inline code; a raw zone where no other inline syntax applies.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: u8 = b'`';
}

/// `[text](url)`
pub struct LinkSyntax;

impl LinkSyntax {
    pub const OPEN: u8 = b'[';
    pub const CLOSE: u8 = b']';
    pub const URL_OPEN: u8 = b'(';
    pub const URL_CLOSE: u8 = b')';
}

pub struct Escape;

impl Escape {
    pub const BACKSLASH: u8 = b'\\';
    /// Characters escaped when exporting plain text.
    pub const ESCAPED: &'static [char] = &['*', '_', '`', '~', '\\'];
}

/// Fenced code blocks.
pub struct CodeFence;

impl CodeFence {
    pub const TICKS: &'static str = "```";
}

/// Spaces per nesting level in exported and imported lists.
pub const LIST_INDENT_SIZE: usize = 4;
