use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

bitflags! {
    /// Inline formatting flags carried by text nodes and range selections.
    ///
    /// Bit values are stable: they are what a serialized editor state stores.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextFormat: u32 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const STRIKETHROUGH = 1 << 2;
        const UNDERLINE = 1 << 3;
        const CODE = 1 << 4;
        const SUBSCRIPT = 1 << 5;
        const SUPERSCRIPT = 1 << 6;
        const HIGHLIGHT = 1 << 7;
    }
}

/// A single inline format, as named by formatting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextFormatType {
    Bold,
    Italic,
    Strikethrough,
    Underline,
    Code,
    Subscript,
    Superscript,
    Highlight,
}

impl TextFormatType {
    pub const ALL: [TextFormatType; 8] = [
        TextFormatType::Bold,
        TextFormatType::Italic,
        TextFormatType::Strikethrough,
        TextFormatType::Underline,
        TextFormatType::Code,
        TextFormatType::Subscript,
        TextFormatType::Superscript,
        TextFormatType::Highlight,
    ];

    pub fn flag(self) -> TextFormat {
        match self {
            TextFormatType::Bold => TextFormat::BOLD,
            TextFormatType::Italic => TextFormat::ITALIC,
            TextFormatType::Strikethrough => TextFormat::STRIKETHROUGH,
            TextFormatType::Underline => TextFormat::UNDERLINE,
            TextFormatType::Code => TextFormat::CODE,
            TextFormatType::Subscript => TextFormat::SUBSCRIPT,
            TextFormatType::Superscript => TextFormat::SUPERSCRIPT,
            TextFormatType::Highlight => TextFormat::HIGHLIGHT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextFormatType::Bold => "bold",
            TextFormatType::Italic => "italic",
            TextFormatType::Strikethrough => "strikethrough",
            TextFormatType::Underline => "underline",
            TextFormatType::Code => "code",
            TextFormatType::Subscript => "subscript",
            TextFormatType::Superscript => "superscript",
            TextFormatType::Highlight => "highlight",
        }
    }
}

impl fmt::Display for TextFormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown text format: {0}")]
pub struct UnknownTextFormat(pub String);

impl FromStr for TextFormatType {
    type Err = UnknownTextFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextFormatType::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| UnknownTextFormat(s.to_string()))
    }
}

impl TextFormat {
    #[must_use]
    pub fn has(self, format: TextFormatType) -> bool {
        self.contains(format.flag())
    }

    /// Toggles one format. Subscript and superscript exclude each other.
    #[must_use]
    pub fn toggled(self, format: TextFormatType) -> TextFormat {
        let flag = format.flag();
        let mut next = self ^ flag;
        if next.contains(flag) {
            match format {
                TextFormatType::Subscript => next.remove(TextFormat::SUPERSCRIPT),
                TextFormatType::Superscript => next.remove(TextFormat::SUBSCRIPT),
                _ => {}
            }
        }
        next
    }

    /// Forces `format` on or off, keeping the sub/superscript exclusion.
    #[must_use]
    pub fn with(self, format: TextFormatType, on: bool) -> TextFormat {
        if self.has(format) == on {
            self
        } else {
            self.toggled(format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn flag_values_are_stable() {
        assert_eq!(TextFormat::BOLD.bits(), 1);
        assert_eq!(TextFormat::ITALIC.bits(), 2);
        assert_eq!(TextFormat::STRIKETHROUGH.bits(), 4);
        assert_eq!(TextFormat::CODE.bits(), 16);
        assert_eq!(TextFormat::HIGHLIGHT.bits(), 128);
    }

    #[rstest]
    #[case(TextFormatType::Bold)]
    #[case(TextFormatType::Italic)]
    #[case(TextFormatType::Code)]
    #[case(TextFormatType::Strikethrough)]
    fn toggling_twice_is_identity(#[case] format: TextFormatType) {
        let start = TextFormat::UNDERLINE;
        assert_eq!(start.toggled(format).toggled(format), start);
    }

    #[test]
    fn subscript_clears_superscript() {
        let format = TextFormat::SUPERSCRIPT.toggled(TextFormatType::Subscript);
        assert_eq!(format, TextFormat::SUBSCRIPT);
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("bold".parse::<TextFormatType>(), Ok(TextFormatType::Bold));
        assert!("blink".parse::<TextFormatType>().is_err());
    }
}
