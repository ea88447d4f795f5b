/*!
# Markdown

Converts between markdown text and the editor's document, driven by an ordered
table of transformers.

## Transformers

- **Element**: a whole-line pattern that turns a paragraph into a block (headings,
  quotes, code, lists, horizontal rules) and exports that block back
- **TextFormat**: a symmetric tag such as `**` that maps to inline format flags
- **TextMatch**: inline elements with their own syntax; links

The same table drives import, export and the as-you-type shortcuts, so whatever
the editor can produce it can also read back.

## Modules

- **`transformers`**: the table and the block transformers
- **`hr`**: horizontal rules
- **`inline`**: the inline parser (escapes, code spans, links, emphasis)
- **`import`** / **`export`**: whole-document conversion
- **`shortcuts`**: block triggers typed at the start of a paragraph
*/

mod cursor;
pub mod export;
pub mod hr;
pub mod import;
pub mod inline;
pub mod kinds;
pub mod shortcuts;
pub mod transformers;

pub use export::convert_to_markdown_string;
pub use import::convert_from_markdown_string;
pub use inline::{InlineNode, InlineParser};
pub use shortcuts::run_element_shortcuts;
pub use transformers::{
    ElementTransformer, MARKDOWN_TRANSFORMERS, TextFormatTransformer, TextMatchTransformer,
    Transformer,
};
