/*!
# Editing

The document model and the editor that owns it.

## Model

- **`node`**: `NodeKey` arena keys and the closed `NodeKind` set (blocks, inline
  elements, text)
- **`format`**: `TextFormat` bitflags and the `TextFormatType` names commands use
- **`formatting`**: toggling inline formats over a selection
- **`selection`**: range/node selections made of `Point`s
- **`state`**: `EditorState`, the tree plus selection, with structural operations
- **`range`**: which nodes and characters a selection covers; caret stops
- **`ops`**: typing, deleting, block splitting and caret movement
- **`blocks`** / **`list`**: block conversion and list nesting

## Editor

- **`editor`**: `Editor`, committing atomic updates and notifying listeners once
- **`commands`**: the `Command` set, priorities and the `Transaction` handlers see
*/

pub mod blocks;
pub mod commands;
pub mod editor;
pub mod error;
pub mod format;
pub mod formatting;
pub mod list;
pub mod node;
pub mod ops;
pub mod range;
pub mod selection;
pub mod state;

pub use blocks::BlockConstructor;
pub use commands::{Command, CommandPriority, ListenerId, Transaction};
pub use editor::Editor;
pub use error::EditorError;
pub use format::{TextFormat, TextFormatType};
pub use node::{HeadingTag, ListType, Node, NodeKey, NodeKind, TextNode};
pub use selection::{NodeSelection, Point, PointKind, RangeSelection, Selection, TextRange};
pub use state::EditorState;
