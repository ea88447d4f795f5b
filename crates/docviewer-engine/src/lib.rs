pub mod composer;
pub mod documentation_editor;
pub mod editing;
pub mod instance;
pub mod io;
pub mod markdown;
pub mod models;
pub mod plugins;
pub mod toolbar;

// Re-export key types for easier usage
pub use composer::{EditorConfig, MarkdownEditor, Theme};
pub use documentation_editor::{DocumentationEditorProps, documentation_editor};
pub use editing::{Command, Editor, EditorError, EditorState, NodeKey, NodeKind};
pub use instance::{ChangeEvent, MarkdownEditorInstance};
pub use io::*;
pub use markdown::{MARKDOWN_TRANSFORMERS, convert_from_markdown_string, convert_to_markdown_string};
pub use models::*;
