//! Editor behaviour packaged as plugins. Each `register` hooks command handlers or
//! update listeners into an [`Editor`](crate::editing::Editor) and returns the
//! listener id so the host can unregister it.

pub mod accessibility;
pub mod horizontal_rule;
pub mod link;
pub mod list;
pub mod markdown_shortcut;
pub mod on_change;
pub mod rich_text;
pub mod tab_indentation;

pub use accessibility::{AccessibilityFocus, AccessibilityPlugin};
