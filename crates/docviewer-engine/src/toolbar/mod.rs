/*!
# Toolbar

Everything behind the editor's formatting toolbar, independent of how it is drawn.

- **`sync`**: derives a [`ToolbarState`] from the selection after every committed
  update
- **`layout`**: the button groups for a state and the [`ToolbarAction`] each
  button runs
- **`dispatch`** / **`clear_format`**: inline and block formatting, rules and
  clearing
- **`heading_selector`** / **`code_language`**: the two dropdowns
- **`link_editor`**: the link form
*/

pub mod block_type;
pub mod clear_format;
pub mod code_language;
pub mod dispatch;
pub mod heading_selector;
pub mod layout;
pub mod link_editor;
pub mod sync;

pub use block_type::BlockType;
pub use code_language::{CODE_LANGUAGES, CodeLanguageSelector};
pub use heading_selector::HeadingSelector;
pub use layout::{
    ButtonGroup, GroupPosition, ToolbarAction, ToolbarButton, ToolbarEffect, ToolbarItem,
    toolbar_layout,
};
pub use link_editor::LinkEditor;
pub use sync::{ToolbarState, ToolbarSync, synchronize};
