use super::error::EditorError;
use super::node::{HeadingTag, ListType, NodeKey, NodeKind};
use super::state::EditorState;

/// A zero-argument factory for the block a formatting action converts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockConstructor {
    Paragraph,
    Heading(HeadingTag),
    Quote,
    Code,
    List(ListType),
}

impl BlockConstructor {
    pub fn node_kind(self) -> NodeKind {
        match self {
            BlockConstructor::Paragraph => NodeKind::Paragraph,
            BlockConstructor::Heading(tag) => NodeKind::Heading { tag },
            BlockConstructor::Quote => NodeKind::Quote,
            BlockConstructor::Code => NodeKind::Code { language: None },
            BlockConstructor::List(list_type) => NodeKind::List {
                list_type,
                start: 1,
            },
        }
    }
}

impl EditorState {
    /// Replaces a leaf block with a fresh node of `kind`, keeping its children.
    ///
    /// A list item leaves its list: nested items are lifted to the top level first,
    /// then the list is split around the replacement.
    pub fn replace_block(&mut self, block: NodeKey, kind: NodeKind) -> Result<NodeKey, EditorError> {
        let is_item = self.kind(block).is_some_and(NodeKind::is_list_item);
        if !is_item || kind.is_list_item() {
            let replacement = self.create(kind);
            return self.replace(block, replacement, true);
        }

        while let Some(list) = self.parent(block)
            && self
                .parent(list)
                .is_some_and(|holder| self.is_nested_list_holder(holder))
        {
            self.outdent_list_item(block)?;
        }

        let list = self.parent(block).ok_or(EditorError::Detached(block))?;
        let Some(&NodeKind::List { list_type, start }) = self.kind(list) else {
            let replacement = self.create(kind);
            return self.replace(block, replacement, true);
        };
        let index = self.index_in_parent(block).unwrap_or(0);
        let after = self.next_siblings(block);

        let replacement = self.create(kind);
        self.insert_after(list, replacement)?;
        if !after.is_empty() {
            let tail = self.create(NodeKind::List {
                list_type,
                start: start + index as u32 + 1,
            });
            self.insert_after(replacement, tail)?;
            for item in after {
                self.append(tail, item)?;
            }
        }
        self.move_children(block, replacement)?;
        self.retarget_points(block, replacement);
        self.remove(block)?;
        if self.children(list).is_empty() {
            self.remove(list)?;
        }
        Ok(replacement)
    }

    /// Converts every selected leaf block with `constructor`.
    ///
    /// Converting to a list wraps a block in a one-item list; neighbouring lists of
    /// the same type merge when the update commits. List items retype their list.
    pub fn set_blocks_type(&mut self, constructor: BlockConstructor) -> Result<(), EditorError> {
        if self.range_selection().is_none() {
            return Ok(());
        }
        for block in self.selected_blocks() {
            if !self.contains(block) {
                continue;
            }
            match constructor {
                BlockConstructor::List(list_type) => self.convert_to_list(block, list_type)?,
                other => {
                    self.replace_block(block, other.node_kind())?;
                }
            }
        }
        Ok(())
    }

    fn convert_to_list(&mut self, block: NodeKey, list_type: ListType) -> Result<(), EditorError> {
        if self.kind(block).is_some_and(NodeKind::is_list_item) {
            let list = self.parent(block).ok_or(EditorError::Detached(block))?;
            if let NodeKind::List { list_type: current, .. } = self.kind_mut(list)? {
                *current = list_type;
            }
            for item in self.children(list).to_vec() {
                if let NodeKind::ListItem { checked } = self.kind_mut(item)? {
                    *checked = match list_type {
                        ListType::Check => Some(checked.unwrap_or(false)),
                        _ => None,
                    };
                }
            }
            return Ok(());
        }
        let list = self.create(NodeKind::List {
            list_type,
            start: 1,
        });
        let item = self.create(NodeKind::ListItem {
            checked: (list_type == ListType::Check).then_some(false),
        });
        self.insert_before(block, list)?;
        self.append(list, item)?;
        self.move_children(block, item)?;
        self.retarget_points(block, item);
        self.remove(block)
    }
}
