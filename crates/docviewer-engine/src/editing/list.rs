use super::error::EditorError;
use super::node::{NodeKey, NodeKind};
use super::state::EditorState;

impl EditorState {
    fn list_type_of(&self, list: NodeKey) -> Result<super::node::ListType, EditorError> {
        match self.kind(list) {
            Some(NodeKind::List { list_type, .. }) => Ok(*list_type),
            _ => Err(EditorError::Other(format!("{list} is not a list"))),
        }
    }

    /// Nests a list item one level deeper, joining neighbouring nested lists.
    pub fn indent_list_item(&mut self, item: NodeKey) -> Result<(), EditorError> {
        let list = self.parent(item).ok_or(EditorError::Detached(item))?;
        let list_type = self.list_type_of(list)?;
        let previous = self
            .previous_sibling(item)
            .filter(|&key| self.is_nested_list_holder(key));
        let next = self
            .next_sibling(item)
            .filter(|&key| self.is_nested_list_holder(key));

        match (previous, next) {
            (Some(previous), Some(next)) => {
                let inner = self.first_child(previous).ok_or(EditorError::Detached(previous))?;
                self.append(inner, item)?;
                if let Some(next_inner) = self.first_child(next) {
                    self.move_children(next_inner, inner)?;
                }
                self.remove(next)?;
            }
            (None, Some(next)) => {
                let inner = self.first_child(next).ok_or(EditorError::Detached(next))?;
                self.insert_child(inner, 0, item)?;
            }
            (Some(previous), None) => {
                let inner = self.first_child(previous).ok_or(EditorError::Detached(previous))?;
                self.append(inner, item)?;
            }
            (None, None) => {
                let holder = self.create(NodeKind::ListItem { checked: None });
                let inner = self.create(NodeKind::List {
                    list_type,
                    start: 1,
                });
                self.append(holder, inner)?;
                self.insert_before(item, holder)?;
                self.append(inner, item)?;
            }
        }
        Ok(())
    }

    /// Lifts a nested list item one level. Top-level items are left alone.
    pub fn outdent_list_item(&mut self, item: NodeKey) -> Result<(), EditorError> {
        let list = self.parent(item).ok_or(EditorError::Detached(item))?;
        let Some(holder) = self.parent(list).filter(|&key| self.is_nested_list_holder(key)) else {
            return Ok(());
        };
        let list_type = self.list_type_of(list)?;
        let after = self.next_siblings(item);

        self.insert_after(holder, item)?;
        if !after.is_empty() {
            let next_holder = self.create(NodeKind::ListItem { checked: None });
            let next_list = self.create(NodeKind::List {
                list_type,
                start: 1,
            });
            self.append(next_holder, next_list)?;
            self.insert_after(item, next_holder)?;
            for key in after {
                self.append(next_list, key)?;
            }
        }
        if self.children(list).is_empty() {
            self.remove(holder)?;
        }
        Ok(())
    }

    /// How many lists enclose `item`, minus one.
    pub fn list_depth(&self, item: NodeKey) -> usize {
        let mut depth = 0;
        let mut current = self.parent(item);
        while let Some(list) = current {
            match self.parent(list) {
                Some(holder) if self.is_nested_list_holder(holder) => {
                    depth += 1;
                    current = self.parent(holder);
                }
                _ => break,
            }
        }
        depth
    }
}
