//! The labeled-tree abstraction shared by both launcher trees.

use crate::model::{Entry, MenuEntry};

/// A node that carries an id, a title and optionally a child collection.
///
/// `children()` returning `None` marks a leaf; `Some(&[])` is an empty
/// container. Traversals descend into every node that has a collection,
/// whatever its declared kind.
pub trait TreeNode: Clone {
    fn item_id(&self) -> &str;
    fn title(&self) -> &str;
    fn set_title(&mut self, title: String);
    fn children(&self) -> Option<&Vec<Self>>;
    fn children_mut(&mut self) -> Option<&mut Vec<Self>>;
}

impl TreeNode for Entry {
    fn item_id(&self) -> &str {
        &self.item_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: String) {
        self.title = title;
    }

    fn children(&self) -> Option<&Vec<Self>> {
        self.children.as_ref()
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        self.children.as_mut()
    }
}

impl TreeNode for MenuEntry {
    fn item_id(&self) -> &str {
        &self.item_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: String) {
        self.title = title;
    }

    fn children(&self) -> Option<&Vec<Self>> {
        self.menu_items.as_ref()
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        self.menu_items.as_mut()
    }
}
