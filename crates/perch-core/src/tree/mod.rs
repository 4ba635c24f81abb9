//! Tree operations over both launcher forests.
//!
//! The list tree ([`crate::model::Entry`]) and the menu tree
//! ([`crate::model::MenuEntry`]) share one implementation through the
//! [`TreeNode`] trait. Mutating operations record [`ForestChange`] events
//! which a [`DirtyTracker`] consumes to decide when a save is due.

mod changes;
mod forest;
mod node;
mod popups;

pub use changes::{DirtyTracker, ForestChange};
pub use forest::{Forest, InsertPlacement, InsertPosition};
pub use node::TreeNode;
pub use popups::{dangling_popup_references, popups, resolve_popup};
