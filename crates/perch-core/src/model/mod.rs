//! Node types for the two launcher trees.
//!
//! - [`Entry`]: main window list and pop-ups
//! - [`MenuEntry`]: tray context menu
//! - [`PopupGeometry`]: saved pop-up window placement
//!
//! These are plain records. Validation lives in [`crate::tree`] and
//! [`crate::persistence`]; change tracking is done by the tree operations.

mod entry;
mod geometry;
mod menu_entry;

pub use entry::{Entry, EntryType};
pub use geometry::PopupGeometry;
pub use menu_entry::{MenuEntry, MenuItemType};
