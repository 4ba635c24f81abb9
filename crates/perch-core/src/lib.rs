//! Perch Core - Headless library for the Perch shortcut launcher.
//!
//! This crate owns the launcher's data and logic without any UI: the list
//! and tray-menu trees, their JSON files, icon resolution and launching.
//! Front ends (the `perch` CLI, a desktop shell) drive it through
//! [`Launchpad`].
//!
//! # Example
//!
//! ```rust,no_run
//! use perch_core::{Entry, InsertPosition, Launchpad};
//!
//! fn main() -> perch_core::Result<()> {
//!     let mut pad = Launchpad::open("/path/to/perch")?;
//!
//!     pad.edit_list(|list| {
//!         list.insert_relative_to_selected(
//!             None,
//!             Entry::normal("Notepad", "notepad.exe"),
//!             InsertPosition::After,
//!         )
//!     });
//!     pad.save_if_dirty()?;
//!
//!     let resolver = pad.icon_resolver();
//!     for (id, icon) in pad.resolve_list_icons(&resolver) {
//!         println!("{} -> {}", id, icon);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod icon;
pub mod launch;
pub mod model;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod tree;
pub mod workspace;

// Re-export commonly used types
pub use error::{PerchError, Result};
pub use icon::{BuiltinIcon, Icon, IconImage, IconOrigin, IconResolver};
pub use launch::{LaunchExecutor, LaunchFailure, LaunchHost, LaunchRequest};
pub use model::{Entry, EntryType, MenuEntry, MenuItemType, PopupGeometry};
pub use persistence::{ForestStore, ListTree, MenuTree, PopupGeometryStore, TreeKind};
pub use settings::Settings;
pub use tree::{
    DirtyTracker, Forest, ForestChange, InsertPlacement, InsertPosition, TreeNode,
};
pub use workspace::{Diagnostics, Launchpad};
