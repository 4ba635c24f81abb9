//! JSON persistence for the launcher forests and their companion files.
//!
//! The list and menu files share one implementation, [`ForestStore`],
//! parameterized by a [`TreeKind`]. All writes are atomic.

pub mod atomic;
mod geometry;
mod store;

pub use atomic::{atomic_read_json, atomic_write_json, backup_path_for};
pub use geometry::PopupGeometryStore;
pub use store::{prepare_for_save, ForestStore, ListTree, MenuTree, TreeKind};
