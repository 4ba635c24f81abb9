//! Icon resolution for list entries and tray menu items.
//!
//! [`IconResolver`] runs a first-match-wins chain over an entry's path and
//! explicit icon override. Resolution is cosmetic: every failure degrades
//! to [`BuiltinIcon::Unknown`] and a log line, never an error.

mod resolver;
mod types;

pub use resolver::{decode_icon_file, looks_like_url, IconResolver};
pub use types::{BuiltinIcon, Icon, IconImage, IconOrigin};
