//! Cross-tree helpers: pop-up enumeration and `PopupID` resolution.

use super::forest::Forest;
use crate::model::{Entry, MenuEntry, MenuItemType};
use tracing::warn;

/// Every pop-up entry at any depth, sorted by title.
pub fn popups(list: &Forest<Entry>) -> Vec<&Entry> {
    list.find_by_predicate(Entry::is_popup)
}

/// The pop-up a menu item's `PopupID` points at, if it still exists.
pub fn resolve_popup<'a>(list: &'a Forest<Entry>, popup_id: &str) -> Option<&'a Entry> {
    if popup_id.is_empty() {
        return None;
    }
    list.find_by_id(popup_id).filter(|entry| entry.is_popup())
}

/// Pop-up references in the menu whose target is gone or is not a pop-up.
///
/// Each one is logged; nothing is repaired.
pub fn dangling_popup_references<'a>(
    menu: &'a Forest<MenuEntry>,
    list: &Forest<Entry>,
) -> Vec<&'a MenuEntry> {
    let dangling = menu.find_by_predicate(|item| {
        item.item_type == MenuItemType::PopupReference
            && resolve_popup(list, &item.popup_id).is_none()
    });
    for item in &dangling {
        warn!(
            "Menu item \"{}\" references missing pop-up {:?}",
            item.title, item.popup_id
        );
    }
    dangling
}
