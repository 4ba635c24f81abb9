//! Tray-menu-tree node.

use super::entry::new_item_id;
use crate::config::{AppConfig, StarterConfig};
use serde::{Deserialize, Serialize};

/// Kind of tray menu item, persisted as its declaration-order ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MenuItemType {
    #[default]
    MenuItem,
    SubMenu,
    SectionHeading,
    Separator,
    PopupReference,
}

impl TryFrom<u8> for MenuItemType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MenuItemType::MenuItem),
            1 => Ok(MenuItemType::SubMenu),
            2 => Ok(MenuItemType::SectionHeading),
            3 => Ok(MenuItemType::Separator),
            4 => Ok(MenuItemType::PopupReference),
            other => Err(format!("unknown ItemType {}", other)),
        }
    }
}

impl From<MenuItemType> for u8 {
    fn from(value: MenuItemType) -> Self {
        match value {
            MenuItemType::MenuItem => 0,
            MenuItemType::SubMenu => 1,
            MenuItemType::SectionHeading => 2,
            MenuItemType::Separator => 3,
            MenuItemType::PopupReference => 4,
        }
    }
}

/// A tray menu item, sub-menu, heading, separator or pop-up reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MenuEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub item_type: MenuItemType,
    #[serde(rename = "FilePathOrURI", default)]
    pub file_path_or_uri: String,
    #[serde(default)]
    pub arguments: String,
    #[serde(default)]
    pub working_directory: String,
    #[serde(rename = "ItemID", default = "new_item_id")]
    pub item_id: String,
    /// `ItemID` of the pop-up entry opened by a `PopupReference`.
    #[serde(rename = "PopupID", default)]
    pub popup_id: String,
    #[serde(default)]
    pub menu_items: Option<Vec<MenuEntry>>,
}

impl MenuEntry {
    /// Create a node the way the menu editor's "New" action does.
    ///
    /// Separators have nothing to name, so they get a fixed title instead of
    /// the untitled sentinel.
    pub fn new_untitled(item_type: MenuItemType) -> Self {
        let title = match item_type {
            MenuItemType::Separator => "Separator",
            _ => AppConfig::UNTITLED,
        };
        Self {
            title: title.to_string(),
            item_type,
            file_path_or_uri: String::new(),
            arguments: String::new(),
            working_directory: String::new(),
            item_id: new_item_id(),
            popup_id: String::new(),
            menu_items: match item_type {
                MenuItemType::SubMenu => Some(Vec::new()),
                _ => None,
            },
        }
    }

    pub fn item(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file_path_or_uri: path.into(),
            ..Self::new_untitled(MenuItemType::MenuItem)
        }
    }

    pub fn sub_menu(title: impl Into<String>, items: Vec<MenuEntry>) -> Self {
        Self {
            title: title.into(),
            menu_items: Some(items),
            ..Self::new_untitled(MenuItemType::SubMenu)
        }
    }

    pub fn popup_reference(title: impl Into<String>, popup_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            popup_id: popup_id.into(),
            ..Self::new_untitled(MenuItemType::PopupReference)
        }
    }

    /// The bootstrap item written to a missing menu file.
    pub fn starter() -> Self {
        Self::item(StarterConfig::TITLE, StarterConfig::PATH)
    }

    /// Whether this item can be launched or opened at all.
    pub fn is_actionable(&self) -> bool {
        matches!(
            self.item_type,
            MenuItemType::MenuItem | MenuItemType::PopupReference
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_type_ordinals_follow_declaration_order() {
        let kinds = [
            MenuItemType::MenuItem,
            MenuItemType::SubMenu,
            MenuItemType::SectionHeading,
            MenuItemType::Separator,
            MenuItemType::PopupReference,
        ];
        for (ordinal, kind) in kinds.into_iter().enumerate() {
            assert_eq!(u8::from(kind) as usize, ordinal);
            assert_eq!(MenuItemType::try_from(ordinal as u8).unwrap(), kind);
        }
    }

    #[test]
    fn test_menu_items_key_always_written() {
        let value = serde_json::to_value(MenuEntry::starter()).unwrap();
        assert_eq!(value["MenuItems"], json!(null));
        assert_eq!(value["ItemType"], json!(0));

        let sub = serde_json::to_value(MenuEntry::sub_menu("Tools", vec![])).unwrap();
        assert_eq!(sub["MenuItems"], json!([]));
    }

    #[test]
    fn test_separator_is_not_untitled() {
        let separator = MenuEntry::new_untitled(MenuItemType::Separator);
        assert_eq!(separator.title, "Separator");
        assert!(!separator.is_actionable());
    }
}
