//! List-tree node: one shortcut in the main window or a pop-up.

use crate::config::{AppConfig, StarterConfig};
use serde::{Deserialize, Serialize};

/// Kind of list entry. Persisted as its ordinal (`0` = Normal, `1` = Popup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EntryType {
    #[default]
    Normal,
    Popup,
}

impl TryFrom<u8> for EntryType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EntryType::Normal),
            1 => Ok(EntryType::Popup),
            other => Err(format!("unknown EntryType {}", other)),
        }
    }
}

impl From<EntryType> for u8 {
    fn from(value: EntryType) -> Self {
        match value {
            EntryType::Normal => 0,
            EntryType::Popup => 1,
        }
    }
}

pub(crate) fn new_item_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A launchable item, or a pop-up holding further entries.
///
/// `children` is `Some` for pop-ups (possibly empty) and `None` for plain
/// entries; the distinction survives a save/load round trip because the
/// `Children` key is always written, as `null` for leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entry {
    #[serde(default)]
    pub title: String,
    /// Assigned once at creation. Records written without an id get a fresh one on load.
    #[serde(rename = "ItemID", default = "new_item_id")]
    pub item_id: String,
    #[serde(default)]
    pub entry_type: EntryType,
    #[serde(rename = "FilePathOrURI", default)]
    pub file_path_or_uri: String,
    #[serde(default)]
    pub arguments: String,
    #[serde(default)]
    pub working_directory: String,
    /// File name relative to the icons directory.
    #[serde(default)]
    pub icon_source: String,
    #[serde(default)]
    pub run_elevated: bool,
    #[serde(default)]
    pub children: Option<Vec<Entry>>,
    #[serde(skip)]
    pub is_selected: bool,
}

impl Entry {
    /// Create a node the way the editor's "New" action does.
    pub fn new_untitled(entry_type: EntryType) -> Self {
        Self {
            title: AppConfig::UNTITLED.to_string(),
            item_id: new_item_id(),
            entry_type,
            file_path_or_uri: String::new(),
            arguments: String::new(),
            working_directory: String::new(),
            icon_source: String::new(),
            run_elevated: false,
            children: match entry_type {
                EntryType::Popup => Some(Vec::new()),
                EntryType::Normal => None,
            },
            is_selected: false,
        }
    }

    /// Create a plain entry pointing at `path`.
    pub fn normal(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file_path_or_uri: path.into(),
            ..Self::new_untitled(EntryType::Normal)
        }
    }

    /// Create a pop-up holding `children`.
    pub fn popup(title: impl Into<String>, children: Vec<Entry>) -> Self {
        Self {
            title: title.into(),
            children: Some(children),
            ..Self::new_untitled(EntryType::Popup)
        }
    }

    /// The bootstrap entry written to a missing list file.
    pub fn starter() -> Self {
        Self::normal(StarterConfig::TITLE, StarterConfig::PATH)
    }

    pub fn is_popup(&self) -> bool {
        self.entry_type == EntryType::Popup
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = arguments.into();
        self
    }

    pub fn with_icon_source(mut self, icon_source: impl Into<String>) -> Self {
        self.icon_source = icon_source.into();
        self
    }

    pub fn with_working_directory(mut self, dir: impl Into<String>) -> Self {
        self.working_directory = dir.into();
        self
    }
}
