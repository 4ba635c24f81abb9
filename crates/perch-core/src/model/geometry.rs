//! Saved pop-up window placement.

use serde::{Deserialize, Serialize};

/// Placement of one pop-up window, persisted in the companion geometry file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PopupGeometry {
    /// `ItemID` of the pop-up entry. Empty in records written by older versions.
    #[serde(rename = "PopupItemID", default)]
    pub popup_item_id: String,
    /// Title at the time of saving; only used to match records without an id.
    #[serde(default)]
    pub popup_title: String,
    pub top: f64,
    pub left: f64,
    pub height: f64,
    pub width: f64,
}

impl PopupGeometry {
    pub fn new(top: f64, left: f64, height: f64, width: f64) -> Self {
        Self {
            popup_item_id: String::new(),
            popup_title: String::new(),
            top,
            left,
            height,
            width,
        }
    }
}
