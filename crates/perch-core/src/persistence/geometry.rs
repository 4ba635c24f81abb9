//! Companion file holding the last window placement of each pop-up.

use super::atomic::{atomic_read_json, atomic_write_json};
use crate::config::PathsConfig;
use crate::model::{Entry, PopupGeometry};
use crate::tree::Forest;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Pop-up geometry records, keyed by `PopupItemID`.
///
/// Records written without an id are matched by title instead, so placements
/// saved before ids existed keep working until the pop-up is renamed.
#[derive(Debug)]
pub struct PopupGeometryStore {
    path: PathBuf,
    records: Vec<PopupGeometry>,
    dirty: bool,
}

impl PopupGeometryStore {
    /// Load the geometry file in `data_dir`.
    ///
    /// A missing or corrupt file is not an error; placements are cosmetic.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(PathsConfig::POPUP_GEOMETRY_FILENAME);
        let records = match atomic_read_json::<Vec<PopupGeometry>>(&path) {
            Ok(Some(records)) => {
                debug!("Loaded {} pop-up placements", records.len());
                records
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Ignoring unreadable pop-up geometry file: {}", e);
                Vec::new()
            }
        };
        Self {
            path,
            records,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[PopupGeometry] {
        &self.records
    }

    /// Whether records changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn position_of(&self, popup: &Entry) -> Option<usize> {
        self.records
            .iter()
            .position(|r| !r.popup_item_id.is_empty() && r.popup_item_id == popup.item_id)
            .or_else(|| {
                self.records
                    .iter()
                    .position(|r| r.popup_item_id.is_empty() && r.popup_title == popup.title)
            })
    }

    /// Saved placement of `popup`, if any.
    pub fn geometry_for(&self, popup: &Entry) -> Option<&PopupGeometry> {
        self.position_of(popup).map(|i| &self.records[i])
    }

    /// Remember where `popup` was last shown.
    ///
    /// A legacy title-keyed record is upgraded to the pop-up's id.
    pub fn record(&mut self, popup: &Entry, geometry: PopupGeometry) {
        let record = PopupGeometry {
            popup_item_id: popup.item_id.clone(),
            popup_title: popup.title.clone(),
            ..geometry
        };
        match self.position_of(popup) {
            Some(i) => self.records[i] = record,
            None => self.records.push(record),
        }
        self.dirty = true;
    }

    /// Drop records whose pop-up no longer exists in `list`.
    ///
    /// Returns the number of records removed.
    pub fn prune(&mut self, list: &Forest<Entry>) -> usize {
        let before = self.records.len();
        self.records.retain(|record| {
            if record.popup_item_id.is_empty() {
                !list
                    .find_by_predicate(|e| e.is_popup() && e.title == record.popup_title)
                    .is_empty()
            } else {
                list.find_by_id(&record.popup_item_id)
                    .is_some_and(Entry::is_popup)
            }
        });
        let removed = before - self.records.len();
        if removed > 0 {
            info!("Pruned {} stale pop-up placement(s)", removed);
            self.dirty = true;
        }
        removed
    }

    pub fn save(&mut self) -> Result<()> {
        atomic_write_json(&self.path, &self.records, false)?;
        self.dirty = false;
        debug!("Saved {} pop-up placements", self.records.len());
        Ok(())
    }
}
