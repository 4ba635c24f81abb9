//! The launcher's in-memory state and its files.
//!
//! A [`Launchpad`] owns both forests, the stores that persist them, their
//! dirty trackers, the pop-up geometry store and the user settings. Front
//! ends hold a `Launchpad` instead of reaching for global state.

use crate::config::AppConfig;
use crate::icon::{Icon, IconResolver};
use crate::launch::{LaunchExecutor, LaunchHost};
use crate::model::{Entry, MenuEntry};
use crate::persistence::{ForestStore, ListTree, MenuTree, PopupGeometryStore};
use crate::settings::Settings;
use crate::tree::{dangling_popup_references, popups, DirtyTracker, Forest, TreeNode};
use crate::{PerchError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Problems found by [`Launchpad::diagnose`]. None of them block anything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    pub duplicate_list_ids: Vec<String>,
    pub duplicate_menu_ids: Vec<String>,
    /// Titles of nodes still carrying the untitled sentinel.
    pub untitled: Vec<String>,
    /// Titles of menu items whose pop-up reference does not resolve.
    pub dangling_references: Vec<String>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.duplicate_list_ids.is_empty()
            && self.duplicate_menu_ids.is_empty()
            && self.untitled.is_empty()
            && self.dangling_references.is_empty()
    }
}

pub struct Launchpad {
    data_dir: PathBuf,
    settings: Settings,
    list_store: ForestStore<ListTree>,
    menu_store: ForestStore<MenuTree>,
    list: Forest<Entry>,
    menu: Forest<MenuEntry>,
    list_changes: DirtyTracker,
    menu_changes: DirtyTracker,
    geometry: PopupGeometryStore,
    startup_warnings: Vec<String>,
}

impl Launchpad {
    /// `<platform config dir>/perch`.
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(AppConfig::APP_CONFIG_DIR_NAME))
            .ok_or_else(|| PerchError::Config {
                message: "no configuration directory on this platform".into(),
            })
    }

    /// Load everything from `data_dir`.
    ///
    /// A list file that cannot be loaded is fatal and returned as the error.
    /// A menu file that cannot be loaded leaves the menu empty and is
    /// recorded in [`Launchpad::startup_warnings`].
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let settings = Settings::load(&data_dir);

        let list_store = ForestStore::<ListTree>::new(&data_dir)
            .with_backup(settings.keep_backup_on_save);
        let menu_store = ForestStore::<MenuTree>::new(&data_dir)
            .with_backup(settings.keep_backup_on_save);

        let list = list_store.load()?;

        let mut startup_warnings = Vec::new();
        let menu = match menu_store.load() {
            Ok(menu) => menu,
            Err(e) => {
                warn!("Tray menu unavailable: {}", e);
                startup_warnings.push(format!("The tray menu could not be loaded: {}", e));
                Forest::default()
            }
        };

        dangling_popup_references(&menu, &list);
        let geometry = PopupGeometryStore::load(&data_dir);

        info!(
            "{} ready in {} ({} list entries, {} menu items)",
            AppConfig::APP_NAME,
            data_dir.display(),
            list.node_count(),
            menu.node_count()
        );

        Ok(Self {
            data_dir,
            settings,
            list_store,
            menu_store,
            list,
            menu,
            list_changes: DirtyTracker::new(),
            menu_changes: DirtyTracker::new(),
            geometry,
            startup_warnings,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn startup_warnings(&self) -> &[String] {
        &self.startup_warnings
    }

    pub fn list(&self) -> &Forest<Entry> {
        &self.list
    }

    pub fn menu(&self) -> &Forest<MenuEntry> {
        &self.menu
    }

    pub fn list_path(&self) -> &Path {
        self.list_store.path()
    }

    pub fn menu_path(&self) -> &Path {
        self.menu_store.path()
    }

    pub fn geometry(&self) -> &PopupGeometryStore {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut PopupGeometryStore {
        &mut self.geometry
    }

    /// Every pop-up in the list, sorted by title.
    pub fn popups(&self) -> Vec<&Entry> {
        popups(&self.list)
    }

    // ========================================
    // Editing
    // ========================================

    /// Run `edit` against the list and record whatever it changed.
    pub fn edit_list<R>(&mut self, edit: impl FnOnce(&mut Forest<Entry>) -> R) -> R {
        let result = edit(&mut self.list);
        self.list_changes.observe(&mut self.list);
        result
    }

    /// Run `edit` against the menu and record whatever it changed.
    pub fn edit_menu<R>(&mut self, edit: impl FnOnce(&mut Forest<MenuEntry>) -> R) -> R {
        let result = edit(&mut self.menu);
        self.menu_changes.observe(&mut self.menu);
        result
    }

    pub fn is_list_dirty(&self) -> bool {
        self.list_changes.is_dirty()
    }

    pub fn is_menu_dirty(&self) -> bool {
        self.menu_changes.is_dirty()
    }

    // ========================================
    // Saving
    // ========================================

    /// Write the list, then drop geometry of pop-ups that no longer exist.
    pub fn save_list(&mut self) -> Result<usize> {
        let count = self.list_store.save(&self.list)?;
        self.list_changes.mark_saved();

        self.geometry.prune(&self.list);
        if let Err(e) = self.save_geometry() {
            warn!("Failed to save pop-up geometry: {}", e);
        }
        Ok(count)
    }

    pub fn save_menu(&mut self) -> Result<usize> {
        let count = self.menu_store.save(&self.menu)?;
        self.menu_changes.mark_saved();
        Ok(count)
    }

    /// Write recorded pop-up placements if any changed. Returns whether it wrote.
    pub fn save_geometry(&mut self) -> Result<bool> {
        if !self.geometry.is_dirty() {
            return Ok(false);
        }
        self.geometry.save()?;
        Ok(true)
    }

    /// Save whichever forests have unsaved changes, then any pending pop-up
    /// placements. Returns how many forests were written.
    pub fn save_if_dirty(&mut self) -> Result<usize> {
        let mut saved = 0;
        if self.is_list_dirty() {
            self.save_list()?;
            saved += 1;
        }
        if self.is_menu_dirty() {
            self.save_menu()?;
            saved += 1;
        }
        self.save_geometry()?;
        Ok(saved)
    }

    // ========================================
    // Backup / import
    // ========================================

    pub fn backup_list(&self, destination: &Path) -> Result<PathBuf> {
        self.list_store.backup_to(destination)
    }

    pub fn backup_menu(&self, destination: &Path) -> Result<PathBuf> {
        self.menu_store.backup_to(destination)
    }

    /// Replace the list with the contents of `file`. The caller saves.
    pub fn import_list(&mut self, file: &Path) -> Result<usize> {
        let count = self.list_store.import_into(file, &mut self.list)?;
        self.list_changes.observe(&mut self.list);
        Ok(count)
    }

    /// Replace the menu with the contents of `file`. The caller saves.
    pub fn import_menu(&mut self, file: &Path) -> Result<usize> {
        let count = self.menu_store.import_into(file, &mut self.menu)?;
        self.menu_changes.observe(&mut self.menu);
        dangling_popup_references(&self.menu, &self.list);
        Ok(count)
    }

    // ========================================
    // Icons and launching
    // ========================================

    /// Resolver for this launchpad's icons directory.
    pub fn icon_resolver(&self) -> IconResolver {
        IconResolver::new(self.settings.icons_dir(&self.data_dir))
    }

    /// Icon of every list entry, keyed by `ItemID`.
    pub fn resolve_list_icons(&self, resolver: &IconResolver) -> HashMap<String, Icon> {
        let mut icons = HashMap::new();
        self.list.walk(|entry, _| {
            icons.insert(entry.item_id.clone(), resolver.resolve_entry(entry));
        });
        icons
    }

    /// Icon of every menu item that has one, keyed by `ItemID`.
    pub fn resolve_menu_icons(&self, resolver: &IconResolver) -> HashMap<String, Icon> {
        let mut icons = HashMap::new();
        self.menu.walk(|item, _| {
            if let Some(icon) = resolver.resolve_menu_entry(item) {
                icons.insert(item.item_id.clone(), icon);
            }
        });
        icons
    }

    /// Executor configured from the user's settings.
    pub fn launch_executor(&self) -> LaunchExecutor {
        LaunchExecutor::new(&self.settings)
    }

    /// Launch the list entry with `id`.
    pub fn launch(
        &self,
        id: &str,
        executor: &LaunchExecutor,
        host: &mut dyn LaunchHost,
    ) -> Result<bool> {
        let entry = self
            .list
            .find_by_id(id)
            .ok_or_else(|| PerchError::NodeNotFound { id: id.to_string() })?;
        Ok(executor.launch(entry, host))
    }

    /// Launch the menu item with `id`.
    pub fn launch_menu(
        &self,
        id: &str,
        executor: &LaunchExecutor,
        host: &mut dyn LaunchHost,
    ) -> Result<bool> {
        let item = self
            .menu
            .find_by_id(id)
            .ok_or_else(|| PerchError::NodeNotFound { id: id.to_string() })?;
        Ok(executor.launch_menu_entry(item, &self.list, host))
    }

    // ========================================
    // Diagnostics
    // ========================================

    pub fn diagnose(&self) -> Diagnostics {
        let mut untitled = Vec::new();
        if let Some(node) = self.list.find_untitled() {
            untitled.push(node.title().to_string());
        }
        if let Some(node) = self.menu.find_untitled() {
            untitled.push(node.title().to_string());
        }

        Diagnostics {
            duplicate_list_ids: self.list.duplicate_ids(),
            duplicate_menu_ids: self.menu.duplicate_ids(),
            untitled,
            dangling_references: dangling_popup_references(&self.menu, &self.list)
                .into_iter()
                .map(|item| item.title.clone())
                .collect(),
        }
    }
}

impl std::fmt::Debug for Launchpad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Launchpad")
            .field("data_dir", &self.data_dir)
            .field("list_entries", &self.list.node_count())
            .field("menu_items", &self.menu.node_count())
            .finish_non_exhaustive()
    }
}
