//! Centralized configuration for Perch.
//!
//! This module provides configuration constants for data files, icons,
//! backups and process exit codes.

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Perch";
    /// Directory created under the platform config dir when no data dir is given.
    pub const APP_CONFIG_DIR_NAME: &'static str = "perch";
    /// Title given to freshly created nodes until the user renames them.
    pub const UNTITLED: &'static str = "untitled";
}

/// Data file names and directory layout.
pub struct PathsConfig;

impl PathsConfig {
    pub const LIST_FILENAME: &'static str = "perch-list.json";
    pub const MENU_FILENAME: &'static str = "perch-menu.json";
    pub const POPUP_GEOMETRY_FILENAME: &'static str = "perch-popup-geometry.json";
    pub const SETTINGS_FILENAME: &'static str = "settings.json";
    pub const ICONS_DIR_NAME: &'static str = "Icons";
}

/// Backup naming.
pub struct BackupConfig;

impl BackupConfig {
    pub const LIST_PREFIX: &'static str = "perch-list-backup";
    pub const MENU_PREFIX: &'static str = "perch-menu-backup";
    /// `chrono` format string appended to the prefix.
    pub const TIMESTAMP_FORMAT: &'static str = "%Y%m%d_%H%M%S";
}

/// The Calculator entry written when a data file does not exist yet.
pub struct StarterConfig;

impl StarterConfig {
    pub const TITLE: &'static str = "Calculator";
    pub const PATH: &'static str = "calc.exe";
}

/// Built-in icon asset names and icon heuristics.
pub struct IconConfig;

impl IconConfig {
    pub const UNKNOWN: &'static str = "unknown.png";
    pub const POPUP: &'static str = "popup.png";
    pub const FOLDER: &'static str = "folder.png";
    pub const GLOBE: &'static str = "globe.png";
    pub const SHORTCUT_EXTENSION: &'static str = "lnk";
    pub const EXECUTABLE_EXTENSION: &'static str = "exe";
}

/// Process exit statuses for fatal startup errors.
pub struct ExitCodes;

impl ExitCodes {
    pub const GENERIC_FAILURE: i32 = 1;
    pub const DATA_FILE_MISSING: i32 = 3;
    pub const DATA_FILE_INVALID: i32 = 4;
    pub const DATA_FILE_EMPTY: i32 = 5;
}
