//! User preferences persisted in `settings.json` next to the data files.

use crate::config::PathsConfig;
use crate::persistence::{atomic_read_json, atomic_write_json};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Play a confirmation sound after a successful launch.
    pub play_sound_on_launch: bool,
    /// Show a transient notification after a successful launch.
    pub notify_on_launch: bool,
    /// Keep a `.json.bak` of the previous data file on every save.
    pub keep_backup_on_save: bool,
    /// Override for the icons directory; defaults to `<data dir>/Icons`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            play_sound_on_launch: false,
            notify_on_launch: true,
            keep_backup_on_save: true,
            icons_dir: None,
        }
    }
}

impl Settings {
    pub fn file_path(data_dir: &Path) -> PathBuf {
        data_dir.join(PathsConfig::SETTINGS_FILENAME)
    }

    /// Load settings, falling back to defaults when the file is missing or corrupt.
    pub fn load(data_dir: &Path) -> Self {
        let path = Self::file_path(data_dir);
        match atomic_read_json::<Settings>(&path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        atomic_write_json(&Self::file_path(data_dir), self, false)
    }

    /// Directory explicit `IconSource` names are resolved against.
    pub fn icons_dir(&self, data_dir: &Path) -> PathBuf {
        self.icons_dir
            .clone()
            .unwrap_or_else(|| data_dir.join(PathsConfig::ICONS_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(temp_dir.path());
        assert_eq!(settings, Settings::default());
        assert!(settings.notify_on_launch);
        assert_eq!(settings.icons_dir(temp_dir.path()), temp_dir.path().join("Icons"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            Settings::file_path(temp_dir.path()),
            r#"{"playSoundOnLaunch": true, "iconsDir": "/opt/icons"}"#,
        )
        .unwrap();

        let settings = Settings::load(temp_dir.path());
        assert!(settings.play_sound_on_launch);
        assert!(settings.keep_backup_on_save);
        assert_eq!(settings.icons_dir(temp_dir.path()), PathBuf::from("/opt/icons"));
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(Settings::file_path(temp_dir.path()), "{").unwrap();
        assert_eq!(Settings::load(temp_dir.path()), Settings::default());
    }

    #[test]
    fn test_save_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings {
            notify_on_launch: false,
            ..Settings::default()
        };
        settings.save(temp_dir.path()).unwrap();
        assert_eq!(Settings::load(temp_dir.path()), settings);
    }
}
