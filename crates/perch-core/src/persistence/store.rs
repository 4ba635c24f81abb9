//! Load/save/backup/import of a forest, implemented once for both tree kinds.

use super::atomic::{atomic_write_json, read_text};
use crate::config::{BackupConfig, PathsConfig};
use crate::model::{Entry, MenuEntry};
use crate::tree::{Forest, TreeNode};
use crate::{PerchError, Result};
use chrono::{DateTime, Local};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything that differs between the list file and the menu file.
pub trait TreeKind {
    type Node: TreeNode + Serialize + DeserializeOwned;

    /// Short name used in log lines.
    const LABEL: &'static str;
    const FILE_NAME: &'static str;
    /// JSON key a candidate file must mention before import is attempted.
    const IMPORT_MARKER: &'static str;
    const BACKUP_PREFIX: &'static str;

    /// Content written when the data file does not exist yet.
    fn starter() -> Vec<Self::Node>;

    /// Trim and unquote the persisted string fields of one node (not its children).
    fn normalize(node: &mut Self::Node);
}

/// The main list and its pop-ups.
#[derive(Debug, Clone, Copy)]
pub struct ListTree;

/// The tray context menu.
#[derive(Debug, Clone, Copy)]
pub struct MenuTree;

impl TreeKind for ListTree {
    type Node = Entry;

    const LABEL: &'static str = "list";
    const FILE_NAME: &'static str = PathsConfig::LIST_FILENAME;
    const IMPORT_MARKER: &'static str = "Children";
    const BACKUP_PREFIX: &'static str = BackupConfig::LIST_PREFIX;

    fn starter() -> Vec<Entry> {
        vec![Entry::starter()]
    }

    fn normalize(entry: &mut Entry) {
        entry.title = entry.title.trim().to_string();
        entry.file_path_or_uri = clean_path(&entry.file_path_or_uri);
        entry.icon_source = clean_path(&entry.icon_source);
        entry.working_directory = clean_path(&entry.working_directory);
    }
}

impl TreeKind for MenuTree {
    type Node = MenuEntry;

    const LABEL: &'static str = "menu";
    const FILE_NAME: &'static str = PathsConfig::MENU_FILENAME;
    const IMPORT_MARKER: &'static str = "MenuItems";
    const BACKUP_PREFIX: &'static str = BackupConfig::MENU_PREFIX;

    fn starter() -> Vec<MenuEntry> {
        vec![MenuEntry::starter()]
    }

    fn normalize(item: &mut MenuEntry) {
        item.title = item.title.trim().to_string();
        item.file_path_or_uri = clean_path(&item.file_path_or_uri);
        item.working_directory = clean_path(&item.working_directory);
    }
}

/// Trim whitespace and one layer of surrounding quotes.
fn clean_path(value: &str) -> String {
    value.trim().trim_matches('"').trim().to_string()
}

/// The save-time form of a forest: normalized, with untitled-by-emptiness
/// nodes dropped at every depth.
pub fn prepare_for_save<K: TreeKind>(nodes: &[K::Node]) -> Vec<K::Node> {
    nodes
        .iter()
        .filter_map(|node| {
            let mut node = node.clone();
            K::normalize(&mut node);
            if node.title().is_empty() {
                debug!("Dropping {} node {} with empty title", K::LABEL, node.item_id());
                return None;
            }
            if let Some(children) = node.children_mut() {
                let kept = prepare_for_save::<K>(children);
                *children = kept;
            }
            Some(node)
        })
        .collect()
}

/// JSON file holding one forest.
#[derive(Debug, Clone)]
pub struct ForestStore<K: TreeKind> {
    path: PathBuf,
    keep_backup: bool,
    _kind: PhantomData<K>,
}

impl<K: TreeKind> ForestStore<K> {
    /// Store for the standard file name inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self::at(data_dir.join(K::FILE_NAME))
    }

    /// Store for an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keep_backup: true,
            _kind: PhantomData,
        }
    }

    /// Whether saves keep a `.json.bak` copy of the previous file.
    pub fn with_backup(mut self, keep_backup: bool) -> Self {
        self.keep_backup = keep_backup;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the forest, writing the starter file first if none exists.
    ///
    /// A missing data directory or unreadable file is
    /// [`PerchError::DataFileUnavailable`], invalid JSON is
    /// [`PerchError::Json`], and a file that parses to nothing is
    /// [`PerchError::EmptyData`].
    pub fn load(&self) -> Result<Forest<K::Node>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(PerchError::DataFileUnavailable {
                    path: self.path.clone(),
                    source: None,
                });
            }
        }

        if !self.path.exists() {
            self.write_starter()?;
        }

        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PerchError::DataFileUnavailable {
                path: self.path.clone(),
                source: Some(e),
            },
            _ => PerchError::io_with_path(e, &self.path),
        })?;

        let nodes = self.parse(&text)?;
        info!(
            "Read {} {} entries from {}",
            nodes.len(),
            K::LABEL,
            self.path.display()
        );

        let forest = Forest::new(nodes);
        self.warn_on_duplicates(&forest);
        Ok(forest)
    }

    fn parse(&self, text: &str) -> Result<Vec<K::Node>> {
        if text.trim().is_empty() {
            return Err(PerchError::EmptyData {
                path: self.path.clone(),
            });
        }

        let nodes: Option<Vec<K::Node>> =
            serde_json::from_str(text).map_err(|e| PerchError::Json {
                message: format!("Failed to parse {}: {}", self.path.display(), e),
                source: Some(e),
            })?;

        match nodes {
            Some(nodes) if !nodes.is_empty() => Ok(nodes),
            _ => Err(PerchError::EmptyData {
                path: self.path.clone(),
            }),
        }
    }

    fn write_starter(&self) -> Result<()> {
        info!(
            "No {} file at {}, writing starter content",
            K::LABEL,
            self.path.display()
        );
        atomic_write_json(&self.path, &K::starter(), false)
    }

    fn warn_on_duplicates(&self, forest: &Forest<K::Node>) {
        let duplicates = forest.duplicate_ids();
        if !duplicates.is_empty() {
            warn!(
                "{} file {} has duplicate ids: {}",
                K::LABEL,
                self.path.display(),
                duplicates.join(", ")
            );
        }
    }

    /// Write the forest, dropping nodes whose trimmed title is empty.
    ///
    /// Returns the number of nodes written at every depth.
    pub fn save(&self, forest: &Forest<K::Node>) -> Result<usize> {
        let nodes = prepare_for_save::<K>(forest.nodes());
        let written = Forest::new(nodes);
        atomic_write_json(&self.path, written.nodes(), self.keep_backup)?;

        let count = written.node_count();
        info!("Saved {} {} entries to {}", count, K::LABEL, self.path.display());
        Ok(count)
    }

    /// Default file name offered when the user backs up this file.
    pub fn default_backup_file_name(now: DateTime<Local>) -> String {
        format!(
            "{}_{}.json",
            K::BACKUP_PREFIX,
            now.format(BackupConfig::TIMESTAMP_FORMAT)
        )
    }

    /// Copy the persisted file verbatim to `destination`.
    ///
    /// If `destination` is a directory the default timestamped name is used
    /// inside it. Returns the path written.
    pub fn backup_to(&self, destination: &Path) -> Result<PathBuf> {
        let target = if destination.is_dir() {
            destination.join(Self::default_backup_file_name(Local::now()))
        } else {
            destination.to_path_buf()
        };

        fs::copy(&self.path, &target).map_err(|e| PerchError::Io {
            message: format!(
                "Failed to back up {} to {}",
                self.path.display(),
                target.display()
            ),
            path: Some(target.clone()),
            source: Some(e),
        })?;

        info!("Backed up {} file to {}", K::LABEL, target.display());
        Ok(target)
    }

    /// Read a candidate file for import.
    ///
    /// Files that never mention this kind's marker key are rejected before
    /// any parsing is attempted.
    pub fn import(&self, candidate: &Path) -> Result<Vec<K::Node>> {
        let text = read_text(candidate)?.ok_or_else(|| PerchError::Io {
            message: format!("Import file not found: {}", candidate.display()),
            path: Some(candidate.to_path_buf()),
            source: None,
        })?;

        let marker = format!("\"{}\"", K::IMPORT_MARKER);
        if !text.contains(&marker) {
            warn!(
                "Rejected {} import {}: no {} key",
                K::LABEL,
                candidate.display(),
                K::IMPORT_MARKER
            );
            return Err(PerchError::ImportRejected {
                path: candidate.to_path_buf(),
                marker: K::IMPORT_MARKER.to_string(),
            });
        }

        let nodes: Vec<K::Node> = serde_json::from_str(&text).map_err(|e| PerchError::Json {
            message: format!("Failed to parse {}: {}", candidate.display(), e),
            source: Some(e),
        })?;
        info!(
            "Imported {} {} entries from {}",
            nodes.len(),
            K::LABEL,
            candidate.display()
        );
        Ok(nodes)
    }

    /// Import `candidate` and, only if that succeeds, replace `forest` with it.
    ///
    /// The caller still has to save to persist the import.
    pub fn import_into(&self, candidate: &Path, forest: &mut Forest<K::Node>) -> Result<usize> {
        let nodes = self.import(candidate)?;
        let count = nodes.len();
        forest.replace_all(nodes);
        self.warn_on_duplicates(forest);
        Ok(count)
    }
}
