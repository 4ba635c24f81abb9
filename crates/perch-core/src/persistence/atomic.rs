//! Atomic file operations for safe JSON persistence.
//!
//! Writes go to a uniquely named temp file next to the target, are synced to
//! disk, optionally leave a `.bak` copy of the previous file, and are then
//! renamed over the target so readers never see a half-written document.

use crate::{PerchError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, warn};

/// Read a whole file as UTF-8 text.
///
/// Returns `None` if the file doesn't exist.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PerchError::Io {
            message: format!("Failed to read {}", path.display()),
            path: Some(path.to_path_buf()),
            source: Some(e),
        }),
    }
}

/// Read and parse a JSON file.
///
/// Returns `None` if the file doesn't exist, or an error if parsing fails.
pub fn atomic_read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let Some(contents) = read_text(path)? else {
        return Ok(None);
    };

    let data: T = serde_json::from_str(&contents).map_err(|e| PerchError::Json {
        message: format!("Failed to parse {}: {}", path.display(), e),
        source: Some(e),
    })?;

    Ok(Some(data))
}

/// Serialize `data` as indented JSON and write it to `path` atomically.
///
/// With `keep_backup`, an existing target is first copied to `<name>.json.bak`.
pub fn atomic_write_json<T: Serialize + ?Sized>(
    path: &Path,
    data: &T,
    keep_backup: bool,
) -> Result<()> {
    let serialized = serde_json::to_string_pretty(data).map_err(|e| PerchError::Json {
        message: format!("Failed to serialize data for {}: {}", path.display(), e),
        source: Some(e),
    })?;
    atomic_write_text(path, &serialized, keep_backup)
}

/// Write `contents` to `path` atomically, creating parent directories.
pub fn atomic_write_text(path: &Path, contents: &str, keep_backup: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| PerchError::Io {
                message: format!("Failed to create directory {}", parent.display()),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }
    }

    let temp_path = temp_path_for(path);

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| PerchError::Io {
                message: format!("Failed to create temp file {}", temp_path.display()),
                path: Some(temp_path.clone()),
                source: Some(e),
            })?;

        let written = file
            .write_all(contents.as_bytes())
            .and_then(|_| file.flush())
            .and_then(|_| file.sync_all());
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(PerchError::Io {
                message: format!("Failed to write temp file {}", temp_path.display()),
                path: Some(temp_path.clone()),
                source: Some(e),
            });
        }
    }

    if keep_backup && path.exists() {
        let backup_path = backup_path_for(path);
        if let Err(e) = fs::copy(path, &backup_path) {
            // Not fatal; the write itself still goes ahead.
            warn!("Failed to create backup {}: {}", backup_path.display(), e);
        } else {
            debug!("Created backup: {}", backup_path.display());
        }
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(PerchError::Io {
            message: format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            ),
            path: Some(path.to_path_buf()),
            source: Some(e),
        });
    }

    debug!("Atomically wrote {}", path.display());
    Ok(())
}

/// `<name>.json.bak` next to the target.
pub fn backup_path_for(path: &Path) -> PathBuf {
    path.with_extension("json.bak")
}

fn temp_path_for(path: &Path) -> PathBuf {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    path.with_extension(format!("json.{}.{}.tmp", process::id(), &suffix[..8]))
}
