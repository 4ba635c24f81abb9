//! Windows shell link (`.lnk`) target resolution.

use lnk::ShellLink;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolves a shortcut file to the path it points at.
pub trait ShortcutResolver {
    fn resolve_target(&self, shortcut: &Path) -> Option<PathBuf>;
}

/// Reads the link target straight out of the `.lnk` file.
///
/// Prefers the absolute local base path and falls back to the relative path
/// stored in the link, resolved against the shortcut's own directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct LnkShortcutResolver;

/// Size of the fixed shell link header, which is also its first field.
const HEADER_SIZE: usize = 0x4C;

/// Whether the file starts with a complete shell link header.
fn has_link_header(path: &Path) -> bool {
    let mut header = [0u8; HEADER_SIZE];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut header))
        .map(|_| header[..4] == [HEADER_SIZE as u8, 0, 0, 0])
        .unwrap_or(false)
}

impl ShortcutResolver for LnkShortcutResolver {
    fn resolve_target(&self, shortcut: &Path) -> Option<PathBuf> {
        if !has_link_header(shortcut) {
            warn!("{} is not a shell link", shortcut.display());
            return None;
        }

        let link = match ShellLink::open(shortcut) {
            Ok(link) => link,
            Err(e) => {
                warn!("Failed to read shortcut {}: {:?}", shortcut.display(), e);
                return None;
            }
        };

        let local = link
            .link_info()
            .as_ref()
            .and_then(|info| info.local_base_path().clone())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let target = local.or_else(|| {
            link.relative_path().as_ref().map(|relative| {
                shortcut
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .join(relative)
            })
        });

        debug!("Shortcut {} -> {:?}", shortcut.display(), target);
        target
    }
}
