//! Icon values produced by the resolver.

use crate::config::IconConfig;
use std::fmt;
use std::path::PathBuf;

/// Icons shipped with the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinIcon {
    Unknown,
    Popup,
    Folder,
    Globe,
}

impl BuiltinIcon {
    /// Asset file name of this icon.
    pub fn file_name(self) -> &'static str {
        match self {
            BuiltinIcon::Unknown => IconConfig::UNKNOWN,
            BuiltinIcon::Popup => IconConfig::POPUP,
            BuiltinIcon::Folder => IconConfig::FOLDER,
            BuiltinIcon::Globe => IconConfig::GLOBE,
        }
    }
}

impl fmt::Display for BuiltinIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuiltinIcon::Unknown => "unknown",
            BuiltinIcon::Popup => "popup",
            BuiltinIcon::Folder => "folder",
            BuiltinIcon::Globe => "globe",
        };
        f.write_str(name)
    }
}

/// Decoded bitmap, 8-bit RGBA, rows top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct IconImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for IconImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Which step of the chain produced an image icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconOrigin {
    /// The entry's `IconSource` file in the icons directory.
    Explicit(PathBuf),
    /// Associated icon of the file the entry points at.
    Associated(PathBuf),
    /// Associated icon of a shortcut's target.
    ShortcutTarget(PathBuf),
    /// Associated icon of an executable found on the search path.
    PathSearch(PathBuf),
}

impl IconOrigin {
    pub fn path(&self) -> &PathBuf {
        match self {
            IconOrigin::Explicit(p)
            | IconOrigin::Associated(p)
            | IconOrigin::ShortcutTarget(p)
            | IconOrigin::PathSearch(p) => p,
        }
    }
}

/// A resolved icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    Builtin(BuiltinIcon),
    Image { image: IconImage, origin: IconOrigin },
}

impl Icon {
    pub fn builtin(&self) -> Option<BuiltinIcon> {
        match self {
            Icon::Builtin(icon) => Some(*icon),
            Icon::Image { .. } => None,
        }
    }

    pub fn is_builtin(&self, icon: BuiltinIcon) -> bool {
        self.builtin() == Some(icon)
    }

    pub fn origin(&self) -> Option<&IconOrigin> {
        match self {
            Icon::Builtin(_) => None,
            Icon::Image { origin, .. } => Some(origin),
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Icon::Builtin(icon) => write!(f, "builtin:{}", icon),
            Icon::Image { image, origin } => {
                let kind = match origin {
                    IconOrigin::Explicit(_) => "explicit",
                    IconOrigin::Associated(_) => "associated",
                    IconOrigin::ShortcutTarget(_) => "shortcut",
                    IconOrigin::PathSearch(_) => "path",
                };
                write!(
                    f,
                    "{}:{} ({}x{})",
                    kind,
                    origin.path().display(),
                    image.width,
                    image.height
                )
            }
        }
    }
}
