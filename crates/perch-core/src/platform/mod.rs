//! Platform abstraction layer.
//!
//! Every collaborator that touches the operating system lives here behind a
//! trait so the icon resolver and launch executor can be tested with fakes.
//! All `#[cfg]` blocks for OS-specific behavior belong in this module.
//!
//! - `env` - `%VAR%` expansion
//! - `path_search` - executable lookup along `PATH`
//! - `shortcut` - `.lnk` target resolution
//! - `icon_extract` - associated-icon extraction (Windows only)
//! - `shell` - shell-association launcher
//!
//! # Supported Platforms
//!
//! - **Windows**: Full support
//! - **Linux/macOS**: No icon extraction; launches go through the desktop opener

pub mod env;
pub mod icon_extract;
pub mod path_search;
pub mod shell;
pub mod shortcut;

pub use env::expand_env_vars;
pub use icon_extract::{IconExtractor, ShellIconExtractor};
pub use path_search::{PathSearch, SystemPathSearch};
pub use shell::{LaunchFailure, LaunchRequest, ShellLauncher, SystemShell};
pub use shortcut::{LnkShortcutResolver, ShortcutResolver};

/// Returns the current platform name.
pub fn current_platform() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "windows"
    }
    #[cfg(target_os = "linux")]
    {
        "linux"
    }
    #[cfg(target_os = "macos")]
    {
        "macos"
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        "unknown"
    }
}
