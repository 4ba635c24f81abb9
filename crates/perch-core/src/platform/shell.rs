//! Starting targets through the shell's file association.

use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// One thing to start, with environment variables already expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub target: String,
    pub arguments: String,
    pub working_directory: Option<PathBuf>,
    /// Ask the shell to start the target with administrator rights.
    pub elevated: bool,
}

impl LaunchRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            arguments: String::new(),
            working_directory: None,
            elevated: false,
        }
    }
}

/// Why the shell could not start a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchFailure {
    /// The file, program or URI handler does not exist.
    #[error("target not found")]
    TargetNotFound,
    #[error("{0}")]
    Failed(String),
}

/// Hands a target to the platform shell without waiting for it to exit.
pub trait ShellLauncher {
    fn open(&self, request: &LaunchRequest) -> Result<(), LaunchFailure>;
}

/// `ShellExecuteW` on Windows, the desktop opener or a direct spawn elsewhere.
///
/// Off Windows the desktop opener takes no arguments. A request that carries
/// arguments therefore starts the target itself as a program, without going
/// through the file association, so a document launched with arguments fails
/// with [`LaunchFailure::Failed`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl ShellLauncher for SystemShell {
    fn open(&self, request: &LaunchRequest) -> Result<(), LaunchFailure> {
        debug!("Shell open: {:?}", request);

        #[cfg(windows)]
        {
            win::shell_execute(request)
        }

        #[cfg(not(windows))]
        {
            open_elsewhere(request)
        }
    }
}

/// Whether `target` names a URI rather than a file.
pub fn looks_like_uri(target: &str) -> bool {
    match target.split_once(':') {
        // A single letter before the colon is a drive, not a scheme.
        Some((scheme, _)) if scheme.len() > 1 => scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// Split an argument string into words with POSIX shell quoting rules.
pub fn split_arguments(arguments: &str) -> Result<Vec<String>, LaunchFailure> {
    shell_words::split(arguments)
        .map_err(|e| LaunchFailure::Failed(format!("cannot parse arguments: {}", e)))
}

#[cfg(not(windows))]
fn open_elsewhere(request: &LaunchRequest) -> Result<(), LaunchFailure> {
    use crate::platform::path_search::{PathSearch, SystemPathSearch};
    use std::io::ErrorKind;
    use std::path::Path;
    use std::process::{Command, Stdio};
    use tracing::warn;

    if request.elevated {
        warn!("Elevated launch is only available on Windows; starting normally");
    }

    let is_uri = looks_like_uri(&request.target);
    if !is_uri
        && !Path::new(&request.target).exists()
        && SystemPathSearch::from_env()
            .find_executable(&request.target)
            .is_none()
    {
        return Err(LaunchFailure::TargetNotFound);
    }

    if is_uri || request.arguments.trim().is_empty() {
        return open::that_detached(&request.target).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LaunchFailure::TargetNotFound,
            _ => LaunchFailure::Failed(e.to_string()),
        });
    }

    let args = split_arguments(&request.arguments)?;
    let mut command = Command::new(&request.target);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(dir) = &request.working_directory {
        command.current_dir(dir);
    }
    command.spawn().map(|_| ()).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LaunchFailure::TargetNotFound,
        _ => LaunchFailure::Failed(e.to_string()),
    })
}

#[cfg(windows)]
#[allow(unsafe_code)]
mod win {
    use super::{LaunchFailure, LaunchRequest};
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;
    use windows_sys::Win32::UI::Shell::ShellExecuteW;
    use windows_sys::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    /// `ShellExecuteW` results at or below this value are errors.
    const MAX_ERROR_CODE: isize = 32;
    const ERROR_FILE_NOT_FOUND: isize = 2;
    const ERROR_PATH_NOT_FOUND: isize = 3;

    fn to_wide(value: impl AsRef<OsStr>) -> Vec<u16> {
        value.as_ref().encode_wide().chain(Some(0)).collect()
    }

    pub(super) fn shell_execute(request: &LaunchRequest) -> Result<(), LaunchFailure> {
        let verb = to_wide(if request.elevated { "runas" } else { "open" });
        let file = to_wide(&request.target);
        let params = (!request.arguments.is_empty()).then(|| to_wide(&request.arguments));
        let dir = request.working_directory.as_ref().map(to_wide);

        // SAFETY: every string is a NUL-terminated UTF-16 buffer that outlives the call.
        let result = unsafe {
            ShellExecuteW(
                ptr::null_mut(),
                verb.as_ptr(),
                file.as_ptr(),
                params.as_ref().map_or(ptr::null(), |p| p.as_ptr()),
                dir.as_ref().map_or(ptr::null(), |d| d.as_ptr()),
                SW_SHOWNORMAL,
            )
        } as isize;

        match result {
            code if code > MAX_ERROR_CODE => Ok(()),
            ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND => Err(LaunchFailure::TargetNotFound),
            code => Err(LaunchFailure::Failed(format!(
                "{} (code {})",
                std::io::Error::from_raw_os_error(code as i32),
                code
            ))),
        }
    }
}
