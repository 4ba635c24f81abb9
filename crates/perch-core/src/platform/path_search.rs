//! Executable lookup along the system search path.

use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Finds an executable by bare name the way the shell would.
pub trait PathSearch {
    fn find_executable(&self, name: &str) -> Option<PathBuf>;
}

/// Searches the directories listed in `PATH`.
///
/// On Windows the system directory is searched first, as `SearchPath` does.
#[derive(Debug, Clone, Default)]
pub struct SystemPathSearch {
    dirs: Vec<PathBuf>,
}

impl SystemPathSearch {
    /// Snapshot of the current process search path.
    pub fn from_env() -> Self {
        let mut dirs = Vec::new();
        #[cfg(windows)]
        {
            if let Some(root) = env::var_os("SystemRoot") {
                dirs.push(PathBuf::from(root).join("System32"));
            }
        }
        if let Some(path) = env::var_os("PATH") {
            dirs.extend(env::split_paths(&path));
        }
        Self { dirs }
    }

    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl PathSearch for SystemPathSearch {
    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let as_path = Path::new(name);
        if as_path.components().count() > 1 {
            return as_path.is_file().then(|| as_path.to_path_buf());
        }

        let found = self
            .dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file());
        debug!("PATH search for {}: {:?}", name, found);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_first_match_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("tool.exe"), b"").unwrap();

        let search = SystemPathSearch::with_dirs(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(
            search.find_executable("tool.exe"),
            Some(second.path().join("tool.exe"))
        );

        fs::write(first.path().join("tool.exe"), b"").unwrap();
        assert_eq!(
            search.find_executable("tool.exe"),
            Some(first.path().join("tool.exe"))
        );
    }

    #[test]
    fn test_missing_and_empty_names() {
        let dir = TempDir::new().unwrap();
        let search = SystemPathSearch::with_dirs(vec![dir.path().to_path_buf()]);
        assert!(search.find_executable("nothing.exe").is_none());
        assert!(search.find_executable("  ").is_none());
    }

    #[test]
    fn test_qualified_path_is_not_searched() {
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("direct.exe");
        fs::write(&exe, b"").unwrap();

        let search = SystemPathSearch::default();
        let name = exe.to_string_lossy().to_string();
        assert_eq!(search.find_executable(&name), Some(exe));
    }
}
