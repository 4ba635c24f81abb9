//! Error types for Perch.
//!
//! Every fallible library operation returns [`PerchError`]. The front end
//! decides how each one is presented: startup data-file errors terminate the
//! process with a distinct exit status, everything else becomes a message or
//! a log line.

use crate::config::ExitCodes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Perch library.
#[derive(Debug, Error)]
pub enum PerchError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The data file (or the directory holding it) could not be found while loading.
    #[error("Data file not available: {path}")]
    DataFileUnavailable {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The data file parsed but held no entries.
    #[error("Data file contains no entries: {path}")]
    EmptyData { path: PathBuf },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Import rejected: {path} does not contain the \"{marker}\" key")]
    ImportRejected { path: PathBuf, marker: String },

    // Tree errors
    #[error("An item named \"{title}\" is still waiting for a name; rename it before adding another")]
    UntitledExists { title: String },

    #[error("Item not found: {id}")]
    NodeNotFound { id: String },

    #[error("Invalid move: {message}")]
    InvalidMove { message: String },

    // Icon errors
    #[error("Failed to decode icon {path}: {message}")]
    IconDecode { path: PathBuf, message: String },

    #[error("Operation not supported on this platform: {operation}")]
    Unsupported { operation: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for Perch operations.
pub type Result<T> = std::result::Result<T, PerchError>;

impl From<std::io::Error> for PerchError {
    fn from(err: std::io::Error) -> Self {
        PerchError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for PerchError {
    fn from(err: serde_json::Error) -> Self {
        PerchError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl PerchError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        PerchError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Process exit status used when this error aborts startup.
    ///
    /// - 3: data file or its directory not found
    /// - 4: data file unreadable or not valid JSON
    /// - 5: data file parsed but empty
    /// - 1: anything else
    pub fn startup_exit_code(&self) -> i32 {
        match self {
            PerchError::DataFileUnavailable { .. } => ExitCodes::DATA_FILE_MISSING,
            PerchError::Json { .. } | PerchError::Io { .. } => ExitCodes::DATA_FILE_INVALID,
            PerchError::EmptyData { .. } => ExitCodes::DATA_FILE_EMPTY,
            _ => ExitCodes::GENERIC_FAILURE,
        }
    }

    /// Whether this error should be shown to the user rather than only logged.
    ///
    /// Icon problems are cosmetic and never reach the user.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            PerchError::IconDecode { .. } | PerchError::Unsupported { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PerchError::UntitledExists {
            title: "Untitled".into(),
        };
        assert!(err.to_string().contains("\"Untitled\""));
    }

    #[test]
    fn test_startup_exit_codes_are_distinct() {
        let missing = PerchError::DataFileUnavailable {
            path: PathBuf::from("list.json"),
            source: None,
        };
        let invalid = PerchError::Json {
            message: "expected value".into(),
            source: None,
        };
        let empty = PerchError::EmptyData {
            path: PathBuf::from("list.json"),
        };

        let codes = [
            missing.startup_exit_code(),
            invalid.startup_exit_code(),
            empty.startup_exit_code(),
        ];
        assert_eq!(codes, [3, 4, 5]);
        let config = PerchError::Config {
            message: "x".into(),
        };
        assert_eq!(config.startup_exit_code(), 1);
    }

    #[test]
    fn test_icon_errors_are_not_user_facing() {
        let err = PerchError::IconDecode {
            path: PathBuf::from("broken.png"),
            message: "bad header".into(),
        };
        assert!(!err.is_user_facing());
        assert!(PerchError::NodeNotFound { id: "abc".into() }.is_user_facing());
    }
}
