//! Custom error types for the htmlfuse combiner.
//!
//! Provides a structured error hierarchy for better error handling
//! and more informative error messages.

use std::path::PathBuf;

/// The main error type for combine operations.
#[derive(Debug, thiserror::Error)]
pub enum FuseError {
    /// A mandatory shell file is absent from the report directory
    #[error("Required file {path:?} is missing from the report directory")]
    MissingRequiredFile { path: PathBuf },

    /// Invalid path error (report directory missing, helper path unusable)
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O error (file read/write/copy, permissions, etc.)
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// Regex compilation error
    #[error("Invalid regex pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using FuseError
pub type FuseResult<T> = Result<T, FuseError>;

impl FuseError {
    /// Create an I/O error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a missing-required-file error
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::MissingRequiredFile { path: path.into() }
    }

    /// Create a regex error with pattern context
    pub fn regex(source: regex::Error, pattern: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            source,
        }
    }
}

/// Convert from raw I/O errors (without path context)
impl From<std::io::Error> for FuseError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}
