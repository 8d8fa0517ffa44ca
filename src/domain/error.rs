use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Minimum accepted `client_password` length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Library-wide error type for odosetup operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Summary serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    ConfigMissing(PathBuf),

    /// A required configuration field is absent or empty.
    #[error("Required field '{0}' is missing from the configuration file")]
    MissingField(&'static str),

    /// Client name contains characters outside [a-zA-Z0-9].
    #[error("Invalid client_name '{0}': must contain only alphanumeric characters")]
    InvalidClientName(String),

    /// Client password is shorter than the minimum.
    #[error("client_password must be at least {MIN_PASSWORD_LEN} characters long")]
    WeakPassword,

    /// A port field is non-numeric or out of range.
    #[error("Invalid value '{value}' for {key}: must be a port number between 1 and 65535")]
    InvalidPort { key: &'static str, value: String },

    /// The install base path is missing or not writable.
    #[error("Install base path does not exist or is not writable: {0}")]
    PathUnavailable(PathBuf),

    /// The target setup directory already exists; refusing to merge over it.
    #[error("Target directory already exists: {0}")]
    TargetExists(PathBuf),

    /// The template directory is absent.
    #[error("Template directory not found: {0}")]
    TemplateMissing(PathBuf),

    /// A template entry has a name that is not valid UTF-8.
    #[error("Template entry has an unsupported (non-UTF-8) name: {0}")]
    UnsupportedFileName(PathBuf),

    /// Copying a template entry into the target failed.
    #[error("Failed to copy {path}: {source}")]
    CopyFailure { path: PathBuf, source: io::Error },

    /// The canonical install path was written more than once into one file.
    #[error(
        "Install path appears {count} times in {file} (expected at most once); offending lines:\n{lines}"
    )]
    DuplicatePath { file: PathBuf, count: usize, lines: String },
}
