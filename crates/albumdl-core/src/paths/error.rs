//! Path-related errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from directory planning and creation.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },
}
