use std::path::PathBuf;
use thiserror::Error;

/// Errors from workspace indexing and source listing.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
