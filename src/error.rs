//! Errors raised while publishing
//!
//! A run aborts only on [`SyncError::SourceUnavailable`] or when a
//! destination root cannot be created. Everything else is logged where it
//! happens and the enclosing walk moves on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Source directory does not exist: {}", .0.display())]
    SourceUnavailable(PathBuf),

    #[error("Image not found in source: {}", .0.display())]
    AssetMissing(PathBuf),

    #[error("Failed to copy {} -> {}: {source}", .from.display(), .to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to delete {}: {source}", .path.display())]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    /// Short machine-readable name of the error kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::SourceUnavailable(_) => "source_unavailable",
            SyncError::AssetMissing(_) => "asset_missing",
            SyncError::CopyFailed { .. } => "copy_failed",
            SyncError::DeleteFailed { .. } => "delete_failed",
            SyncError::DirectoryCreateFailed { .. } => "directory_create_failed",
            SyncError::ReadFailed { .. } => "read_failed",
            SyncError::WriteFailed { .. } => "write_failed",
        }
    }
}
