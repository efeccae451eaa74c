//! Image resolution for rewritten links
//!
//! Locates the image a document refers to and brings the flat images
//! folder up to date with it.

use std::path::{Path, PathBuf};

use crate::error::SyncError;
use crate::fs::{copy_preserving_times, needs_copy};

/// What happened to a referenced image that was found in the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Copied (new or newer than the existing copy)
    Copied { from: PathBuf, to: PathBuf },
    /// Destination copy is already current
    UpToDate { to: PathBuf },
}

/// Resolves image references against the folder of the referring document
#[derive(Debug)]
pub struct AssetResolver<'a> {
    images_root: &'a Path,
}

impl<'a> AssetResolver<'a> {
    pub fn new(images_root: &'a Path) -> Self {
        Self { images_root }
    }

    /// Source path a reference points at. The reference is used verbatim,
    /// spaces included and without percent-decoding.
    pub fn source_path(document_dir: &Path, reference: &str) -> PathBuf {
        document_dir.join(reference)
    }

    /// Destination path in the flat images folder
    pub fn destination_path(&self, reference: &str) -> PathBuf {
        self.images_root.join(file_name(reference))
    }

    /// Locate `reference` next to the document and copy it into the images
    /// folder when the copy there is missing or older.
    pub fn resolve(&self, document_dir: &Path, reference: &str) -> Result<CopyOutcome, SyncError> {
        let source = Self::source_path(document_dir, reference);
        if !source.exists() {
            return Err(SyncError::AssetMissing(source));
        }

        let dest = self.destination_path(reference);
        let stale = needs_copy(&source, &dest).map_err(|e| SyncError::CopyFailed {
            from: source.clone(),
            to: dest.clone(),
            source: e,
        })?;

        if !stale {
            return Ok(CopyOutcome::UpToDate { to: dest });
        }

        copy_preserving_times(&source, &dest).map_err(|e| SyncError::CopyFailed {
            from: source.clone(),
            to: dest.clone(),
            source: e,
        })?;

        Ok(CopyOutcome::Copied {
            from: source,
            to: dest,
        })
    }
}

/// Last path component of a reference, or the whole reference if it has none
pub fn file_name(reference: &str) -> &str {
    Path::new(reference)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(reference)
}
