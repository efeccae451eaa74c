//! Source to destination reconciliation
//!
//! Mirrors documents into the content folder (subfolders preserved) and
//! images into the flat images folder (file name only), copying only what is
//! new or newer, then removes destination entries whose source is gone.
//!
//! Every file operation stands alone: a failure is logged with its path,
//! counted in the [`SyncReport`] and the walk continues.

use colored::Colorize;
use serde::Serialize;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::Layout;
use crate::error::SyncError;
use crate::fs::{copy_preserving_times, needs_copy};

/// Options for the sync operation
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncOptions {
    /// Show what would be done without making changes
    pub dry_run: bool,
    /// Show detailed output
    pub verbose: bool,
}

/// Result of a sync operation
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub documents_copied: usize,
    pub documents_rewritten: usize,
    pub images_copied: usize,
    pub skipped: usize,
    pub documents_deleted: usize,
    pub directories_deleted: usize,
    pub images_deleted: usize,
    pub missing_assets: usize,
    pub errors: usize,
}

impl SyncReport {
    /// Number of copy, rewrite and delete operations performed (or planned,
    /// in dry-run mode)
    pub fn changes(&self) -> usize {
        self.documents_copied
            + self.documents_rewritten
            + self.images_copied
            + self.documents_deleted
            + self.directories_deleted
            + self.images_deleted
    }

    /// Log a non-fatal error and count it
    pub fn record_error(&mut self, err: SyncError) {
        match &err {
            SyncError::AssetMissing(path) => {
                tracing::warn!(path = %path.display(), "Image not found in source");
                self.missing_assets += 1;
            }
            _ => {
                tracing::error!(kind = err.kind(), error = %err, "Operation failed");
                self.errors += 1;
            }
        }
    }
}

/// A document discovered in the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub source_path: PathBuf,
    /// Path below the source root; also the path below the content root
    pub relative_path: PathBuf,
}

impl DocumentEntry {
    /// Mirrored location in the content folder
    pub fn destination(&self, layout: &Layout) -> PathBuf {
        layout.content_root.join(&self.relative_path)
    }

    /// Folder the document's image references are resolved against
    pub fn source_dir(&self) -> &Path {
        self.source_path.parent().unwrap_or(&self.source_path)
    }
}

/// An image discovered in the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    pub source_path: PathBuf,
    /// File name, which is its identity in the flat images folder
    pub base_name: OsString,
    /// Lowercased extension
    pub extension: String,
}

impl MediaEntry {
    pub fn destination(&self, layout: &Layout) -> PathBuf {
        layout.images_root.join(&self.base_name)
    }
}

fn is_source_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Runs the individual reconciliation phases over a [`Layout`]
pub struct Reconciler<'a> {
    layout: &'a Layout,
    options: &'a SyncOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(layout: &'a Layout, options: &'a SyncOptions) -> Self {
        Self { layout, options }
    }

    /// Every regular file below the source root, depth first, sorted by name.
    ///
    /// Symlinked files count as files; symlinked directories are not descended.
    fn source_files(&self, report: &mut SyncReport) -> Vec<PathBuf> {
        let root = &self.layout.source_root;
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            match entry {
                Ok(entry) if is_source_file(&entry) => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => report.record_error(SyncError::ReadFailed {
                    path: e.path().unwrap_or(root).to_path_buf(),
                    source: e.into(),
                }),
            }
        }

        files
    }

    /// Documents in the source tree
    pub fn source_documents(&self, report: &mut SyncReport) -> Vec<DocumentEntry> {
        self.source_files(report)
            .into_iter()
            .filter(|path| self.layout.is_document(path))
            .filter_map(|source_path| {
                let relative_path = source_path
                    .strip_prefix(&self.layout.source_root)
                    .ok()?
                    .to_path_buf();
                Some(DocumentEntry {
                    source_path,
                    relative_path,
                })
            })
            .collect()
    }

    /// Images in the source tree
    pub fn source_media(&self, report: &mut SyncReport) -> Vec<MediaEntry> {
        self.source_files(report)
            .into_iter()
            .filter(|path| self.layout.is_image(path))
            .filter_map(|source_path| {
                let base_name = source_path.file_name()?.to_os_string();
                let extension = source_path.extension()?.to_string_lossy().to_lowercase();
                Some(MediaEntry {
                    source_path,
                    base_name,
                    extension,
                })
            })
            .collect()
    }

    /// Copy new or updated documents into the content folder.
    ///
    /// Returns the documents that were freshly copied; only those get their
    /// links rewritten.
    pub fn sync_documents(&self, report: &mut SyncReport) -> Vec<DocumentEntry> {
        let mut copied = Vec::new();

        for doc in self.source_documents(report) {
            let dest = doc.destination(self.layout);
            if self.copy_if_stale(&doc.source_path, &dest, "document", report) {
                report.documents_copied += 1;
                if !self.options.dry_run {
                    copied.push(doc);
                }
            }
        }

        copied
    }

    /// Copy new or updated images into the flat images folder.
    ///
    /// Images sharing a file name across subfolders land on the same
    /// destination; the staleness rule decides which one ends up there.
    pub fn sync_media(&self, report: &mut SyncReport) {
        for media in self.source_media(report) {
            let dest = media.destination(self.layout);
            if self.copy_if_stale(&media.source_path, &dest, "image", report) {
                report.images_copied += 1;
            }
        }
    }

    /// Copy `source` to `dest` when `dest` is missing or older. Returns true
    /// when a copy happened (or would happen, in dry-run mode).
    fn copy_if_stale(
        &self,
        source: &Path,
        dest: &Path,
        kind: &str,
        report: &mut SyncReport,
    ) -> bool {
        match needs_copy(source, dest) {
            Ok(true) => {}
            Ok(false) => {
                if self.options.verbose {
                    println!("  {} Up to date: {}", "○".dimmed(), dest.display());
                }
                report.skipped += 1;
                return false;
            }
            Err(e) => {
                report.record_error(SyncError::CopyFailed {
                    from: source.to_path_buf(),
                    to: dest.to_path_buf(),
                    source: e,
                });
                return false;
            }
        }

        if self.options.dry_run {
            println!(
                "  {} Would copy {}: {} -> {}",
                "→".cyan(),
                kind,
                source.display(),
                dest.display()
            );
            return true;
        }

        if let Some(parent) = dest.parent()
            && !parent.exists()
            && let Err(e) = fs::create_dir_all(parent)
        {
            report.record_error(SyncError::DirectoryCreateFailed {
                path: parent.to_path_buf(),
                source: e,
            });
            return false;
        }

        match copy_preserving_times(source, dest) {
            Ok(()) => {
                println!(
                    "  {} Copied {}: {} -> {}",
                    "✔".green(),
                    kind,
                    source.display(),
                    dest.display()
                );
                true
            }
            Err(e) => {
                report.record_error(SyncError::CopyFailed {
                    from: source.to_path_buf(),
                    to: dest.to_path_buf(),
                    source: e,
                });
                false
            }
        }
    }

    /// Remove documents and folders from the content folder that no longer
    /// exist in the source tree.
    ///
    /// The walk is deepest first, so a folder's files are settled before the
    /// folder itself is considered. Orphaned folders go with everything in
    /// them.
    pub fn prune_documents(&self, report: &mut SyncReport) {
        let root = &self.layout.content_root;
        if !root.is_dir() {
            return;
        }

        for entry in WalkDir::new(root)
            .min_depth(1)
            .contents_first(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.record_error(SyncError::ReadFailed {
                        path: e.path().unwrap_or(root).to_path_buf(),
                        source: e.into(),
                    });
                    continue;
                }
            };

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            if self.layout.source_root.join(relative).exists() {
                continue;
            }

            if entry.file_type().is_dir() {
                if self.remove(path, true, report) {
                    report.directories_deleted += 1;
                }
            } else if self.layout.is_document(path) && self.remove(path, false, report) {
                report.documents_deleted += 1;
            }
        }
    }

    /// Remove images from the images folder whose file name no longer
    /// appears anywhere in the source tree.
    pub fn prune_media(&self, report: &mut SyncReport) {
        let keep: HashSet<OsString> = self
            .source_media(report)
            .into_iter()
            .map(|media| media.base_name)
            .collect();

        let root = &self.layout.images_root;
        if !root.is_dir() {
            return;
        }

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                report.record_error(SyncError::ReadFailed {
                    path: root.to_path_buf(),
                    source: e,
                });
                return;
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_ok_and(|t| !t.is_dir()) {
                        files.push((entry.file_name(), entry.path()));
                    }
                }
                Err(e) => report.record_error(SyncError::ReadFailed {
                    path: root.to_path_buf(),
                    source: e,
                }),
            }
        }
        files.sort();

        for (name, path) in files {
            if !keep.contains(&name) && self.remove(&path, false, report) {
                report.images_deleted += 1;
            }
        }
    }

    fn remove(&self, path: &Path, recursive: bool, report: &mut SyncReport) -> bool {
        let what = if recursive { "directory" } else { "file" };

        if self.options.dry_run {
            println!("  {} Would delete {}: {}", "→".cyan(), what, path.display());
            return true;
        }

        let result = if recursive {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };

        match result {
            Ok(()) => {
                println!("  {} Deleted {}: {}", "✔".green(), what, path.display());
                true
            }
            Err(e) => {
                report.record_error(SyncError::DeleteFailed {
                    path: path.to_path_buf(),
                    source: e,
                });
                false
            }
        }
    }
}
