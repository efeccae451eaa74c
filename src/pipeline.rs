//! Publishing pipeline
//!
//! Runs the reconciliation phases in their fixed order and rewrites every
//! freshly copied document in between.

use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::config::Layout;
use crate::error::SyncError;
use crate::links::AssetLinkRewriter;
use crate::reconcile::{DocumentEntry, Reconciler, SyncOptions, SyncReport};
use crate::video::convert_video_embeds;

/// Publishes a notes tree into a Hugo site
pub struct Publisher {
    layout: Layout,
}

impl Publisher {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Perform a full sync.
    ///
    /// Phases: copy documents (rewriting fresh copies), copy images, remove
    /// deleted documents, remove deleted images. Fails only when the source
    /// root is missing or a destination root cannot be created; anything
    /// else is counted in the returned report.
    pub fn run(&self, options: &SyncOptions) -> Result<SyncReport, SyncError> {
        let layout = &self.layout;
        if !layout.source_root.is_dir() {
            return Err(SyncError::SourceUnavailable(layout.source_root.clone()));
        }

        if options.dry_run {
            println!("{}", "Running in dry-run mode\n".cyan());
        } else {
            for root in [&layout.content_root, &layout.images_root] {
                fs::create_dir_all(root).map_err(|e| SyncError::DirectoryCreateFailed {
                    path: root.clone(),
                    source: e,
                })?;
            }
        }

        let reconciler = Reconciler::new(layout, options);
        let mut report = SyncReport::default();

        println!("{}", "➤ Syncing documents".cyan().bold());
        for doc in reconciler.sync_documents(&mut report) {
            self.process_document(&doc, options, &mut report);
        }

        println!("\n{}", "➤ Syncing images".cyan().bold());
        reconciler.sync_media(&mut report);

        println!("\n{}", "➤ Removing deleted documents".cyan().bold());
        reconciler.prune_documents(&mut report);

        println!("\n{}", "➤ Removing deleted images".cyan().bold());
        reconciler.prune_media(&mut report);

        Ok(report)
    }

    /// Rewrite a document's copy in the content folder.
    ///
    /// The copy is left as is when neither pass changes anything, so its
    /// modification time keeps matching the source.
    pub fn process_document(
        &self,
        doc: &DocumentEntry,
        options: &SyncOptions,
        report: &mut SyncReport,
    ) {
        let dest = doc.destination(&self.layout);

        let original = match fs::read_to_string(&dest) {
            Ok(content) => content,
            Err(e) => {
                report.record_error(SyncError::ReadFailed {
                    path: dest,
                    source: e,
                });
                return;
            }
        };

        let rewritten = self.rewrite_text(&original, doc.source_dir(), report);
        if rewritten == original {
            if options.verbose {
                println!("    {} No links to update", "○".dimmed());
            }
            return;
        }

        match fs::write(&dest, rewritten) {
            Ok(()) => {
                println!("    {} Updated links: {}", "✔".green(), dest.display());
                report.documents_rewritten += 1;
            }
            Err(e) => report.record_error(SyncError::WriteFailed {
                path: dest,
                source: e,
            }),
        }
    }

    /// Apply the video pass, then the image link pass
    pub fn rewrite_text(&self, text: &str, document_dir: &Path, report: &mut SyncReport) -> String {
        let converted = if self.layout.convert_videos {
            convert_video_embeds(text)
        } else {
            text.to_string()
        };

        AssetLinkRewriter::new(&self.layout)
            .rewrite(&converted, document_dir, report)
            .text
    }
}
