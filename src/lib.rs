//! blogsync - Obsidian to Hugo publishing
//!
//! Mirrors a tree of Markdown notes into a Hugo content folder and their
//! images into a flat static images folder. Only new or updated files are
//! copied, destination entries without a source are removed, and fresh
//! copies get their image links and YouTube embeds rewritten for Hugo.

pub mod assets;
pub mod config;
pub mod error;
pub mod fs;
pub mod init;
pub mod links;
pub mod pipeline;
pub mod reconcile;
pub mod video;

pub use config::{Config, Layout};
pub use error::SyncError;
pub use pipeline::Publisher;
pub use reconcile::{Reconciler, SyncOptions, SyncReport};
