//! Template generation for init command
//!
//! Writes a commented default configuration for a new blog.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE_NAME;

/// Default configuration template
pub const DEFAULT_CONFIG: &str = r#"# blogsync configuration
# Publishes Obsidian notes and their images into a Hugo site.
#
# Paths are relative to this file unless absolute.

# Folder holding the notes (Markdown files and the images next to them)
source_dir = "notes"

# Hugo content folder; documents keep their subfolder structure
content_dir = "site/content/posts"

# Hugo static images folder; images are stored flat, by file name
images_dir = "site/static/images"

# URL prefix image links are rewritten to
images_url = "/images"

# Extensions synced as images (case-insensitive)
image_extensions = ["jpg", "jpeg", "png", "gif", "webp"]

# Extensions synced as documents (case-insensitive)
document_extensions = ["md"]

# Convert YouTube iframes, links and bare URLs to {{< youtube ID >}}
convert_videos = true
"#;

/// Write a default `blogsync.toml` into `project_root`
pub fn init(project_root: &Path, force: bool) -> Result<()> {
    let config_path = project_root.join(CONFIG_FILE_NAME);

    if !project_root.exists() {
        fs::create_dir_all(project_root).with_context(|| {
            format!("Failed to create directory: {}", project_root.display())
        })?;
        println!(
            "  {} Created directory: {}",
            "✔".green(),
            project_root.display()
        );
    }

    if config_path.exists() && !force {
        println!(
            "  {} Config already exists: {} (use --force to overwrite)",
            "!".yellow(),
            config_path.display()
        );
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        println!("  {} Created: {}", "✔".green(), config_path.display());
    }

    Ok(())
}
