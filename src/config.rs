//! Configuration parsing for blogsync
//!
//! Handles the TOML configuration file that names the notes source tree,
//! the Hugo content folder and the flat Hugo images folder.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "blogsync.toml";

/// Image extensions synced into the flat images folder by default
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Document extensions mirrored into the content folder by default
pub const DEFAULT_DOCUMENT_EXTENSIONS: [&str; 1] = ["md"];

/// URL prefix the rewritten image links point at
pub const DEFAULT_IMAGES_URL: &str = "/images";

/// Root configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Notes source tree (relative to config file)
    pub source_dir: String,

    /// Hugo content folder receiving the documents, subfolders preserved
    pub content_dir: String,

    /// Hugo static images folder receiving the images, flattened
    pub images_dir: String,

    /// Extensions treated as images
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Extensions treated as documents
    #[serde(default = "default_document_extensions")]
    pub document_extensions: Vec<String>,

    /// URL prefix used when rewriting image links
    #[serde(default = "default_images_url")]
    pub images_url: String,

    /// Whether YouTube links and iframes are converted to Hugo shortcodes
    #[serde(default = "default_true")]
    pub convert_videos: bool,
}

fn default_image_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_document_extensions() -> Vec<String> {
    DEFAULT_DOCUMENT_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_images_url() -> String {
    DEFAULT_IMAGES_URL.to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Find configuration file by searching up from the start directory
    pub fn find_config(start_dir: &Path) -> Result<PathBuf> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(config_path);
            }

            if !current.pop() {
                anyhow::bail!(
                    "Could not find {} in {} or any parent directory",
                    CONFIG_FILE_NAME,
                    start_dir.display()
                );
            }
        }
    }

    /// Directory relative paths in the config are resolved against
    pub fn base_dir(config_path: &Path) -> PathBuf {
        config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

/// Resolved settings for a single run.
///
/// Built once from a [`Config`] (or directly from paths) and handed by
/// reference to every component of the pipeline.
#[derive(Debug, Clone)]
pub struct Layout {
    pub source_root: PathBuf,
    pub content_root: PathBuf,
    pub images_root: PathBuf,
    pub image_extensions: HashSet<String>,
    pub document_extensions: HashSet<String>,
    pub images_url: String,
    pub convert_videos: bool,
}

impl Layout {
    /// Layout with default extensions and URL prefix
    pub fn new(
        source_root: impl Into<PathBuf>,
        content_root: impl Into<PathBuf>,
        images_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            content_root: content_root.into(),
            images_root: images_root.into(),
            image_extensions: normalize_extensions(&DEFAULT_IMAGE_EXTENSIONS),
            document_extensions: normalize_extensions(&DEFAULT_DOCUMENT_EXTENSIONS),
            images_url: DEFAULT_IMAGES_URL.to_string(),
            convert_videos: true,
        }
    }

    /// Resolve a parsed config relative to the file it was loaded from
    pub fn from_config(config: &Config, config_path: &Path) -> Self {
        let base = Config::base_dir(config_path);

        Self {
            source_root: base.join(&config.source_dir),
            content_root: base.join(&config.content_dir),
            images_root: base.join(&config.images_dir),
            image_extensions: normalize_extensions(&config.image_extensions),
            document_extensions: normalize_extensions(&config.document_extensions),
            images_url: config.images_url.trim_end_matches('/').to_string(),
            convert_videos: config.convert_videos,
        }
    }

    /// Whether the path carries one of the configured image extensions
    pub fn is_image(&self, path: &Path) -> bool {
        has_extension(path, &self.image_extensions)
    }

    /// Whether the path carries one of the configured document extensions
    pub fn is_document(&self, path: &Path) -> bool {
        has_extension(path, &self.document_extensions)
    }
}

fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> HashSet<String> {
    extensions
        .iter()
        .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

fn has_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_lowercase()))
}
