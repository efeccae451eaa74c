use anyhow::Result;
use blogsync::assets::AssetResolver;
use blogsync::links::find_image_links;
use blogsync::reconcile::MediaEntry;
use blogsync::{Layout, Reconciler, SyncOptions, SyncReport};
use colored::Colorize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Conflict {
    /// Two roots are the same folder
    Same(String, String),
    /// `child` lives inside `parent`
    Nested { parent: String, child: String },
}

pub fn run_doctor(layout: &Layout, config_path: Option<&Path>) -> Result<()> {
    println!("{}", "🩺 Running blogsync diagnostic...".bold().cyan());

    let mut issues = 0;

    match config_path {
        Some(path) => println!(
            "  {} Using config: {}",
            "✔".green(),
            path.display().to_string().dimmed()
        ),
        None => println!("  {} Using paths from the command line", "✔".green()),
    }

    // 1. Source tree
    if layout.source_root.is_dir() {
        println!(
            "  {} Source directory exists: {}",
            "✔".green(),
            layout.source_root.display().to_string().dimmed()
        );
    } else {
        println!(
            "  {} Source directory does not exist: {}",
            "✗".red(),
            layout.source_root.display()
        );
        issues += 1;
    }

    // 2. Destination roots
    for (name, root) in [
        ("Content", &layout.content_root),
        ("Images", &layout.images_root),
    ] {
        if root.is_dir() {
            println!(
                "  {} {} directory exists: {}",
                "✔".green(),
                name,
                root.display().to_string().dimmed()
            );
        } else if root.exists() {
            println!(
                "  {} {} path is not a directory: {}",
                "✗".red(),
                name,
                root.display()
            );
            issues += 1;
        } else {
            println!(
                "  {} {} directory will be created: {}",
                "⚠".yellow(),
                name,
                root.display()
            );
        }
    }

    // 3. Overlapping roots
    let roots = [
        ("source_dir", layout.source_root.as_path()),
        ("content_dir", layout.content_root.as_path()),
        ("images_dir", layout.images_root.as_path()),
    ];
    for conflict in validate_roots(&roots) {
        match conflict {
            Conflict::Same(a, b) => println!(
                "  {} {} and {} point at the same folder",
                "✗".red(),
                a.bold(),
                b.bold()
            ),
            Conflict::Nested { parent, child } => println!(
                "  {} {} is inside {}",
                "✗".red(),
                child.bold(),
                parent.bold()
            ),
        }
        issues += 1;
    }

    if !layout.source_root.is_dir() {
        return finish(issues);
    }

    let options = SyncOptions::default();
    let reconciler = Reconciler::new(layout, &options);
    let mut report = SyncReport::default();

    // 4. Image file name collisions
    let collisions = find_basename_collisions(&reconciler.source_media(&mut report));
    for (name, paths) in &collisions {
        println!(
            "  {} {} images share the name {} (only one is published):",
            "⚠".yellow(),
            paths.len(),
            name.to_string_lossy().bold()
        );
        for path in paths {
            println!("    - {}", path.display());
        }
    }
    if collisions.is_empty() {
        println!("  {} No image name collisions", "✔".green());
    }

    // 5. Broken image references
    let mut broken = 0;
    for doc in reconciler.source_documents(&mut report) {
        let Ok(text) = fs::read_to_string(&doc.source_path) else {
            println!(
                "  {} Could not read: {}",
                "✗".red(),
                doc.source_path.display()
            );
            issues += 1;
            continue;
        };
        for missing in missing_image_links(&text, doc.source_dir()) {
            println!(
                "  {} {} references missing image: {}",
                "⚠".yellow(),
                doc.relative_path.display(),
                missing.display()
            );
            broken += 1;
        }
    }
    if broken == 0 {
        println!("  {} All image references resolve", "✔".green());
    }

    issues += report.errors;
    finish(issues)
}

fn finish(issues: usize) -> Result<()> {
    if issues > 0 {
        println!("\n{} {} problems found", "✗".red(), issues);
        std::process::exit(1);
    }
    println!("\n{}", "✨ No problems found".green().bold());
    Ok(())
}

/// Find pairs of roots that coincide or nest inside one another
pub(crate) fn validate_roots(roots: &[(&str, &Path)]) -> Vec<Conflict> {
    let normalized: Vec<(&str, PathBuf)> = roots
        .iter()
        .map(|(name, path)| (*name, normalize_path(path)))
        .collect();

    let mut conflicts = Vec::new();
    for (i, (a_name, a)) in normalized.iter().enumerate() {
        for (b_name, b) in &normalized[i + 1..] {
            if a == b {
                conflicts.push(Conflict::Same(a_name.to_string(), b_name.to_string()));
            } else if b.starts_with(a) {
                conflicts.push(Conflict::Nested {
                    parent: a_name.to_string(),
                    child: b_name.to_string(),
                });
            } else if a.starts_with(b) {
                conflicts.push(Conflict::Nested {
                    parent: b_name.to_string(),
                    child: a_name.to_string(),
                });
            }
        }
    }
    conflicts
}

/// Canonical form when the path exists, lexical cleanup otherwise
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }

    use std::path::Component;
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Image file names that appear more than once in the source tree
pub(crate) fn find_basename_collisions(media: &[MediaEntry]) -> Vec<(OsString, Vec<PathBuf>)> {
    let mut by_name: BTreeMap<&OsString, Vec<PathBuf>> = BTreeMap::new();
    for entry in media {
        by_name
            .entry(&entry.base_name)
            .or_default()
            .push(entry.source_path.clone());
    }

    by_name
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(name, paths)| (name.clone(), paths))
        .collect()
}

/// Source paths of image references in `text` that do not exist
pub(crate) fn missing_image_links(text: &str, document_dir: &Path) -> Vec<PathBuf> {
    find_image_links(text)
        .into_iter()
        .map(|link| AssetResolver::source_path(document_dir, link.target))
        .filter(|path| !path.exists())
        .collect()
}
