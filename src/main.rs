//! blogsync CLI
//!
//! Command-line interface for publishing Obsidian notes into a Hugo site.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use blogsync::{Config, Layout, Publisher, SyncError, SyncOptions, init};

#[derive(Parser)]
#[command(name = "blogsync")]
#[command(
    author,
    version,
    about = "Publish Obsidian notes and images into a Hugo site"
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default blogsync.toml
    Init {
        /// Directory to create the configuration in (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Copy new and updated notes and images, rewrite links, remove deleted files
    Sync {
        #[command(flatten)]
        location: LocationArgs,

        /// Show what would be done without making changes
        #[arg(long)]
        dry_run: bool,

        /// Show detailed output
        #[arg(short, long)]
        verbose: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check configuration and source tree for problems
    Doctor {
        #[command(flatten)]
        location: LocationArgs,
    },
}

/// Where the configuration comes from
#[derive(Args, Debug, Default)]
struct LocationArgs {
    /// Directory to search for blogsync.toml (default: current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Notes source folder (overrides config)
    #[arg(long, env = "BLOGSYNC_SOURCE")]
    source: Option<PathBuf>,

    /// Hugo content folder (overrides config)
    #[arg(long, env = "BLOGSYNC_CONTENT")]
    content: Option<PathBuf>,

    /// Hugo static images folder (overrides config)
    #[arg(long, env = "BLOGSYNC_IMAGES")]
    images: Option<PathBuf>,
}

impl LocationArgs {
    /// Build the run layout, returning the config file it came from if any.
    ///
    /// With all three folders given on the command line no config file is
    /// needed.
    fn resolve(self) -> Result<(Layout, Option<PathBuf>)> {
        if self.config.is_none()
            && let (Some(source), Some(content), Some(images)) =
                (&self.source, &self.content, &self.images)
        {
            return Ok((Layout::new(source, content, images), None));
        }

        let config_path = match self.config {
            Some(p) => p,
            None => {
                let start_dir = match self.path {
                    Some(p) => p,
                    None => env::current_dir().context("Failed to get current directory")?,
                };
                Config::find_config(&start_dir)?
            }
        };

        let config = Config::load(&config_path)?;
        let mut layout = Layout::from_config(&config, &config_path);
        if let Some(source) = self.source {
            layout.source_root = source;
        }
        if let Some(content) = self.content {
            layout.content_root = content;
        }
        if let Some(images) = self.images {
            layout.images_root = images;
        }

        Ok((layout, Some(config_path)))
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force } => {
            init_logging(false);
            let project_root = match path {
                Some(p) => p,
                None => env::current_dir().context("Failed to get current directory")?,
            };

            print_header();
            println!("{}", "Initializing blogsync configuration...\n".cyan());

            init::init(&project_root, force)?;

            println!("\n{}", "✨ Initialization complete!".green().bold());
            println!(
                "\nNext steps:\n  1. Edit {} with your notes and Hugo folders\n  2. Run {} to publish",
                "blogsync.toml".cyan(),
                "blogsync sync".cyan()
            );
        }

        Commands::Sync {
            location,
            dry_run,
            verbose,
            json,
        } => {
            init_logging(verbose);
            let (layout, config_path) = location.resolve()?;

            if !json {
                print_header();
            }
            if verbose && let Some(path) = &config_path {
                println!("Using config: {}\n", path.display().to_string().dimmed());
            }

            let publisher = Publisher::new(layout);
            let options = SyncOptions { dry_run, verbose };

            let report = match publisher.run(&options) {
                Ok(report) => report,
                Err(e @ SyncError::SourceUnavailable(_)) => {
                    println!("{} {}", "!".yellow(), e);
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("\n{}", "✨ Sync and processing complete!".green().bold());
            println!(
                "  Copied: {} documents, {} images; Rewritten: {}; Skipped: {}",
                report.documents_copied.to_string().green(),
                report.images_copied.to_string().green(),
                report.documents_rewritten.to_string().yellow(),
                report.skipped.to_string().dimmed()
            );
            println!(
                "  Deleted: {} documents, {} directories, {} images; Missing images: {}; Errors: {}",
                report.documents_deleted.to_string().green(),
                report.directories_deleted.to_string().green(),
                report.images_deleted.to_string().green(),
                if report.missing_assets > 0 {
                    report.missing_assets.to_string().yellow()
                } else {
                    report.missing_assets.to_string().dimmed()
                },
                if report.errors > 0 {
                    report.errors.to_string().red()
                } else {
                    report.errors.to_string().dimmed()
                }
            );
        }

        Commands::Doctor { location } => {
            init_logging(false);
            let (layout, config_path) = location.resolve()?;
            commands::doctor::run_doctor(&layout, config_path.as_deref())?;
        }
    }

    Ok(())
}

fn print_header() {
    println!(
        "{}",
        r#"
╔═══════════════════════════════════════════════════════════════════╗
║                          blogsync                                 ║
║              Obsidian notes to Hugo publishing                    ║
╚═══════════════════════════════════════════════════════════════════╝
"#
        .cyan()
        .bold()
    );
}
