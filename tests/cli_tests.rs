//! End-to-End CLI Tests for blogsync
//!
//! These tests verify the complete CLI behavior by running the binary
//! and checking outputs and file system changes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn blogsync_cmd() -> Command {
    let mut cmd = Command::cargo_bin("blogsync").unwrap();
    cmd.env_remove("BLOGSYNC_SOURCE")
        .env_remove("BLOGSYNC_CONTENT")
        .env_remove("BLOGSYNC_IMAGES")
        .env_remove("RUST_LOG");
    cmd
}

fn setup_blog_with_config(temp_dir: &TempDir) {
    let notes = temp_dir.path().join("notes");
    fs::create_dir_all(notes.join("Book summary")).unwrap();

    fs::write(
        notes.join("Book summary/atomic habits.md"),
        "# Atomic Habits\n\n[Page 1](img25.jpg)\n\n[Watch](https://youtu.be/XYZ789)\n",
    )
    .unwrap();
    fs::write(notes.join("Book summary/img25.jpg"), "jpeg").unwrap();
    fs::write(notes.join("cover.png"), "png").unwrap();

    let config = r#"
        source_dir = "notes"
        content_dir = "site/content/posts"
        images_dir = "site/static/images"
    "#;
    fs::write(temp_dir.path().join("blogsync.toml"), config).unwrap();
}

// =============================================================================
// INIT COMMAND TESTS
// =============================================================================

#[test]
fn test_cli_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();

    blogsync_cmd()
        .arg("init")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"))
        .stdout(predicate::str::contains("blogsync sync"));

    assert!(temp_dir.path().join("blogsync.toml").exists());
}

#[test]
fn test_cli_init_without_force_warns_existing() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("blogsync.toml"), "# mine").unwrap();

    blogsync_cmd()
        .arg("init")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("blogsync.toml")).unwrap(),
        "# mine"
    );
}

// =============================================================================
// SYNC COMMAND TESTS
// =============================================================================

#[test]
fn test_cli_sync_publishes_blog() {
    let temp_dir = TempDir::new().unwrap();
    setup_blog_with_config(&temp_dir);

    blogsync_cmd()
        .arg("sync")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied document"))
        .stdout(predicate::str::contains("Sync and processing complete"));

    let post = temp_dir
        .path()
        .join("site/content/posts/Book summary/atomic habits.md");
    assert_eq!(
        fs::read_to_string(post).unwrap(),
        "# Atomic Habits\n\n[Page 1](/images/img25.jpg)\n\n{{< youtube XYZ789 >}}\n"
    );
    assert!(temp_dir.path().join("site/static/images/img25.jpg").exists());
    assert!(temp_dir.path().join("site/static/images/cover.png").exists());
}

#[test]
fn test_cli_sync_with_explicit_config() {
    let temp_dir = TempDir::new().unwrap();
    setup_blog_with_config(&temp_dir);

    blogsync_cmd()
        .arg("sync")
        .arg("--config")
        .arg(temp_dir.path().join("blogsync.toml"))
        .assert()
        .success();

    assert!(temp_dir.path().join("site/content/posts").is_dir());
}

#[test]
fn test_cli_sync_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    setup_blog_with_config(&temp_dir);

    blogsync_cmd()
        .arg("sync")
        .arg("--path")
        .arg(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("dry-run"))
        .stdout(predicate::str::contains("Would copy"));

    assert!(!temp_dir.path().join("site").exists());
}

#[test]
fn test_cli_sync_json_summary() {
    let temp_dir = TempDir::new().unwrap();
    setup_blog_with_config(&temp_dir);

    let output = blogsync_cmd()
        .arg("sync")
        .arg("--path")
        .arg(temp_dir.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let json_start = stdout.rfind("{\n").unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    assert_eq!(report["documents_copied"], 1);
    assert_eq!(report["documents_rewritten"], 1);
    assert_eq!(report["errors"], 0);
}

#[test]
fn test_cli_sync_second_run_copies_nothing() {
    let temp_dir = TempDir::new().unwrap();
    setup_blog_with_config(&temp_dir);

    blogsync_cmd()
        .arg("sync")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success();

    blogsync_cmd()
        .arg("sync")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied document").not())
        .stdout(predicate::str::contains("Copied image").not())
        .stdout(predicate::str::contains("Updated links").not())
        .stdout(predicate::str::contains("Deleted file").not())
        .stdout(predicate::str::contains("Deleted directory").not());
}

#[test]
fn test_cli_sync_verbose_marks_skips_as_up_to_date() {
    let temp_dir = TempDir::new().unwrap();
    setup_blog_with_config(&temp_dir);

    blogsync_cmd()
        .arg("sync")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success();

    blogsync_cmd()
        .env("NO_COLOR", "1")
        .arg("sync")
        .arg("--path")
        .arg(temp_dir.path())
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("○ Up to date"))
        .stdout(predicate::str::contains("✔ Up to date").not());
}

#[test]
fn test_cli_sync_with_path_flags_only() {
    let temp_dir = TempDir::new().unwrap();
    let notes = temp_dir.path().join("vault");
    fs::create_dir_all(&notes).unwrap();
    fs::write(notes.join("post.md"), "hello").unwrap();

    blogsync_cmd()
        .arg("sync")
        .arg("--source")
        .arg(&notes)
        .arg("--content")
        .arg(temp_dir.path().join("out/content"))
        .arg("--images")
        .arg(temp_dir.path().join("out/images"))
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("out/content/post.md")).unwrap(),
        "hello"
    );
}

#[test]
fn test_cli_sync_missing_source_exits_cleanly() {
    let temp_dir = TempDir::new().unwrap();

    blogsync_cmd()
        .arg("sync")
        .arg("--source")
        .arg(temp_dir.path().join("nope"))
        .arg("--content")
        .arg(temp_dir.path().join("content"))
        .arg("--images")
        .arg(temp_dir.path().join("images"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Source directory does not exist"));

    assert!(!temp_dir.path().join("content").exists());
}

#[test]
fn test_cli_sync_without_config_fails() {
    let temp_dir = TempDir::new().unwrap();

    blogsync_cmd()
        .arg("sync")
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

// =============================================================================
// DOCTOR COMMAND TESTS
// =============================================================================

#[test]
fn test_cli_doctor_healthy_blog() {
    let temp_dir = TempDir::new().unwrap();
    setup_blog_with_config(&temp_dir);

    blogsync_cmd()
        .arg("doctor")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found"));
}

#[test]
fn test_cli_doctor_reports_missing_source() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("blogsync.toml"),
        "source_dir = \"nope\"\ncontent_dir = \"c\"\nimages_dir = \"i\"\n",
    )
    .unwrap();

    blogsync_cmd()
        .arg("doctor")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Source directory does not exist"));
}

#[test]
fn test_cli_doctor_warns_on_collisions_and_broken_links() {
    let temp_dir = TempDir::new().unwrap();
    setup_blog_with_config(&temp_dir);
    let notes = temp_dir.path().join("notes");
    fs::create_dir_all(notes.join("other")).unwrap();
    fs::write(notes.join("other/cover.png"), "png").unwrap();
    fs::write(notes.join("other/post.md"), "[x](missing.jpg)").unwrap();

    blogsync_cmd()
        .arg("doctor")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("share the name"))
        .stdout(predicate::str::contains("missing image"));
}
