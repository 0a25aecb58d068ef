//! se.toml handling as seen from the commands

mod common;

use common::{FakeRunner, add_source_images, create_ebook, run_se};
use se::config::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_tool_overrides_are_used() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_ebook(&temp_dir.path().join("ebook"));
    add_source_images(&root);
    fs::write(
        root.join("se.toml"),
        "[tools]\nepubcheck = \"epubcheck-5\"\n",
    )
    .unwrap();
    let out = temp_dir.path().join("out");

    let runner = FakeRunner::new().installed(&["epubcheck"]);
    let outcome = run_se(
        &["build", "-c", "-o", out.to_str().unwrap(), root.to_str().unwrap()],
        &runner,
    );
    assert_eq!(outcome.code, 3);
    assert!(outcome.stderr.contains("epubcheck-5"));

    let runner = FakeRunner::new().installed(&["epubcheck-5"]);
    let outcome = run_se(
        &["build", "-c", "-o", out.to_str().unwrap(), root.to_str().unwrap()],
        &runner,
    );
    assert_eq!(outcome.code, 0, "{}", outcome.stderr);
    assert_eq!(runner.calls_to("epubcheck-5").len(), 1);
}

#[test]
fn test_unknown_keys_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_ebook(&temp_dir.path().join("ebook"));
    fs::write(root.join("se.toml"), "[lint]\nignored = [\"x\"]\n").unwrap();

    let outcome = run_se(&["lint", root.to_str().unwrap()], &FakeRunner::new());

    assert_eq!(outcome.code, 4);
    assert!(outcome.stderr.contains("Configuration error"));
}

#[test]
fn test_missing_file_means_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_or_default(temp_dir.path()).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.tools.git, "git");
}
