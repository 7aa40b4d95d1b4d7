//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory with a shiprun.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("shiprun.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a test config with a subdirectory to run from
pub fn create_test_config_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let (temp_dir, config_path) = create_test_config(content);
    let sub_dir = temp_dir.path().join("subdir");
    fs::create_dir(&sub_dir).unwrap();
    (temp_dir, config_path, sub_dir)
}

/// Lines appended to `log.txt` by test commands, in order
pub fn read_log(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("log.txt"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Task file for the render/lint/publish/release scenario.
///
/// Every command appends its task name to `log.txt`.
pub const RELEASE_CONFIG: &str = r#"
usage: Release pipeline under test
tasks:
  render:
    usage: Render cog.yaml
    run: echo render >> log.txt
  lint:
    usage: Format sources
    run: echo lint >> log.txt
  publish:
    usage: Publish the model
    deps: [render]
    run: echo "publish ${DESTINATION}" >> log.txt
  release:
    usage: Lint, render and publish
    deps: [lint, publish]
"#;
