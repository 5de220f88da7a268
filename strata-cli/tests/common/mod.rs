//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with a temporary project directory
//! - Command builder helpers that isolate the process environment
//! - Helpers for writing config fragments and dotenv files

use assert_cmd::Command;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Variables that would leak host state into a test run.
const ISOLATED_VARS: &[&str] = &["STRATA_EXTRA_DIR", "STRATA_LOG_MODE"];

/// Test environment with an isolated project directory.
///
/// Commands run with the project directory as their working directory, so
/// the default `configs` directory and `.env` file resolve inside it.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary project directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new, empty project.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            temp_path,
        }
    }

    /// A command for the strata binary, run inside the project with host
    /// strata variables removed.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("strata").expect("Failed to find strata binary");
        cmd.current_dir(&self.temp_path);
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get the project path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Create a subdirectory in the project and return its path.
    pub fn create_dir(&self, name: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::create_dir_all(&path).expect("Failed to create test directory");
        path
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Run `strata load --format json` with `args` before the subcommand and
    /// parse the output.
    ///
    /// # Panics
    /// Panics if the command fails or prints invalid JSON.
    pub fn load_json(&self, args: &[&str]) -> Value {
        let output = self
            .command()
            .args(args)
            .args(["load", "--format", "json"])
            .output()
            .expect("Failed to run load command");

        assert!(
            output.status.success(),
            "load failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("load printed invalid JSON")
    }
}
