//! Integration tests for error handling and exit codes.
//!
//! These tests verify that strata returns the documented exit codes:
//! - Exit code 0: Success
//! - Exit code 1: Validation or semantic failure
//! - Exit code 2: Missing required environment variable
//! - Exit code 3: Parse error
//! - Exit code 4: Invalid arguments or loader options
//! - Exit code 5: I/O error (including missing paths in strict mode)
//! - Exit code 6: Other library errors
//!
//! Each test verifies both the exit code and the error message.

mod common;

use common::TestEnv;
use predicates::prelude::*;

// ============================================================================
// Success Cases (Exit Code 0)
// ============================================================================

#[test]
fn test_success_exit_code() {
    let env = TestEnv::new();
    env.write("configs/app.yaml", "name: demo\n");

    env.command().arg("load").assert().code(0);
    env.command().arg("check").assert().code(0);
    env.command().arg("sources").assert().code(0);
}

// ============================================================================
// Missing Environment (Exit Code 2)
// ============================================================================

#[test]
fn test_missing_required_env_exit_code() {
    let env = TestEnv::new();

    env.command()
        .env_remove("STRATA_TEST_API_KEY")
        .args(["--require", "STRATA_TEST_API_KEY", "check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("STRATA_TEST_API_KEY"));
}

/// The required-variable check runs before any config file is parsed, so a
/// broken fragment does not mask the missing variable.
#[test]
fn test_missing_env_reported_before_parse_error() {
    let env = TestEnv::new();
    env.write("configs/broken.yaml", "key: [unclosed\n");

    env.command()
        .env_remove("STRATA_TEST_API_KEY")
        .args(["--require", "STRATA_TEST_API_KEY", "load"])
        .assert()
        .code(2);
}

// ============================================================================
// Parse Errors (Exit Code 3)
// ============================================================================

#[test]
fn test_yaml_parse_error_exit_code() {
    let env = TestEnv::new();
    env.write("configs/broken.yaml", "key: [unclosed\n");

    env.command()
        .arg("load")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("YAML"))
        .stderr(predicate::str::contains("broken.yaml"));
}

#[test]
fn test_non_mapping_document_exit_code() {
    let env = TestEnv::new();
    env.write("configs/list.yaml", "- a\n- b\n");

    env.command()
        .arg("load")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("mapping"));
}

#[test]
fn test_dotenv_parse_error_hides_line_contents() {
    let env = TestEnv::new();
    env.write(".env", "GOOD=1\nthis is not valid s3cr3t\n");

    env.command()
        .arg("check")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("dotenv"))
        .stderr(predicate::str::contains("s3cr3t").not());
}

// ============================================================================
// Invalid Arguments (Exit Code 4 or clap's 2)
// ============================================================================

#[test]
fn test_empty_required_name_exit_code() {
    let env = TestEnv::new();

    env.command()
        .args(["--require", "", "check"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("required_envs"));
}

#[test]
fn test_malformed_override_rejected_by_parser() {
    let env = TestEnv::new();

    env.command()
        .args(["--set", "novalue", "load"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_unknown_subcommand() {
    let env = TestEnv::new();
    env.command().arg("reserve").assert().failure();
}

// ============================================================================
// I/O and Missing Paths (Exit Code 5)
// ============================================================================

#[test]
fn test_strict_missing_config_dir_exit_code() {
    let env = TestEnv::new();

    env.command()
        .args(["--warn", "strict", "--env-file", ".env.none", "load"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_warn_mode_missing_paths_still_succeed() {
    let env = TestEnv::new();

    env.command()
        .args(["--warn", "warn", "load"])
        .assert()
        .success()
        .stderr(predicate::str::contains("configs"));
}
