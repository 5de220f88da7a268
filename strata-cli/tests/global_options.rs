//! Integration tests for the global loader options.
//!
//! These cover `--config-dir`, `--env-file`, `--extra-dir` and its
//! `STRATA_EXTRA_DIR` fallback, `--require`, `--set`, and the log flags.

mod common;

use common::TestEnv;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_config_dir_order_is_merge_order() {
    let env = TestEnv::new();
    env.write("one/app.json", r#"{"who": "one", "only_one": 1}"#);
    env.write("two/app.json", r#"{"who": "two"}"#);

    let forward = env.load_json(&["--config-dir", "one", "--config-dir", "two"]);
    let reversed = env.load_json(&["--config-dir", "two", "--config-dir", "one"]);

    assert_eq!(forward, json!({"who": "two", "only_one": 1}));
    assert_eq!(reversed, json!({"who": "one", "only_one": 1}));
}

#[test]
fn test_extra_dir_from_environment() {
    let env = TestEnv::new();
    env.write("configs/app.yaml", "mode: base\n");
    let extra = env.create_dir("overlay");
    env.write("overlay/app.yaml", "mode: overlay\n");

    let output = env
        .command()
        .env("STRATA_EXTRA_DIR", &extra)
        .args(["load", "--key", "mode"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "\"overlay\"\n");
}

#[test]
fn test_extra_dir_flag_beats_environment() {
    let env = TestEnv::new();
    env.write("configs/app.yaml", "mode: base\n");
    env.write("flag/app.yaml", "mode: flag\n");
    env.write("envvar/app.yaml", "mode: envvar\n");

    env.command()
        .env("STRATA_EXTRA_DIR", env.path().join("envvar"))
        .args(["--extra-dir", "flag", "load", "--key", "mode"])
        .assert()
        .success()
        .stdout("\"flag\"\n");
}

#[test]
fn test_env_file_satisfies_requirement() {
    let env = TestEnv::new();
    env.write("secrets.env", "STRATA_TEST_TOKEN=abc123\n");

    env.command()
        .env_remove("STRATA_TEST_TOKEN")
        .args([
            "--env-file",
            "secrets.env",
            "--require",
            "STRATA_TEST_TOKEN",
            "check",
        ])
        .assert()
        .success();
}

#[test]
fn test_default_dotenv_is_loaded() {
    let env = TestEnv::new();
    env.write(".env", "STRATA_TEST_TOKEN=from-default\n");

    env.command()
        .env_remove("STRATA_TEST_TOKEN")
        .args(["--require", "STRATA_TEST_TOKEN", "check"])
        .assert()
        .success();
}

#[test]
fn test_dotenv_can_set_extra_dir() {
    let env = TestEnv::new();
    env.write("configs/app.yaml", "mode: base\n");
    env.write("overlay/app.yaml", "mode: overlay\n");
    env.write(".env", "STRATA_EXTRA_DIR=overlay\n");

    env.command()
        .args(["load", "--key", "mode"])
        .assert()
        .success()
        .stdout("\"overlay\"\n");
}

#[test]
fn test_set_overrides_nested_keys() {
    let env = TestEnv::new();
    env.write("configs/app.yaml", "db:\n  host: localhost\n  port: 5432\n");
    env.write("extra/app.yaml", "db:\n  port: 6543\n");

    let tree = env.load_json(&[
        "--extra-dir",
        "extra",
        "--set",
        "db.port=7000",
        "--set",
        "db.replicas=[\"r1\", \"r2\"]",
        "--set",
        "feature.enabled=true",
        "--set",
        "name=demo",
    ]);

    assert_eq!(
        tree,
        json!({
            "db": {"host": "localhost", "port": "7000", "replicas": ["r1", "r2"]},
            "feature": {"enabled": "true"},
            "name": "demo",
        })
    );
}

#[test]
fn test_later_set_wins() {
    let env = TestEnv::new();
    let tree = env.load_json(&["--quiet", "--set", "a=1", "--set", "a=2"]);
    assert_eq!(tree, json!({"a": "2"}));
}

#[test]
fn test_quiet_suppresses_missing_path_warnings() {
    let env = TestEnv::new();

    env.command()
        .args(["--quiet", "load"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_verbose_logs_debug_records() {
    let env = TestEnv::new();
    env.write("configs/app.yaml", "a: 1\n");

    env.command()
        .args(["--verbose", "load"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn test_log_mode_environment_variable() {
    let env = TestEnv::new();

    env.command()
        .env("STRATA_LOG_MODE", "quiet")
        .arg("load")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
