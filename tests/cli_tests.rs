//! Integration tests for CLI

use assert_cmd::Command;
use lec::store::ContextCache;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn lec(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lec"));
    cmd.arg("--root").arg(root);
    cmd
}

fn sample_project() -> TempDir {
    let tmp = TempDir::new().expect("temp project");
    let root = tmp.path();
    fs::create_dir_all(root.join("core")).expect("mkdir core");
    fs::create_dir_all(root.join("venv/lib")).expect("mkdir venv");
    fs::write(root.join("main.py"), "def main():\n    run()\n").expect("write main");
    fs::write(root.join("core/engine.py"), "class Engine:\n    def run(self):\n        pass\n")
        .expect("write engine");
    fs::write(root.join("venv/lib/site.py"), "def hidden():\n    pass\n").expect("write venv");
    tmp
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lec"));
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("lec"));
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lec"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("context"))
        .stdout(predicate::str::contains("complete"))
        .stdout(predicate::str::contains("explain"))
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("diagnose"));
}

#[test]
fn test_init_writes_record() {
    let project = sample_project();
    lec(project.path()).arg("init").assert().success().stdout(predicate::str::contains("initialized"));

    let raw = fs::read_to_string(project.path().join(".lec/config.json")).expect("config.json");
    let record: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert!(record["initialized"].is_string());
    assert!(record["project_root"].is_string());
    assert!(project.path().join(".lec/cache").is_dir());
}

#[test]
fn test_scan_records_metadata_and_session() {
    let project = sample_project();
    lec(project.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Modules:          2"))
        .stdout(predicate::str::contains("Primary language: python"));

    let raw = fs::read_to_string(project.path().join(".lec/project_metadata.json"))
        .expect("metadata");
    let meta: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(meta["generated_summary"]["classes"], 1);
    assert_eq!(meta["entry_points"][0], "main.py");

    let map = fs::read_to_string(project.path().join(".lec/context_map.json")).expect("map");
    assert!(map.contains("__structure__"));
    assert!(!map.contains("venv/lib/site.py"));

    lec(project.path())
        .args(["session", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("* "));
}

#[test]
fn test_context_ranks_target_first_and_skips_ignored() {
    let project = sample_project();
    lec(project.path()).arg("scan").assert().success();

    let target = project.path().join("core/engine.py");
    lec(project.path())
        .arg("context")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# File: core/engine.py"))
        .stdout(predicate::str::contains("# File: main.py"))
        .stdout(predicate::str::contains("site.py").not());
}

#[test]
fn test_session_delete_unknown_reports_not_found() {
    let project = sample_project();
    lec(project.path())
        .args(["session", "delete", "deadbeef"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_session_purge_on_empty_store() {
    let project = sample_project();
    lec(project.path())
        .args(["session", "purge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 0 session(s)"));
}

#[test]
fn test_explain_serves_cached_result() {
    let project = sample_project();
    let cache = ContextCache::open(project.path().join(".lec/cache")).expect("cache");
    cache.put(&ContextCache::key_for("x = 1"), "assigns one to x").expect("put");

    lec(project.path())
        .args(["explain", "x = 1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("assigns one to x"))
        .stderr(predicate::str::contains("Using cached result"));
}

#[test]
fn test_explain_reports_missing_model_runner() {
    let project = sample_project();
    fs::write(project.path().join("lec.toml"), "[model]\nbinary = \"lec-no-such-runner\"\n")
        .expect("write config");

    lec(project.path())
        .args(["explain", "y = 2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("failed to start 'lec-no-such-runner'"));
}

#[test]
fn test_learn_records_test_feedback() {
    let project = sample_project();
    lec(project.path()).args(["learn", "test", "tests/test_a.py", "--failed"]).assert().success();

    let log = fs::read_to_string(project.path().join(".lec/learning/test_feedback.jsonl"))
        .expect("log");
    assert!(log.contains("\"result\":\"fail\""));
}
