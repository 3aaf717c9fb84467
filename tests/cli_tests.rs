//! CLI integration tests
//!
//! Run the built binary end to end against temp directories. Network
//! commands are only exercised on their offline failure paths.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn wui() -> Command {
    let mut cmd = Command::cargo_bin("wui").unwrap();
    // Keep the process hermetic: no ambient token or tuning.
    cmd.env_remove("WUI_TOKEN")
        .env_remove("STALE_THRESHOLD_DAYS")
        .env_remove("MONTHLY_COST_PER_USER");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    wui()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("cache"));
}

#[test]
fn test_version_flag() {
    wui().arg("--version").assert().success();
}

#[test]
fn test_analyze_offline_with_cold_cache_fails() {
    let cache = TempDir::new().unwrap();
    wui()
        .args(["analyze", "--offline"])
        .env("CACHE_DIR", cache.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cache entry not found"));
}

#[test]
fn test_fetch_without_token_fails() {
    let cache = TempDir::new().unwrap();
    wui()
        .args(["fetch", "users"])
        .env("CACHE_DIR", cache.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("WUI_TOKEN"));
}

#[test]
fn test_cache_status_on_empty_dir() {
    let cache = TempDir::new().unwrap();
    wui()
        .args(["cache", "status"])
        .env("CACHE_DIR", cache.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache is empty"));
}

#[test]
fn test_cache_clear_reports_removed_count() {
    let cache = TempDir::new().unwrap();
    fs::write(cache.path().join("users.json"), "{}").unwrap();
    wui()
        .args(["cache", "clear"])
        .env("CACHE_DIR", cache.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1"));
}

#[test]
fn test_export_scan_missing_dir_fails() {
    wui()
        .args(["export", "scan", "--dir", "/definitely/not/here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Export directory not found"));
}

#[test]
fn test_export_scan_json_output() {
    let export = TempDir::new().unwrap();
    fs::write(
        export
            .path()
            .join("Notes 0123456789abcdef0123456789abcdef.md"),
        "# Notes",
    )
    .unwrap();
    wui()
        .args(["export", "scan", "--json"])
        .arg("--dir")
        .arg(export.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "01234567-89ab-cdef-0123-456789abcdef",
        ));
}

#[test]
fn test_config_show_masks_token() {
    wui()
        .args(["config", "show"])
        .env("WUI_TOKEN", "secret_1234567890abcdef")
        .assert()
        .success()
        .stdout(predicate::str::contains("secr...cdef"))
        .stdout(predicate::str::contains("secret_1234567890abcdef").not());
}

#[test]
fn test_analyze_offline_with_warm_cache_succeeds() {
    let cache = TempDir::new().unwrap();
    fs::write(
        cache.path().join("users.json"),
        r#"{"a": {"id": "a", "name": "Ada"}}"#,
    )
    .unwrap();
    fs::write(
        cache.path().join("pages.json"),
        r#"[{
            "id": "p1",
            "created_time": "2024-01-05T10:00:00.000Z",
            "created_by": "a",
            "last_edited_time": "2024-02-01T09:30:00.000Z",
            "last_edited_by": "a",
            "archived": false
        }]"#,
    )
    .unwrap();

    wui()
        .args(["analyze", "--offline"])
        .env("CACHE_DIR", cache.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Workspace Analytics"));
}

#[test]
fn test_report_offline_writes_markdown() {
    let cache = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(
        cache.path().join("users.json"),
        r#"{"a": {"id": "a", "name": "Ada"}}"#,
    )
    .unwrap();
    fs::write(
        cache.path().join("pages.json"),
        r#"[{
            "id": "p1",
            "created_time": "2024-01-05T10:00:00.000Z",
            "created_by": "a",
            "last_edited_time": "2024-02-01T09:30:00.000Z",
            "last_edited_by": "a",
            "archived": false
        }]"#,
    )
    .unwrap();
    let report_path = output.path().join("report.md");

    wui()
        .args(["report", "--offline", "--output"])
        .arg(&report_path)
        .env("CACHE_DIR", cache.path())
        .env("WORKSPACE_NAME", "Test Space")
        .assert()
        .success();

    let content = fs::read_to_string(&report_path).unwrap();
    assert!(content.contains("# Test Space Analytics Report"));
    assert!(content.contains("## Risk Assessment"));
}
