#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A `wish` command isolated to `dir` and with no remote configured.
fn wish_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("wish"));
    cmd.env("WISH_DATA_DIR", dir.path())
        .env("NO_COLOR", "1")
        .env_remove("WISH_REMOTE_URL")
        .env_remove("WISH_STATIC_URL")
        .env_remove("WISH_STORAGE_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_empty_list_suggests_adding() {
    let dir = TempDir::new().unwrap();
    wish_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("All (0)"))
        .stdout(predicate::str::contains("No wishes yet"));
}

#[test]
fn test_add_toggle_remove_workflow() {
    let dir = TempDir::new().unwrap();

    wish_cmd(&dir)
        .args(["add", "-c", "Travel", "Visit", "Lisbon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wish added: Visit Lisbon [Travel]"));
    wish_cmd(&dir)
        .args(["add", "Learn to juggle"])
        .assert()
        .success();

    // Newest first
    wish_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. ").and(predicate::str::contains("Learn to juggle")))
        .stdout(predicate::str::contains("All (2)"));

    wish_cmd(&dir)
        .args(["done", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed: Visit Lisbon"));
    wish_cmd(&dir)
        .args(["list", "--filter", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visit Lisbon"))
        .stdout(predicate::str::contains("Learn to juggle").not());

    wish_cmd(&dir)
        .args(["star", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starred: Learn to juggle"));

    wish_cmd(&dir)
        .args(["remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed: Learn to juggle"));
    wish_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("All (1)"));
}

#[test]
fn test_list_is_persisted_to_data_dir() {
    let dir = TempDir::new().unwrap();
    wish_cmd(&dir).args(["add", "Persist me"]).assert().success();

    let raw = fs::read_to_string(dir.path().join("wishlist.json")).unwrap();
    assert!(raw.contains("\"text\":\"Persist me\""));
    assert!(raw.contains("\"createdAt\""));
}

#[test]
fn test_blank_wish_is_ignored() {
    let dir = TempDir::new().unwrap();
    wish_cmd(&dir)
        .args(["add", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to add"));
    assert!(!dir.path().join("wishlist.json").exists());
}

#[test]
fn test_unknown_selector_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    wish_cmd(&dir)
        .args(["done", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No wish matches \"7\""));
}

#[test]
fn test_categories_summary() {
    let dir = TempDir::new().unwrap();
    wish_cmd(&dir).args(["add", "-c", "Food", "Try durian"]).assert().success();
    wish_cmd(&dir).args(["add", "-c", "Food", "Bake sourdough"]).assert().success();
    wish_cmd(&dir).args(["add", "Read Dune"]).assert().success();

    wish_cmd(&dir)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Food\s+2").unwrap())
        .stdout(predicate::str::is_match(r"General\s+1").unwrap());
}

#[test]
fn test_sync_without_remote_explains() {
    let dir = TempDir::new().unwrap();
    wish_cmd(&dir)
        .args(["sync", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No remote store is configured"));
    wish_cmd(&dir)
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remote: local only"));
}

#[test]
fn test_data_dir_flag_overrides_env() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();
    wish_cmd(&env_dir)
        .args(["--data-dir", flag_dir.path().to_str().unwrap(), "add", "Flagged"])
        .assert()
        .success();

    assert!(flag_dir.path().join("wishlist.json").exists());
    assert!(!env_dir.path().join("wishlist.json").exists());
}

#[test]
fn test_unusable_storage_key_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    wish_cmd(&dir)
        .env("WISH_STORAGE_KEY", "my.list")
        .args(["add", "Visit Lisbon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("storage_key \"my.list\""));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
