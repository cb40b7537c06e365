//! Tests for the `init` command

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::bin;

#[test]
fn test_init_creates_config_file() {
    let dir = TempDir::new().unwrap();
    bin()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created .bundle-checker.toml"));

    let contents = fs::read_to_string(dir.path().join(".bundle-checker.toml")).unwrap();
    assert!(contents.starts_with("# bundle-checker configuration"));
    assert!(contents.contains("build-script = \"npm run build\""));
    assert!(contents.contains("target-branch = \"master\""));
}

#[test]
fn test_init_does_not_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".bundle-checker.toml");
    fs::write(&path, "build-script = \"make\"\n").unwrap();

    bin()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "build-script = \"make\"\n");

    bin()
        .args(["init", "--force"])
        .current_dir(dir.path())
        .assert()
        .success();
    assert!(fs::read_to_string(&path).unwrap().contains("npm run build"));
}

#[test]
fn test_generated_config_is_accepted_by_check() {
    let dir = TempDir::new().unwrap();
    bin().arg("init").current_dir(dir.path()).assert().success();
    fs::create_dir_all(dir.path().join("dist")).unwrap();
    fs::write(dir.path().join("dist/app.js"), "x").unwrap();

    bin()
        .arg("check")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));
}
