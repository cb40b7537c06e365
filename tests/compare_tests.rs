//! Tests for the `compare` command
//!
//! Builds both branches of a throwaway git repository with plain shell
//! scripts. Skipped when git is not installed.

use predicates::prelude::*;
use std::fs;

mod common;
use common::{bin, fixtures, has_git};

fn compare_args() -> Vec<&'static str> {
    vec![
        "compare",
        "--install-script",
        fixtures::INSTALL_SCRIPT,
        "--build-script",
        fixtures::BUILD_SCRIPT,
        "--dist-path",
        "dist",
        "-p",
        "**/*.js",
        "-p",
        "**/*.css",
        "--target-branch",
        "master",
        "--slugs",
        "disabled",
    ]
}

fn git_stdout(dir: &std::path::Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git should run");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

#[test]
fn test_compare_in_working_tree_reports_both_branches() {
    if !has_git() {
        return;
    }
    let project = fixtures::git_project().expect("Failed to create test repository");

    let output = bin()
        .args(compare_args())
        .arg("--json")
        .current_dir(project.path())
        .output()
        .expect("Command execution failed");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON only");
    assert_eq!(json["current_branch"], "feature");
    assert_eq!(json["target_branch"], "master");
    assert_eq!(json["current"]["main.js"], 1100);
    assert_eq!(json["current"]["vendor.js"], 2000);
    assert!(json["current"].get("style.css").is_none());
    assert_eq!(json["target"]["main.js"], 1000);
    assert_eq!(json["target"]["style.css"], 150);
    assert_eq!(json["totals"]["delta_bytes"], 1950);
}

#[test]
fn test_compare_restores_checked_out_branch_and_local_changes() {
    if !has_git() {
        return;
    }
    let project = fixtures::git_project().expect("Failed to create test repository");
    fs::write(project.path().join("NOTES.md"), "work in progress").unwrap();

    bin()
        .args(compare_args())
        .arg("--markdown")
        .current_dir(project.path())
        .assert()
        .success();

    assert_eq!(
        git_stdout(project.path(), &["rev-parse", "--abbrev-ref", "HEAD"]),
        "feature"
    );
    assert_eq!(
        fs::read_to_string(project.path().join("NOTES.md")).unwrap(),
        "work in progress"
    );
    assert_eq!(git_stdout(project.path(), &["stash", "list"]), "");
}

#[test]
fn test_compare_markdown_contains_tables_and_watermark() {
    if !has_git() {
        return;
    }
    let project = fixtures::git_project().expect("Failed to create test repository");

    bin()
        .args(compare_args())
        .arg("--markdown")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("### Overview"))
        .stdout(predicate::str::contains("| file extension | feature | master |"))
        .stdout(predicate::str::contains("| vendor.js | 1.95KB"))
        .stdout(predicate::str::contains("<summary>Details of bundled changes</summary>"))
        .stdout(predicate::str::contains("Generated by"));
}

#[test]
fn test_compare_clone_mode_leaves_project_untouched() {
    if !has_git() {
        return;
    }
    let project = fixtures::git_project().expect("Failed to create test repository");
    let repository = project.path().to_string_lossy().into_owned();

    let output = bin()
        .args(compare_args())
        .args(["--git-repository", &repository, "--current-branch", "feature", "--json"])
        .current_dir(project.path())
        .output()
        .expect("Command execution failed");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["totals"]["delta_bytes"], 1950);
    assert!(!project.path().join("dist").exists());
}

#[test]
fn test_compare_size_limit_fails_run() {
    if !has_git() {
        return;
    }
    let project = fixtures::git_project().expect("Failed to create test repository");

    bin()
        .args(compare_args())
        .args(["--size-limit", "2KB"])
        .current_dir(project.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ERROR: Project is currently 3.03KB"))
        .stderr(predicate::str::contains("exceeds the maximum allowed size (2KB)"));
}

#[test]
fn test_compare_failing_build_reports_step() {
    if !has_git() {
        return;
    }
    let project = fixtures::git_project().expect("Failed to create test repository");

    bin()
        .args([
            "compare",
            "--install-script",
            "true",
            "--build-script",
            "exit 2",
            "-p",
            "**/*.js",
            "--target-branch",
            "master",
        ])
        .current_dir(project.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Comparison failed"));
}
