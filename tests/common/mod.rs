//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - The bundle-checker binary under test
//! - Fixture projects with build output or a git history
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::{bin, fixtures};
//!
//! let project = fixtures::dist_project(&[("dist/app.js", 1024)]).unwrap();
//! bin().arg("check").current_dir(project.path()).assert().success();
//! ```

pub mod fixtures;

use assert_cmd::Command;

/// The bundle-checker binary, with emoji and colors disabled
#[allow(dead_code)]
pub fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bundle-checker"));
    cmd.env("NO_EMOJI", "1").env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Check if git is available
#[allow(dead_code)]
pub fn has_git() -> bool {
    which::which("git").is_ok()
}
