//! Test fixture helpers for creating test projects
//!
//! Provides projects with pre-built output for `check`, and small git
//! repositories whose branches build to different sizes for `compare`.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Re-export anyhow for convenience
pub use anyhow;

/// Build script used by [`git_project`]: copies the sources into `dist/`
pub const BUILD_SCRIPT: &str = "mkdir -p dist && cp src/* dist/";

/// Install script used by [`git_project`]
pub const INSTALL_SCRIPT: &str = "true";

/// Creates a project whose build output already exists
///
/// `files` are `(relative path, size in bytes)` pairs.
pub fn dist_project(files: &[(&str, usize)]) -> anyhow::Result<TempDir> {
    let temp_dir = TempDir::new()?;
    write_files(temp_dir.path(), files)?;
    Ok(temp_dir)
}

/// Write `files` of the given sizes under `root`
pub fn write_files(root: &Path, files: &[(&str, usize)]) -> anyhow::Result<()> {
    for (name, size) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, vec![b'x'; *size])?;
    }
    Ok(())
}

/// Run git in `dir`, failing on a non-zero exit
pub fn git(dir: &Path, args: &[&str]) -> anyhow::Result<()> {
    let output = Command::new("git").args(args).current_dir(dir).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}

/// Creates a repository with two branches
///
/// `master` holds `src/main.js` (1000 bytes) and `src/style.css` (150 bytes).
/// `feature` grows `main.js` to 1100 bytes, drops the stylesheet and adds
/// `src/vendor.js` (2000 bytes). `feature` is checked out on return.
pub fn git_project() -> anyhow::Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    git(root, &["init", "-q"])?;
    git(root, &["symbolic-ref", "HEAD", "refs/heads/master"])?;
    git(root, &["config", "user.name", "Bundle Checker Tests"])?;
    git(root, &["config", "user.email", "tests@example.com"])?;
    git(root, &["config", "commit.gpgsign", "false"])?;
    fs::write(root.join(".gitignore"), "dist/\n")?;

    write_files(root, &[("src/main.js", 1000), ("src/style.css", 150)])?;
    git(root, &["add", "."])?;
    git(root, &["commit", "-q", "-m", "initial"])?;

    git(root, &["checkout", "-q", "-b", "feature"])?;
    write_files(root, &[("src/main.js", 1100), ("src/vendor.js", 2000)])?;
    fs::remove_file(root.join("src/style.css"))?;
    git(root, &["add", "-A"])?;
    git(root, &["commit", "-q", "-m", "feature"])?;

    Ok(temp_dir)
}
