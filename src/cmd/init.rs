//! Init command implementation
//!
//! Handles the `bundle-checker init` command which writes a commented
//! starter `.bundle-checker.toml`.

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::config::{ConfigFile, ConfigLoader, CONFIG_FILE_NAME};
use crate::fmt::{icon, CHECKMARK, INFO, SPARKLES, WARNING};

/// Write a starter configuration in the current directory
///
/// An existing file is left untouched unless `force` is set.
///
/// # Examples
///
/// ```no_run
/// use bundle_checker::cmd::cmd_init;
///
/// cmd_init(false)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_init(force: bool) -> Result<()> {
    let project_root = env::current_dir().context("Failed to read the current directory")?;
    init_in(&project_root, force)
}

fn init_in(project_root: &Path, force: bool) -> Result<()> {
    println!(
        "{} {} Initializing bundle-checker",
        icon(SPARKLES),
        style("bundle-checker init").bold()
    );
    println!();

    if ConfigLoader::exists(project_root) && !force {
        println!(
            "{} Config file already exists: {}",
            icon(WARNING),
            style(CONFIG_FILE_NAME).cyan()
        );
        println!("   Use --force to overwrite it.");
        return Ok(());
    }

    ConfigLoader::save(&ConfigFile::starter(), project_root)?;

    println!(
        "{} Created {}",
        icon(CHECKMARK),
        style(CONFIG_FILE_NAME).bold().green()
    );
    println!();
    println!("{}  Next steps:", icon(INFO));
    println!("   1. Adjust install-script, build-script and dist-path to your project");
    println!("   2. Run: {}", style("bundle-checker compare").cyan());
    println!(
        "   3. In CI, add {} to post the report on the pull request",
        style("--comment").cyan()
    );

    Ok(())
}
