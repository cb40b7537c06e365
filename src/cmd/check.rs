//! Check command implementation
//!
//! Handles `bundle-checker check`: measures the build output already on disk
//! (optionally building it first) and compares the total with a size limit.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::cicd::{CheckJsonOutput, LimitResult, SizeLimitChecker};
use crate::cli::CheckArgs;
use crate::config::{ConfigFile, ConfigLoader, ConfigurationError, DEFAULT_TARGET_FILES_PATTERN};
use crate::error::BundleCheckerError;
use crate::fmt::{icon, HAMMER, MICROSCOPE, WARNING};
use crate::infra::RealCommandExecutor;
use crate::measure::{measure_artifacts, FsSizeProvider, GlobDiscovery, Measurement};
use crate::pipeline::ScriptRunner;
use crate::report::slug::NoSlug;

/// Limit applied when neither the flag nor the config file sets one (1.5MB)
pub const DEFAULT_SIZE_LIMIT: u64 = 1_572_864;

/// Check the current build output against a size limit
///
/// # Errors
///
/// Returns an error if the configuration cannot be read, the build script
/// fails, or the measured total exceeds the limit.
pub fn cmd_check(args: &CheckArgs) -> Result<()> {
    let root = &args.artifacts.project_root;
    let config = ConfigLoader::load(root)?.merged_with(args.overrides());

    if args.build {
        let script = config
            .build_script
            .as_deref()
            .ok_or(BundleCheckerError::Configuration(ConfigurationError::Missing(
                "build-script",
            )))?;
        if !args.json {
            println!("{} Running {}", icon(HAMMER), style(script).cyan());
        }
        ScriptRunner::new(RealCommandExecutor)
            .run(script, root)
            .with_context(|| format!("Failed to build {}", root.display()))?;
    }

    let (measurement, result) = measure_and_check(root, &config);
    if measurement.files.is_empty() {
        log::warn!("no files matched under {}", dist_root(root, &config).display());
    }

    if args.json {
        let output = CheckJsonOutput::new(measurement.files.len(), &result);
        println!("{}", output.to_json().context("Failed to serialize JSON output")?);
    } else {
        println!(
            "{} Measured {} file(s) under {}",
            icon(MICROSCOPE),
            measurement.files.len(),
            style(dist_root(root, &config).display()).cyan()
        );
        if measurement.files.is_empty() {
            println!(
                "{} {}",
                icon(WARNING),
                style("No files matched the configured patterns").yellow()
            );
        }
        result.print();
    }

    if result.is_exceeded() {
        return Err(BundleCheckerError::SizeLimitExceeded {
            actual: result.size_bytes,
            limit: result.limit_bytes,
        }
        .into());
    }
    Ok(())
}

fn dist_root(root: &Path, config: &ConfigFile) -> std::path::PathBuf {
    match &config.dist_path {
        Some(dist) => root.join(dist),
        None => root.to_path_buf(),
    }
}

fn measure_and_check(root: &Path, config: &ConfigFile) -> (Measurement, LimitResult) {
    let patterns: Vec<String> = match &config.target_files_pattern {
        Some(patterns) if !patterns.is_empty() => patterns.clone(),
        _ => DEFAULT_TARGET_FILES_PATTERN
            .iter()
            .map(|p| p.to_string())
            .collect(),
    };
    let measurement = measure_artifacts(
        &dist_root(root, config),
        &patterns,
        &GlobDiscovery,
        &FsSizeProvider::new(),
        &NoSlug,
    );
    let limit = config.size_limit.unwrap_or(DEFAULT_SIZE_LIMIT);
    let result = SizeLimitChecker::new(limit).check(measurement.report.total());
    (measurement, result)
}
