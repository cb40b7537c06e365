//! Artifact discovery through glob patterns

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A pattern could not be expanded
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The pattern is not valid glob syntax
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern as configured
        pattern: String,
        /// Parser error
        source: glob::PatternError,
    },

    /// The root path is not valid UTF-8 and cannot be used as a glob prefix
    #[error("root directory {0} is not valid UTF-8")]
    NonUtf8Root(PathBuf),
}

/// Expands one pattern relative to a root directory
pub trait ArtifactDiscovery: Send + Sync {
    /// Files (not directories) matching `pattern` under `root`
    fn expand(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError>;
}

/// Discovery backed by the `glob` crate.
///
/// Supports `*`, `?`, `[...]` and `**`. Brace alternation is not supported;
/// list one pattern per alternative instead. Wildcards do not match a leading
/// `.`, so hidden files and directories are only found when named literally.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobDiscovery;

impl ArtifactDiscovery for GlobDiscovery {
    fn expand(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
        let root_str = root
            .to_str()
            .ok_or_else(|| DiscoveryError::NonUtf8Root(root.to_path_buf()))?;
        let full = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            format!(
                "{}/{}",
                glob::Pattern::escape(root_str.trim_end_matches(['/', '\\'])),
                pattern
            )
        };

        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..glob::MatchOptions::new()
        };
        let paths = glob::glob_with(&full, options).map_err(|source| DiscoveryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("skipping unreadable path while expanding '{}': {}", pattern, e),
            }
        }
        Ok(files)
    }
}

/// Expand every pattern into one de-duplicated, sorted file list.
///
/// A pattern that fails to expand contributes no files; the error is logged
/// and the remaining patterns are still expanded.
pub fn discover_files(
    discovery: &dyn ArtifactDiscovery,
    root: &Path,
    patterns: &[String],
) -> Vec<PathBuf> {
    let mut files = BTreeSet::new();
    for pattern in patterns {
        match discovery.expand(root, pattern) {
            Ok(found) => {
                log::debug!("pattern '{}' matched {} files", pattern, found.len());
                files.extend(found);
            }
            Err(e) => log::warn!("{}; treating as no matches", e),
        }
    }
    files.into_iter().collect()
}
