//! Turns a merged configuration into validated run parameters

use std::path::Path;

use super::file::ConfigFile;
use super::params::{BundleCheckerParams, ConfigurationError};

/// Resolves [`ConfigFile`] values (file merged with CLI overrides) into
/// [`BundleCheckerParams`].
///
/// # Examples
///
/// ```
/// use bundle_checker::config::{ConfigFile, ConfigResolver};
/// use std::path::Path;
///
/// let config = ConfigFile {
///     target_branch: Some("master".into()),
///     ..ConfigFile::starter()
/// };
/// let params = ConfigResolver::resolve(&config, Path::new("."), Some("feature".into()))?;
/// assert_eq!(params.current_branch, "feature");
/// # Ok::<(), bundle_checker::config::ConfigurationError>(())
/// ```
pub struct ConfigResolver;

impl ConfigResolver {
    /// Resolve `config` for a run rooted at `project_root`.
    ///
    /// `detected_branch` (the checked-out branch) is used when no current
    /// branch is configured.
    pub fn resolve(
        config: &ConfigFile,
        project_root: &Path,
        detected_branch: Option<String>,
    ) -> Result<BundleCheckerParams, ConfigurationError> {
        let mut builder = BundleCheckerParams::builder()
            .project_root(project_root)
            .patterns(config.target_files_pattern.clone().unwrap_or_default())
            .slug_strategy(config.slugs.clone().unwrap_or_default());

        if let Some(script) = &config.build_script {
            builder = builder.build_script(script);
        }
        if let Some(script) = &config.install_script {
            builder = builder.install_script(script);
        }
        if let Some(dist) = &config.dist_path {
            builder = builder.dist_path(dist);
        }
        if let Some(repo) = &config.git_repository {
            builder = builder.git_repository(repo);
        }
        if let Some(branch) = config.current_branch.clone().or(detected_branch) {
            builder = builder.current_branch(branch);
        }
        if let Some(branch) = &config.target_branch {
            builder = builder.target_branch(branch);
        }
        if let Some(limit) = config.size_limit {
            builder = builder.size_limit(limit);
        }

        builder.build()
    }
}
