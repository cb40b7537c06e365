//! Validated parameters of one comparison run

use std::path::PathBuf;

use thiserror::Error;

use crate::report::SlugStrategy;

/// Scratch parent directory name under the system temp dir
pub const SCRATCH_DIR_NAME: &str = "bundle-checker";

/// A required parameter is missing or invalid
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Required field absent or empty
    #[error("Invalid Input: missing {0}.")]
    Missing(&'static str),

    /// Slug pattern is not a valid regex
    #[error("Invalid Input: slug pattern '{pattern}' is not a valid regex: {reason}")]
    InvalidSlugPattern {
        /// Configured pattern
        pattern: String,
        /// Regex compile error
        reason: String,
    },

    /// Value would be read as a command-line option by git
    #[error("Invalid Input: {name} '{value}' must not start with '-'.")]
    LeadingDash {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Immutable inputs of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleCheckerParams {
    /// Shell command producing build artifacts
    pub build_script: String,
    /// Shell command installing dependencies
    pub install_script: String,
    /// Directory build output lives under, relative to the working tree
    pub dist_path: Option<PathBuf>,
    /// Glob patterns selecting artifacts
    pub target_files_pattern: Vec<String>,
    /// Clone this repository into a scratch directory when set
    pub git_repository: Option<String>,
    /// Branch under review
    pub current_branch: String,
    /// Branch compared against
    pub target_branch: String,
    /// Size threshold in bytes
    pub size_limit: Option<u64>,
    /// Working tree used when nothing is cloned
    pub project_root: PathBuf,
    /// Parent of per-run scratch directories
    pub scratch_root: PathBuf,
    /// Hash slug normalization
    pub slug_strategy: SlugStrategy,
}

impl BundleCheckerParams {
    /// Start building parameters
    pub fn builder() -> BundleCheckerParamsBuilder {
        BundleCheckerParamsBuilder::default()
    }
}

/// Validating builder for [`BundleCheckerParams`].
///
/// # Examples
///
/// ```
/// use bundle_checker::config::BundleCheckerParams;
///
/// let params = BundleCheckerParams::builder()
///     .install_script("yarn")
///     .build_script("yarn build")
///     .pattern("**/*.js")
///     .current_branch("feature")
///     .target_branch("master")
///     .build()?;
/// assert_eq!(params.target_files_pattern, vec!["**/*.js"]);
///
/// let missing = BundleCheckerParams::builder().build().unwrap_err();
/// assert_eq!(missing.to_string(), "Invalid Input: missing build-script.");
/// # Ok::<(), bundle_checker::config::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct BundleCheckerParamsBuilder {
    build_script: Option<String>,
    install_script: Option<String>,
    dist_path: Option<PathBuf>,
    target_files_pattern: Vec<String>,
    git_repository: Option<String>,
    current_branch: Option<String>,
    target_branch: Option<String>,
    size_limit: Option<u64>,
    project_root: Option<PathBuf>,
    scratch_root: Option<PathBuf>,
    slug_strategy: SlugStrategy,
}

impl BundleCheckerParamsBuilder {
    /// Set the build script
    pub fn build_script(mut self, script: impl Into<String>) -> Self {
        self.build_script = Some(script.into());
        self
    }

    /// Set the install script
    pub fn install_script(mut self, script: impl Into<String>) -> Self {
        self.install_script = Some(script.into());
        self
    }

    /// Set the output directory
    pub fn dist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dist_path = Some(path.into());
        self
    }

    /// Add one artifact pattern
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.target_files_pattern.push(pattern.into());
        self
    }

    /// Replace all artifact patterns
    pub fn patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_files_pattern = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Clone from this repository
    pub fn git_repository(mut self, url: impl Into<String>) -> Self {
        self.git_repository = Some(url.into());
        self
    }

    /// Set the branch under review
    pub fn current_branch(mut self, branch: impl Into<String>) -> Self {
        self.current_branch = Some(branch.into());
        self
    }

    /// Set the branch compared against
    pub fn target_branch(mut self, branch: impl Into<String>) -> Self {
        self.target_branch = Some(branch.into());
        self
    }

    /// Set the size limit in bytes
    pub fn size_limit(mut self, bytes: u64) -> Self {
        self.size_limit = Some(bytes);
        self
    }

    /// Working tree for runs without a clone (defaults to `.`)
    pub fn project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Parent of scratch directories (defaults to `<tmp>/bundle-checker`)
    pub fn scratch_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(path.into());
        self
    }

    /// Slug normalization strategy
    pub fn slug_strategy(mut self, strategy: SlugStrategy) -> Self {
        self.slug_strategy = strategy;
        self
    }

    /// Validate and build.
    ///
    /// Fails on the first missing required field, in declaration order.
    pub fn build(self) -> Result<BundleCheckerParams, ConfigurationError> {
        let build_script = required(self.build_script, "build-script")?;
        let install_script = required(self.install_script, "install-script")?;

        let target_files_pattern: Vec<String> = self
            .target_files_pattern
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();
        if target_files_pattern.is_empty() {
            return Err(ConfigurationError::Missing("target-files-pattern"));
        }

        let current_branch = no_leading_dash(
            required(self.current_branch, "current-branch")?,
            "current-branch",
        )?;
        let target_branch = no_leading_dash(
            required(self.target_branch, "target-branch")?,
            "target-branch",
        )?;

        if let SlugStrategy::HexPattern { pattern } = &self.slug_strategy {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(ConfigurationError::InvalidSlugPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                });
            }
        }

        Ok(BundleCheckerParams {
            build_script,
            install_script,
            dist_path: self.dist_path.filter(|p| !p.as_os_str().is_empty()),
            target_files_pattern,
            git_repository: self.git_repository.filter(|r| !r.trim().is_empty()),
            current_branch,
            target_branch,
            size_limit: self.size_limit,
            project_root: self.project_root.unwrap_or_else(|| PathBuf::from(".")),
            scratch_root: self
                .scratch_root
                .unwrap_or_else(|| std::env::temp_dir().join(SCRATCH_DIR_NAME)),
            slug_strategy: self.slug_strategy,
        })
    }
}

fn no_leading_dash(value: String, name: &'static str) -> Result<String, ConfigurationError> {
    if value.starts_with('-') {
        return Err(ConfigurationError::LeadingDash { name, value });
    }
    Ok(value)
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigurationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigurationError::Missing(name))
}
