//! Top-level error types with contextual suggestions
//!
//! Provides structured errors that include:
//! - Actionable messages
//! - Suggested fixes
//! - Documentation links
//! - Exit codes for CI
//!
//! # Examples
//!
//! ```no_run
//! use bundle_checker::error::{BundleCheckerError, ErrorFormatter};
//!
//! let err: anyhow::Error = BundleCheckerError::SizeLimitExceeded {
//!     actual: 2_000_000,
//!     limit: 1_572_864,
//! }
//! .into();
//! eprintln!("{}", ErrorFormatter::format(&err));
//! std::process::exit(ErrorFormatter::exit_code(&err));
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{ConfigurationError, CONFIG_FILE_NAME};
use crate::fmt::format_bytes;
use crate::tools::ToolError;

/// bundle-checker errors with contextual suggestions
#[derive(Error, Debug)]
pub enum BundleCheckerError {
    /// Required tool is not installed
    #[error("Tool not installed: {tool}")]
    ToolMissing {
        /// Tool name
        tool: String,
        /// Where to get it
        install_hint: String,
    },

    /// Required parameter missing or invalid
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Configuration file exists but cannot be parsed
    #[error("Invalid configuration file {}: {message}", path.display())]
    InvalidConfigFile {
        /// Path to the file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Building or cloning a branch failed
    #[error("Comparison failed: {message}")]
    ComparisonFailed {
        /// Cause of the failure
        message: String,
    },

    /// Measured size is above the configured limit
    #[error(
        "Bundle size ({}) exceeds the maximum allowed size ({})",
        format_bytes(*actual),
        format_bytes(*limit)
    )]
    SizeLimitExceeded {
        /// Measured size in bytes
        actual: u64,
        /// Limit in bytes
        limit: u64,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl From<ToolError> for BundleCheckerError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::MissingTool { name, install_hint } => Self::ToolMissing {
                tool: name.to_string(),
                install_hint: install_hint.to_string(),
            },
            ToolError::Io(source) => Self::Io {
                context: "running tool check".to_string(),
                source,
            },
            ToolError::VersionFailed(tool) => Self::ToolMissing {
                tool,
                install_hint: "reinstall it and make sure it is on PATH".to_string(),
            },
        }
    }
}

impl BundleCheckerError {
    /// Actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use bundle_checker::error::BundleCheckerError;
    ///
    /// let error = BundleCheckerError::ToolMissing {
    ///     tool: "gh".to_string(),
    ///     install_hint: "brew install gh".to_string(),
    /// };
    /// assert!(error.suggestion().unwrap().contains("brew install gh"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ToolMissing { install_hint, .. } => Some(format!("Install with: {}", install_hint)),
            Self::Configuration(ConfigurationError::Missing(key)) => Some(format!(
                "Pass --{} or set `{}` in {} (run 'bundle-checker init' for a starter file)",
                flag_for(key),
                key,
                CONFIG_FILE_NAME
            )),
            Self::Configuration(ConfigurationError::InvalidSlugPattern { .. }) => Some(
                "Fix the `pattern` of the `slugs` table or use strategy = \"last-segment\""
                    .to_string(),
            ),
            Self::Configuration(ConfigurationError::LeadingDash { name, .. }) => Some(format!(
                "Pass the branch name itself as --{}, without leading dashes",
                name
            )),
            Self::InvalidConfigFile { .. } => Some(format!(
                "Check the syntax of {} or regenerate it with 'bundle-checker init --force'",
                CONFIG_FILE_NAME
            )),
            Self::ComparisonFailed { .. } => Some(
                "Run the install and build scripts by hand on both branches to see the full output"
                    .to_string(),
            ),
            Self::SizeLimitExceeded { actual, limit } => Some(format!(
                "Reduce the bundle by {} or raise size-limit",
                format_bytes(actual.saturating_sub(*limit))
            )),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Documentation URL for this error
    pub fn docs_url(&self) -> Option<&str> {
        match self {
            Self::Configuration(_) | Self::InvalidConfigFile { .. } => {
                Some("https://github.com/rbelling/bundle-checker#configuration")
            }
            Self::SizeLimitExceeded { .. } => {
                Some("https://github.com/rbelling/bundle-checker#size-limit")
            }
            _ => None,
        }
    }

    /// Exit code following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use bundle_checker::config::ConfigurationError;
    /// use bundle_checker::error::BundleCheckerError;
    ///
    /// let usage = BundleCheckerError::Configuration(ConfigurationError::Missing("build-script"));
    /// assert_eq!(usage.exit_code(), 64);
    ///
    /// let limit = BundleCheckerError::SizeLimitExceeded { actual: 2, limit: 1 };
    /// assert_eq!(limit.exit_code(), 1);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolMissing { .. } => 127,         // Command not found
            Self::Configuration(_) => 64,            // EX_USAGE
            Self::InvalidConfigFile { .. } => 65,    // EX_DATAERR
            Self::ComparisonFailed { .. } => 1,
            Self::SizeLimitExceeded { .. } => 1,
            Self::Io { .. } => 74,                   // EX_IOERR
        }
    }
}

/// CLI flag for a configuration key
fn flag_for(key: &str) -> &str {
    match key {
        "target-files-pattern" => "pattern",
        other => other,
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with its cause chain, suggestion and documentation link
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();
        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(bc_error) = Self::find(error) {
            if let Some(suggestion) = bc_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
            if let Some(docs) = bc_error.docs_url() {
                output.push_str(&format!("{} {}\n", style("docs:").blue(), docs));
            }
        }

        output
    }

    /// Exit code for an error, 1 unless a [`BundleCheckerError`] says otherwise
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        Self::find(error).map_or(1, BundleCheckerError::exit_code)
    }

    fn find(error: &anyhow::Error) -> Option<&BundleCheckerError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<BundleCheckerError>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn all_variants() -> Vec<BundleCheckerError> {
        vec![
            BundleCheckerError::ToolMissing {
                tool: "git".to_string(),
                install_hint: "https://git-scm.com".to_string(),
            },
            BundleCheckerError::Configuration(ConfigurationError::Missing("target-branch")),
            BundleCheckerError::InvalidConfigFile {
                path: PathBuf::from(CONFIG_FILE_NAME),
                message: "expected `=`".to_string(),
            },
            BundleCheckerError::ComparisonFailed {
                message: "build step failed".to_string(),
            },
            BundleCheckerError::SizeLimitExceeded {
                actual: 100,
                limit: 50,
            },
            BundleCheckerError::Io {
                context: "reading dist".to_string(),
                source: std::io::Error::other("test"),
            },
        ]
    }

    #[test]
    fn test_missing_parameter_suggests_flag_and_key() {
        let err = BundleCheckerError::Configuration(ConfigurationError::Missing(
            "target-files-pattern",
        ));
        assert_eq!(err.to_string(), "Invalid Input: missing target-files-pattern.");
        let suggestion = err.suggestion().unwrap();
        assert!(suggestion.contains("--pattern"));
        assert!(suggestion.contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_size_limit_message_uses_human_sizes() {
        let err = BundleCheckerError::SizeLimitExceeded {
            actual: 3072,
            limit: 1024,
        };
        assert_eq!(
            err.to_string(),
            "Bundle size (3KB) exceeds the maximum allowed size (1KB)"
        );
        assert!(err.suggestion().unwrap().contains("2KB"));
    }

    #[test]
    fn test_tool_error_conversion() {
        let err: BundleCheckerError = ToolError::MissingTool {
            name: "GitHub CLI",
            install_hint: "brew install gh",
        }
        .into();
        assert_eq!(err.exit_code(), 127);
        assert!(err.to_string().contains("GitHub CLI"));
    }

    #[test]
    fn test_all_variants_have_exit_codes_and_suggestions() {
        for err in all_variants() {
            let code = err.exit_code();
            assert!(code > 0 && code < 256, "{err:?} has exit code {code}");
            assert!(err.suggestion().is_some_and(|s| !s.is_empty()));
        }
    }

    #[test]
    fn test_formatter_finds_error_behind_context() {
        let err = anyhow::Error::from(BundleCheckerError::Configuration(
            ConfigurationError::Missing("build-script"),
        ))
        .context("Failed to resolve parameters");

        console::set_colors_enabled(false);
        let formatted = ErrorFormatter::format(&err);
        assert!(formatted.contains("error: Failed to resolve parameters"));
        assert!(formatted.contains("caused by: Invalid Input: missing build-script."));
        assert!(formatted.contains("help:"));
        assert_eq!(ErrorFormatter::exit_code(&err), 64);
    }

    #[test]
    fn test_plain_anyhow_error_exits_with_one() {
        let err: anyhow::Error = Err::<(), _>(std::io::Error::other("boom"))
            .context("writing report")
            .unwrap_err();
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
    }
}
