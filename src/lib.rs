#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! bundle-checker library
//!
//! Builds two git branches of a front-end project one after the other,
//! measures the produced artifacts and reports the size difference. It can
//! be used programmatically in addition to the CLI interface.
//!
//! # Basic Example
//!
//! Rendering a comparison of two measured builds:
//!
//! ```
//! use bundle_checker::report::{ComparisonReport, FileSizeReport, ReportContent, ReportPresenter};
//!
//! let current: FileSizeReport = [("main.js", 1100u64), ("logo.jpg", 2000)].into_iter().collect();
//! let target: FileSizeReport = [("main.js", 1000u64)].into_iter().collect();
//! let report = ComparisonReport::new(current, target);
//!
//! let presenter = ReportPresenter::new("feature", "master");
//! let markdown = presenter.markdown(ReportContent::Sizes(&report));
//! assert!(markdown.contains("main.js"));
//! ```
//!
//! # Advanced Example: Comparing Branches
//!
//! ```no_run
//! use bundle_checker::compare::BranchComparator;
//! use bundle_checker::config::BundleCheckerParams;
//!
//! let params = BundleCheckerParams::builder()
//!     .install_script("yarn")
//!     .build_script("yarn build")
//!     .dist_path("dist")
//!     .pattern("**/*.js")
//!     .current_branch("feature")
//!     .target_branch("master")
//!     .build()?;
//!
//! let outcome = BranchComparator::new(params).compare();
//! if let Some(report) = outcome.report() {
//!     println!("delta: {} bytes", report.total_delta());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

/// CI integration: size limits and JSON output
pub mod cicd;
/// Command-line interface definition
pub mod cli;
/// Command handlers for CLI operations
pub mod cmd;
/// Two-branch comparison lifecycle
pub mod compare;
/// Configuration file and parameter resolution
pub mod config;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Git operations
pub mod git;
/// Infrastructure traits for filesystem and command execution
pub mod infra;
/// Artifact discovery and size measurement
pub mod measure;
/// Pull-request comment publishing
pub mod notify;
/// Install/build pipeline and progress telemetry
pub mod pipeline;
/// Report model and rendering
pub mod report;
/// Tool detection and version checking
pub mod tools;
