//! JSON output formatting for CI integration

use serde::{Deserialize, Serialize};

use crate::cicd::budget::{LimitResult, LimitStatus};
use crate::compare::ComparisonOutcome;
use crate::fmt::format_bytes;
use crate::report::FileSizeReport;

/// JSON document printed by `compare --json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Both branches were built and measured, and no limit was exceeded
    pub success: bool,
    /// Branch under review
    pub current_branch: String,
    /// Branch compared against
    pub target_branch: String,
    /// Per-file sizes of the current branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<FileSizeReport>,
    /// Per-file sizes of the target branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<FileSizeReport>,
    /// Summed sizes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
    /// Size limit check (if a limit is configured)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<LimitInfo>,
    /// Cleanup steps that did not complete
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cleanup_warnings: Vec<String>,
    /// Fatal error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A byte count with its human-readable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeInfo {
    /// Size in bytes
    pub bytes: u64,
    /// Formatted string (e.g. "1.95KB")
    pub formatted: String,
}

impl SizeInfo {
    /// Create size info from bytes
    pub fn new(bytes: u64) -> Self {
        Self {
            bytes,
            formatted: format_bytes(bytes),
        }
    }
}

/// Totals of both branches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Totals {
    /// Current branch total
    pub current: SizeInfo,
    /// Target branch total
    pub target: SizeInfo,
    /// `current - target` in bytes (negative = reduction)
    pub delta_bytes: i64,
}

/// Size limit result for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitInfo {
    /// "pass", "warning" or "exceeded"
    pub status: String,
    /// Whether the check passed
    pub passed: bool,
    /// Configured limit
    pub limit: SizeInfo,
    /// Human-readable verdict
    pub message: String,
}

impl LimitInfo {
    /// Convert from a [`LimitResult`]
    pub fn from_result(result: &LimitResult) -> Self {
        let status = match result.status {
            LimitStatus::Pass => "pass",
            LimitStatus::Warning => "warning",
            LimitStatus::Exceeded => "exceeded",
        };
        Self {
            status: status.to_string(),
            passed: !result.is_exceeded(),
            limit: SizeInfo::new(result.limit_bytes),
            message: result.message.clone(),
        }
    }
}

/// JSON document printed by `check --json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckJsonOutput {
    /// The total stayed within the limit
    pub success: bool,
    /// Number of files counted
    pub files: usize,
    /// Summed size of the files
    pub size: SizeInfo,
    /// Limit check
    pub size_limit: LimitInfo,
}

impl CheckJsonOutput {
    /// Describe a single-build check
    pub fn new(files: usize, result: &LimitResult) -> Self {
        Self {
            success: !result.is_exceeded(),
            files,
            size: SizeInfo::new(result.size_bytes),
            size_limit: LimitInfo::from_result(result),
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl JsonOutput {
    /// Describe a finished comparison
    pub fn from_outcome(outcome: &ComparisonOutcome) -> Self {
        let report = outcome.report();
        let totals = report.map(|r| {
            let delta = r.total_delta();
            Totals {
                current: SizeInfo::new(r.current_branch_report.total()),
                target: SizeInfo::new(r.target_branch_report.total()),
                delta_bytes: i64::try_from(delta)
                    .unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX }),
            }
        });

        Self {
            success: outcome.is_success(),
            current_branch: outcome.current_branch.clone(),
            target_branch: outcome.target_branch.clone(),
            current: report.map(|r| r.current_branch_report.clone()),
            target: report.map(|r| r.target_branch_report.clone()),
            totals,
            size_limit: None,
            cleanup_warnings: outcome
                .cleanup_warnings
                .iter()
                .map(ToString::to_string)
                .collect(),
            error: outcome.error_message(),
        }
    }

    /// Attach a size limit result; an exceeded limit marks the output failed
    pub fn with_limit(mut self, result: &LimitResult) -> Self {
        if result.is_exceeded() {
            self.success = false;
        }
        self.size_limit = Some(LimitInfo::from_result(result));
        self
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
