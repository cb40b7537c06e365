//! Size limit enforcement for CI
//!
//! One limit, three outcomes:
//! - Pass: comfortably under the limit
//! - Warning: within 10% of the limit (exit 0, informational)
//! - Exceeded: over the limit (exit 1)

use console::style;

use crate::fmt::format_bytes;

/// Share of the limit above which a size is reported as a warning, in percent
pub const WARNING_THRESHOLD_PERCENT: u64 = 90;

/// Status of a size limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStatus {
    /// Under the warning threshold
    Pass,
    /// Within 10% of the limit
    Warning,
    /// Larger than the limit
    Exceeded,
}

/// Result of a size limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitResult {
    /// Outcome
    pub status: LimitStatus,
    /// Measured size in bytes
    pub size_bytes: u64,
    /// Configured limit in bytes
    pub limit_bytes: u64,
    /// One-line verdict, prefixed with `SUCCESS:` or `ERROR:`
    pub message: String,
}

impl LimitResult {
    /// Exit code for CI (0 = pass or warning, 1 = exceeded)
    pub fn exit_code(&self) -> i32 {
        match self.status {
            LimitStatus::Pass | LimitStatus::Warning => 0,
            LimitStatus::Exceeded => 1,
        }
    }

    /// Whether the limit was exceeded
    pub fn is_exceeded(&self) -> bool {
        self.status == LimitStatus::Exceeded
    }

    /// Bytes over the limit (zero when within it)
    pub fn overshoot(&self) -> u64 {
        self.size_bytes.saturating_sub(self.limit_bytes)
    }

    /// Print the verdict, colored by status
    pub fn print(&self) {
        let line = match self.status {
            LimitStatus::Pass => style(&self.message).green(),
            LimitStatus::Warning => style(&self.message).yellow(),
            LimitStatus::Exceeded => style(&self.message).red(),
        };
        println!("{}", line);
    }
}

/// Compares a total size against a byte limit
///
/// # Examples
///
/// ```
/// use bundle_checker::cicd::{budget::LimitStatus, SizeLimitChecker};
///
/// let checker = SizeLimitChecker::new(1024);
/// assert_eq!(checker.check(100).status, LimitStatus::Pass);
/// assert_eq!(checker.check(1000).status, LimitStatus::Warning);
///
/// let over = checker.check(2048);
/// assert_eq!(over.exit_code(), 1);
/// assert!(over.message.starts_with("ERROR:"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SizeLimitChecker {
    limit_bytes: u64,
}

impl SizeLimitChecker {
    /// Checker for `limit_bytes`
    pub fn new(limit_bytes: u64) -> Self {
        Self { limit_bytes }
    }

    /// The configured limit
    pub fn limit(&self) -> u64 {
        self.limit_bytes
    }

    fn determine_status(&self, size_bytes: u64) -> LimitStatus {
        if size_bytes > self.limit_bytes {
            return LimitStatus::Exceeded;
        }
        let scaled_size = u128::from(size_bytes) * 100;
        let threshold = u128::from(self.limit_bytes) * u128::from(WARNING_THRESHOLD_PERCENT);
        if scaled_size > threshold {
            LimitStatus::Warning
        } else {
            LimitStatus::Pass
        }
    }

    /// Check `size_bytes` against the limit
    pub fn check(&self, size_bytes: u64) -> LimitResult {
        let status = self.determine_status(size_bytes);
        let size = format_bytes(size_bytes);
        let limit = format_bytes(self.limit_bytes);

        let message = match status {
            LimitStatus::Pass => format!("SUCCESS: Project size: {}", size),
            LimitStatus::Warning => format!(
                "SUCCESS: Project size: {} (within 10% of the maximum allowed size {})",
                size, limit
            ),
            LimitStatus::Exceeded => format!(
                "ERROR: Project is currently {}, which is {} larger than the maximum allowed size ({}).",
                size,
                format_bytes(size_bytes - self.limit_bytes),
                limit
            ),
        };

        LimitResult {
            status,
            size_bytes,
            limit_bytes: self.limit_bytes,
            message,
        }
    }
}
