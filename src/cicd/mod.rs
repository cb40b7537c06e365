//! CI integration
//!
//! Provides:
//! - Size limit enforcement with a warning band
//! - JSON output for CI tooling
//! - Exit codes for automated workflows

pub mod budget;
pub mod output;

pub use budget::{LimitResult, LimitStatus, SizeLimitChecker};
pub use output::{CheckJsonOutput, JsonOutput};
