//! Result of one branch comparison

use std::path::PathBuf;

use thiserror::Error;

use super::workdir::CleanupError;
use crate::git::GitError;
use crate::pipeline::BuildError;
use crate::report::ComparisonReport;

/// A comparison aborted before producing a report
#[derive(Debug, Error)]
pub enum ComparisonError {
    /// The scratch directory could not be created
    #[error("could not create work directory {}: {source}", path.display())]
    WorkDir {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Cloning the repository failed
    #[error("could not clone {repository}: {source}")]
    Clone {
        /// Repository URL
        repository: String,
        /// Git failure
        source: GitError,
    },

    /// One revision failed to build
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Local changes in the working tree could not be set aside
    #[error("could not preserve the working tree: {0}")]
    Preserve(GitError),
}

/// Everything `compare()` produced: the report or the fatal error, plus
/// whatever went wrong while cleaning up.
#[derive(Debug)]
pub struct ComparisonOutcome {
    /// Report, or the error that aborted the comparison
    pub result: Result<ComparisonReport, ComparisonError>,
    /// Non-fatal cleanup failures, in the order they happened
    pub cleanup_warnings: Vec<CleanupError>,
    /// Branch under review
    pub current_branch: String,
    /// Branch compared against
    pub target_branch: String,
}

impl ComparisonOutcome {
    /// Whether a report was produced
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The report, if the comparison succeeded
    pub fn report(&self) -> Option<&ComparisonReport> {
        self.result.as_ref().ok()
    }

    /// The fatal error, if the comparison failed
    pub fn error(&self) -> Option<&ComparisonError> {
        self.result.as_ref().err()
    }

    /// Message shown in the error row of a failed comparison
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::BuildStep;
    use crate::report::FileSizeReport;

    fn outcome(result: Result<ComparisonReport, ComparisonError>) -> ComparisonOutcome {
        ComparisonOutcome {
            result,
            cleanup_warnings: Vec::new(),
            current_branch: "feature".to_string(),
            target_branch: "master".to_string(),
        }
    }

    #[test]
    fn test_successful_outcome_exposes_report() {
        let report = ComparisonReport::new(
            [("a.js", 10)].into_iter().collect(),
            FileSizeReport::new(),
        );
        let outcome = outcome(Ok(report));
        assert!(outcome.is_success());
        assert_eq!(outcome.report().map(|r| r.total_delta()), Some(10));
        assert!(outcome.error_message().is_none());
    }

    #[test]
    fn test_build_error_message_passes_through() {
        let err = BuildError::new(BuildStep::Build, "master", "exit code 2");
        let outcome = outcome(Err(err.into()));
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.error_message().unwrap(),
            "build step failed for revision 'master': exit code 2"
        );
    }
}
