//! Compare command implementation
//!
//! Handles `bundle-checker compare`: resolves parameters, runs the branch
//! comparison, prints the report and optionally posts it to the pull request.

use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;

use crate::cicd::{JsonOutput, LimitResult, SizeLimitChecker};
use crate::cli::CompareArgs;
use crate::compare::{BranchComparator, ComparisonOutcome};
use crate::config::{BundleCheckerParams, ConfigLoader, ConfigResolver};
use crate::error::BundleCheckerError;
use crate::fmt::{icon, CHART, INFO, PACKAGE, WARNING};
use crate::git::GitRepository;
use crate::notify::{CommentAction, GitHubCliSink, PullRequestTarget};
use crate::pipeline::{ProgressCollector, SpinnerCollector};
use crate::report::{ReportContent, ReportPresenter};
use crate::tools::ToolChain;

/// Compare the bundle size of two branches
///
/// # Examples
///
/// ```no_run
/// use bundle_checker::cli::CompareArgs;
/// use bundle_checker::cmd::cmd_compare;
///
/// let args = CompareArgs {
///     install_script: Some("yarn".into()),
///     build_script: Some("yarn build".into()),
///     target_branch: Some("master".into()),
///     ..CompareArgs::default()
/// };
/// cmd_compare(&args)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - a required parameter is missing
/// - git (or gh with `--comment`) is not installed
/// - either branch fails to clone, check out, install or build
/// - the current branch exceeds the size limit
pub fn cmd_compare(args: &CompareArgs) -> Result<()> {
    let params = resolve_params(args)?;
    ToolChain::new()
        .check_required(args.comment)
        .map_err(BundleCheckerError::from)?;

    let quiet = args.json || args.markdown;
    if !quiet {
        println!(
            "{} {} {} {} {}",
            icon(PACKAGE),
            style("bundle-checker").bold(),
            style(&params.current_branch).cyan(),
            style("vs").dim(),
            style(&params.target_branch).cyan()
        );
        println!();
    }

    let spinner = Arc::new(SpinnerCollector::new(!quiet && !args.no_progress));
    let outcome = BranchComparator::new(params.clone())
        .with_collector(spinner.clone())
        .compare();
    spinner.finish();

    for warning in &outcome.cleanup_warnings {
        eprintln!("{} {}", icon(WARNING), style(warning).yellow());
    }

    let limit = params.size_limit.zip(outcome.report()).map(|(limit, report)| {
        SizeLimitChecker::new(limit).check(report.current_branch_report.total())
    });

    let failure = outcome.error_message();
    let content = match (outcome.report(), failure.as_deref()) {
        (Some(report), _) => ReportContent::Sizes(report),
        (None, message) => ReportContent::Failure(message.unwrap_or_default()),
    };
    let presenter = ReportPresenter::new(&params.current_branch, &params.target_branch);

    if args.json {
        let mut output = JsonOutput::from_outcome(&outcome);
        if let Some(result) = &limit {
            output = output.with_limit(result);
        }
        println!("{}", output.to_json().context("Failed to serialize JSON output")?);
    } else if args.markdown {
        println!("{}", presenter.markdown(content));
    } else {
        println!("{}", presenter.console_tables(content));
        if let Some(result) = &limit {
            println!();
            result.print();
        }
    }

    if args.comment {
        post_comment(&presenter, content, quiet);
    }

    finish(&outcome, limit.as_ref())
}

fn resolve_params(args: &CompareArgs) -> Result<BundleCheckerParams> {
    let root = &args.artifacts.project_root;
    let config = ConfigLoader::load(root)?.merged_with(args.overrides());

    let detected = GitRepository::new(root)
        .get_branch_name()
        .ok()
        .flatten()
        .filter(|branch| branch != "HEAD");
    log::debug!("checked-out branch: {:?}", detected);

    ConfigResolver::resolve(&config, root, detected)
        .map_err(|e| BundleCheckerError::from(e).into())
}

/// Publishing failures never fail the run.
fn post_comment(presenter: &ReportPresenter, content: ReportContent<'_>, quiet: bool) {
    let published = PullRequestTarget::from_env()
        .and_then(|target| presenter.publish(content, &GitHubCliSink::new(target)));

    match published {
        Ok(action) if !quiet => {
            let verb = match action {
                CommentAction::Created => "Posted".to_string(),
                CommentAction::Updated(id) => format!("Updated comment {} on", id),
            };
            println!("\n{} {} the pull request", icon(CHART), verb);
        }
        Ok(_) => {}
        Err(e) => {
            log::warn!("could not comment on the pull request: {}", e);
            eprintln!(
                "{} {} {}",
                icon(INFO),
                style("Could not comment on the pull request:").yellow(),
                e
            );
        }
    }
}

fn finish(outcome: &ComparisonOutcome, limit: Option<&LimitResult>) -> Result<()> {
    if let Some(message) = outcome.error_message() {
        return Err(BundleCheckerError::ComparisonFailed { message }.into());
    }
    match limit {
        Some(result) if result.is_exceeded() => Err(BundleCheckerError::SizeLimitExceeded {
            actual: result.size_bytes,
            limit: result.limit_bytes,
        }
        .into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ArtifactArgs;
    use crate::error::ErrorFormatter;
    use crate::pipeline::{BuildError, BuildStep};
    use crate::report::ComparisonReport;
    use tempfile::TempDir;

    fn outcome(result: Result<ComparisonReport, crate::compare::ComparisonError>) -> ComparisonOutcome {
        ComparisonOutcome {
            result,
            cleanup_warnings: Vec::new(),
            current_branch: "feature".to_string(),
            target_branch: "master".to_string(),
        }
    }

    #[test]
    fn test_missing_parameters_fail_before_any_side_effect() {
        let dir = TempDir::new().unwrap();
        let args = CompareArgs {
            artifacts: ArtifactArgs {
                project_root: dir.path().to_path_buf(),
                ..ArtifactArgs::default()
            },
            ..CompareArgs::default()
        };

        let err = cmd_compare(&args).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Input: missing build-script.");
        assert_eq!(ErrorFormatter::exit_code(&err), 64);
    }

    #[test]
    fn test_failed_comparison_exits_with_one() {
        let err = BuildError::new(BuildStep::Build, "master", "boom");
        let err = finish(&outcome(Err(err.into())), None).unwrap_err();
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
        assert!(err.to_string().contains("build step failed"));
    }

    #[test]
    fn test_exceeded_limit_fails_successful_comparison() {
        let ok = outcome(Ok(ComparisonReport::default()));
        assert!(finish(&ok, None).is_ok());

        let over = SizeLimitChecker::new(10).check(20);
        let err = finish(&ok, Some(&over)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BundleCheckerError>(),
            Some(BundleCheckerError::SizeLimitExceeded { actual: 20, limit: 10 })
        ));
    }
}
