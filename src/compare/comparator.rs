//! Branch comparison orchestrator
//!
//! Runs the phase sequence
//! `Initializing → BuildingCurrent → MeasuringCurrent → CleaningArtifacts →
//! BuildingTarget → MeasuringTarget → Reporting → Destroyed`, where any
//! failure jumps to `Failed` and destroy runs regardless.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::outcome::{ComparisonError, ComparisonOutcome};
use super::workdir::{CleanupError, WorkDir};
use crate::config::BundleCheckerParams;
use crate::git::GitRepository;
use crate::infra::{CommandExecutor, FileSystem, RealCommandExecutor, RealFileSystem};
use crate::measure::{
    measure_artifacts, ArtifactDiscovery, FsSizeProvider, GlobDiscovery, Measurement,
    SizeProvider,
};
use crate::pipeline::{ComparisonEvent, NoOpCollector, Phase, ProgressCollector, RevisionBuilder};
use crate::report::slug::NoSlug;
use crate::report::{ComparisonReport, SlugNormalizer};

/// Working tree a comparison builds in
enum WorkTree {
    /// Fresh clone in a scratch directory owned by this comparison
    Scratch(WorkDir),
    /// The caller's own checkout, to be put back afterwards
    Ambient {
        root: PathBuf,
        original_revision: String,
        stashed: bool,
    },
}

impl WorkTree {
    fn path(&self) -> &Path {
        match self {
            WorkTree::Scratch(dir) => dir.path(),
            WorkTree::Ambient { root, .. } => root,
        }
    }
}

type PhaseFailure = (Phase, ComparisonError);

/// Builds and measures two branches and diffs their artifact sizes.
///
/// # Examples
///
/// ```no_run
/// use bundle_checker::compare::BranchComparator;
/// use bundle_checker::config::BundleCheckerParams;
///
/// let params = BundleCheckerParams::builder()
///     .install_script("npm ci")
///     .build_script("npm run build")
///     .dist_path("dist")
///     .pattern("**/*.js")
///     .current_branch("feature")
///     .target_branch("master")
///     .build()?;
///
/// let outcome = BranchComparator::new(params).compare();
/// if let Some(report) = outcome.report() {
///     println!("{} bytes difference", report.total_delta());
/// }
/// # Ok::<(), bundle_checker::config::ConfigurationError>(())
/// ```
pub struct BranchComparator<
    FS: FileSystem = RealFileSystem,
    CE: CommandExecutor = RealCommandExecutor,
> {
    params: BundleCheckerParams,
    fs: FS,
    cmd_executor: CE,
    collector: Arc<dyn ProgressCollector>,
    discovery: Box<dyn ArtifactDiscovery>,
    sizer: Box<dyn SizeProvider>,
}

impl BranchComparator<RealFileSystem, RealCommandExecutor> {
    /// Comparator using the real filesystem, git and shell
    pub fn new(params: BundleCheckerParams) -> Self {
        Self::with_parts(params, RealFileSystem, RealCommandExecutor)
    }
}

impl<FS: FileSystem, CE: CommandExecutor> BranchComparator<FS, CE> {
    /// Comparator with injected filesystem and command executor
    pub fn with_parts(params: BundleCheckerParams, fs: FS, cmd_executor: CE) -> Self {
        Self {
            params,
            fs,
            cmd_executor,
            collector: Arc::new(NoOpCollector),
            discovery: Box::new(GlobDiscovery),
            sizer: Box::new(FsSizeProvider::new()),
        }
    }

    /// Report progress to `collector`
    pub fn with_collector(mut self, collector: Arc<dyn ProgressCollector>) -> Self {
        self.collector = collector;
        self
    }

    /// Expand patterns with `discovery`
    pub fn with_discovery(mut self, discovery: impl ArtifactDiscovery + 'static) -> Self {
        self.discovery = Box::new(discovery);
        self
    }

    /// Look up file sizes with `sizer`
    pub fn with_size_provider(mut self, sizer: impl SizeProvider + 'static) -> Self {
        self.sizer = Box::new(sizer);
        self
    }

    /// Parameters of this comparison
    pub fn params(&self) -> &BundleCheckerParams {
        &self.params
    }

    /// Run the comparison.
    ///
    /// Never panics and never returns early: every error ends up in the
    /// outcome, and the working tree is cleaned up on every path.
    pub fn compare(&self) -> ComparisonOutcome {
        let mut warnings = Vec::new();
        let normalizer = self.normalizer();

        self.enter(Phase::Initializing);
        let result = match self.prepare() {
            Ok(tree) => {
                let result = self.run(&tree, normalizer.as_ref(), &mut warnings);
                if let Err((phase, err)) = &result {
                    self.fail(*phase, err);
                }
                for warning in self.destroy(tree) {
                    self.warn(&warning);
                    warnings.push(warning);
                }
                result.map_err(|(_, err)| err)
            }
            Err(err) => {
                self.fail(Phase::Initializing, &err);
                Err(err)
            }
        };
        self.enter(Phase::Destroyed);

        ComparisonOutcome {
            result,
            cleanup_warnings: warnings,
            current_branch: self.params.current_branch.clone(),
            target_branch: self.params.target_branch.clone(),
        }
    }

    fn normalizer(&self) -> Box<dyn SlugNormalizer> {
        self.params.slug_strategy.normalizer().unwrap_or_else(|e| {
            log::warn!("invalid slug pattern, keeping file names as they are: {}", e);
            Box::new(NoSlug)
        })
    }

    fn prepare(&self) -> Result<WorkTree, ComparisonError> {
        if self.params.git_repository.is_some() {
            let scratch_root = &self.params.scratch_root;
            return WorkDir::create(&self.fs, scratch_root)
                .map(WorkTree::Scratch)
                .map_err(|source| ComparisonError::WorkDir {
                    path: scratch_root.clone(),
                    source,
                });
        }
        self.preserve_working_tree()
    }

    /// Remember the checked-out revision and stash local changes, so the
    /// caller's checkout can be restored after both builds.
    fn preserve_working_tree(&self) -> Result<WorkTree, ComparisonError> {
        let root = self.params.project_root.clone();
        let git = GitRepository::with_executor(&root, &self.cmd_executor);

        let original_revision = git.current_revision().map_err(ComparisonError::Preserve)?;
        let stashed = git.is_dirty().map_err(ComparisonError::Preserve)?;
        if stashed {
            git.stash_push().map_err(ComparisonError::Preserve)?;
            log::info!("stashed local changes in {}", root.display());
        }

        Ok(WorkTree::Ambient {
            root,
            original_revision,
            stashed,
        })
    }

    fn run(
        &self,
        tree: &WorkTree,
        normalizer: &dyn SlugNormalizer,
        warnings: &mut Vec<CleanupError>,
    ) -> Result<ComparisonReport, PhaseFailure> {
        let params = &self.params;

        if let (WorkTree::Scratch(dir), Some(repository)) = (tree, &params.git_repository) {
            log::info!("cloning {} into {}", repository, dir.path().display());
            GitRepository::with_executor(dir.path(), &self.cmd_executor)
                .clone_from(repository)
                .map_err(|source| {
                    let err = ComparisonError::Clone {
                        repository: repository.clone(),
                        source,
                    };
                    (Phase::Initializing, err)
                })?;
        }

        let builder = RevisionBuilder::new(
            tree.path(),
            &params.install_script,
            &params.build_script,
            &self.cmd_executor,
            self.collector.as_ref(),
        );

        self.enter(Phase::BuildingCurrent);
        builder
            .build_revision(&params.current_branch)
            .map_err(|e| (Phase::BuildingCurrent, e.into()))?;

        self.enter(Phase::MeasuringCurrent);
        let current = self.measure(tree.path(), &params.current_branch, normalizer);

        self.enter(Phase::CleaningArtifacts);
        for warning in self.remove_artifacts(&current.files) {
            self.warn(&warning);
            warnings.push(warning);
        }

        self.enter(Phase::BuildingTarget);
        builder
            .build_revision(&params.target_branch)
            .map_err(|e| (Phase::BuildingTarget, e.into()))?;

        self.enter(Phase::MeasuringTarget);
        let target = self.measure(tree.path(), &params.target_branch, normalizer);

        self.enter(Phase::Reporting);
        Ok(ComparisonReport::new(current.report, target.report))
    }

    fn measure(&self, work_dir: &Path, revision: &str, normalizer: &dyn SlugNormalizer) -> Measurement {
        let root = match &self.params.dist_path {
            Some(dist) => work_dir.join(dist),
            None => work_dir.to_path_buf(),
        };

        let measurement = measure_artifacts(
            &root,
            &self.params.target_files_pattern,
            self.discovery.as_ref(),
            self.sizer.as_ref(),
            normalizer,
        );

        self.collector.record_event(ComparisonEvent::BranchMeasured {
            revision: revision.to_string(),
            files: measurement.files.len(),
            total_bytes: measurement.report.total(),
        });
        measurement
    }

    fn remove_artifacts(&self, files: &[PathBuf]) -> Vec<CleanupError> {
        files
            .iter()
            .filter_map(|file| match self.fs.remove_file(file) {
                Ok(()) => None,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(source) => Some(CleanupError::Remove {
                    path: file.clone(),
                    source,
                }),
            })
            .collect()
    }

    fn destroy(&self, tree: WorkTree) -> Vec<CleanupError> {
        match tree {
            WorkTree::Scratch(dir) => dir.remove(&self.fs).err().into_iter().collect(),
            WorkTree::Ambient {
                root,
                original_revision,
                stashed,
            } => self.restore_working_tree(&root, &original_revision, stashed),
        }
    }

    fn restore_working_tree(&self, root: &Path, revision: &str, stashed: bool) -> Vec<CleanupError> {
        let git = GitRepository::with_executor(root, &self.cmd_executor);
        let mut warnings = Vec::new();

        if let Err(e) = git.reset_hard().and_then(|_| git.clean()) {
            warnings.push(CleanupError::Restore(e.to_string()));
        }

        if let Err(e) = git.checkout(revision) {
            warnings.push(CleanupError::Restore(e.to_string()));
            if stashed {
                warnings.push(CleanupError::Restore(
                    "local changes were left in `git stash`".to_string(),
                ));
            }
            return warnings;
        }

        if stashed {
            if let Err(e) = git.stash_pop() {
                warnings.push(CleanupError::Restore(e.to_string()));
            }
        }
        warnings
    }

    fn enter(&self, phase: Phase) {
        log::debug!("phase: {}", phase);
        self.collector
            .record_event(ComparisonEvent::PhaseEntered(phase));
    }

    fn fail(&self, phase: Phase, err: &ComparisonError) {
        log::error!("{} failed: {}", phase, err);
        self.collector.record_event(ComparisonEvent::Failed {
            phase,
            message: err.to_string(),
        });
        self.enter(Phase::Failed);
    }

    fn warn(&self, warning: &CleanupError) {
        log::warn!("{}", warning);
        self.collector
            .record_event(ComparisonEvent::CleanupWarning(warning.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::fakes::{failed_output, ok_output, RecordedCommand, ScriptedExecutor};
    use crate::measure::{DiscoveryError, MeasureError};
    use crate::pipeline::{BuildStep, MemoryCollector};
    use parking_lot::Mutex;
    use std::fs;
    use tempfile::TempDir;

    /// Fake git + shell: `git checkout` switches branch, the build script
    /// writes that branch's artifacts into `<cwd>/dist`.
    fn fake_project(
        artifacts: fn(&str) -> Vec<(&'static str, usize)>,
        failing_build_on: Option<&'static str>,
        status: &'static str,
    ) -> ScriptedExecutor {
        let branch = Arc::new(Mutex::new(String::from("feature")));
        ScriptedExecutor::with_responder(move |cmd: &RecordedCommand| {
            let args: Vec<&str> = cmd.args.iter().map(String::as_str).collect();
            match (cmd.program.as_str(), args.as_slice()) {
                ("git", ["checkout", revision]) => {
                    *branch.lock() = revision.to_string();
                    Ok(ok_output(""))
                }
                ("git", ["rev-parse", "--abbrev-ref", "HEAD"]) => Ok(ok_output("feature\n")),
                ("git", ["status", "--porcelain"]) => Ok(ok_output(status)),
                (_, [_, "build"]) => {
                    let current = branch.lock().clone();
                    if failing_build_on == Some(current.as_str()) {
                        return Ok(failed_output(2, "webpack: compilation failed"));
                    }
                    let dist = cmd.cwd.clone().unwrap_or_default().join("dist");
                    for (name, bytes) in artifacts(&current) {
                        let path = dist.join(name);
                        fs::create_dir_all(path.parent().unwrap())?;
                        fs::write(path, vec![b'x'; bytes])?;
                    }
                    Ok(ok_output(""))
                }
                _ => Ok(ok_output("")),
            }
        })
    }

    fn two_branches(branch: &str) -> Vec<(&'static str, usize)> {
        match branch {
            "master" => vec![("main.abc123.js", 1000), ("style.css", 150)],
            _ => vec![("main.def456.js", 1100), ("logo.jpg", 2000)],
        }
    }

    fn params(scratch: &Path, repository: Option<&str>) -> BundleCheckerParams {
        let mut builder = BundleCheckerParams::builder()
            .install_script("install")
            .build_script("build")
            .dist_path("dist")
            .patterns(["**/*.js", "**/*.css", "**/*.jpg"])
            .current_branch("feature")
            .target_branch("master")
            .project_root(scratch.join("project"))
            .scratch_root(scratch.join("runs"));
        if let Some(url) = repository {
            builder = builder.git_repository(url);
        }
        builder.build().unwrap()
    }

    fn remaining_runs(scratch: &Path) -> usize {
        fs::read_dir(scratch.join("runs"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[test]
    fn test_clone_mode_measures_both_branches() {
        let scratch = TempDir::new().unwrap();
        let executor = fake_project(two_branches, None, "");
        let collector = MemoryCollector::new();

        let outcome = BranchComparator::with_parts(
            params(scratch.path(), Some("https://example.com/app.git")),
            RealFileSystem,
            &executor,
        )
        .with_collector(Arc::new(collector.clone()))
        .compare();

        let report = outcome.report().expect("comparison should succeed");
        assert_eq!(report.current_branch_report.size_of("main.[HASH].js"), 1100);
        assert_eq!(report.current_branch_report.size_of("logo.jpg"), 2000);
        assert_eq!(report.target_branch_report.size_of("main.[HASH].js"), 1000);
        assert_eq!(report.target_branch_report.size_of("style.css"), 150);
        assert!(!report.target_branch_report.contains("logo.jpg"));
        assert!(outcome.cleanup_warnings.is_empty());

        assert_eq!(
            collector.phases(),
            vec![
                Phase::Initializing,
                Phase::BuildingCurrent,
                Phase::MeasuringCurrent,
                Phase::CleaningArtifacts,
                Phase::BuildingTarget,
                Phase::MeasuringTarget,
                Phase::Reporting,
                Phase::Destroyed,
            ]
        );

        let clones = executor
            .command_lines()
            .into_iter()
            .filter(|line| line.starts_with("git clone"))
            .count();
        assert_eq!(clones, 1);
        assert_eq!(remaining_runs(scratch.path()), 0);
    }

    /// Glob discovery that cannot expand `**/*.jpg`
    struct BrokenImagePattern;

    impl ArtifactDiscovery for BrokenImagePattern {
        fn expand(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
            if pattern.ends_with(".jpg") {
                return Err(DiscoveryError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source: glob::Pattern::new("[").unwrap_err(),
                });
            }
            GlobDiscovery.expand(root, pattern)
        }
    }

    /// Disk sizes, except stylesheets cannot be read
    struct UnreadableStylesheets;

    impl SizeProvider for UnreadableStylesheets {
        fn size_of(&self, path: &Path) -> Result<u64, MeasureError> {
            if path.extension().is_some_and(|ext| ext == "css") {
                return Err(MeasureError {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                });
            }
            FsSizeProvider::new().size_of(path)
        }
    }

    #[test]
    fn test_bad_pattern_and_unreadable_file_do_not_fail_comparison() {
        let scratch = TempDir::new().unwrap();
        let executor = fake_project(two_branches, None, "");

        let outcome = BranchComparator::with_parts(
            params(scratch.path(), Some("https://example.com/app.git")),
            RealFileSystem,
            &executor,
        )
        .with_discovery(BrokenImagePattern)
        .with_size_provider(UnreadableStylesheets)
        .compare();

        assert!(outcome.is_success(), "{:?}", outcome.error_message());
        let report = outcome.report().unwrap();
        assert_eq!(report.current_branch_report.size_of("main.[HASH].js"), 1100);
        assert!(!report.current_branch_report.contains("logo.jpg"));
        assert!(report.target_branch_report.contains("style.css"));
        assert_eq!(report.target_branch_report.size_of("style.css"), 0);
        assert_eq!(report.target_branch_report.size_of("main.[HASH].js"), 1000);
        assert!(outcome.cleanup_warnings.is_empty());
    }

    #[test]
    fn test_target_build_failure_leaves_no_scratch_dir() {
        let scratch = TempDir::new().unwrap();
        let executor = fake_project(two_branches, Some("master"), "");
        let collector = MemoryCollector::new();

        let outcome = BranchComparator::with_parts(
            params(scratch.path(), Some("https://example.com/app.git")),
            RealFileSystem,
            &executor,
        )
        .with_collector(Arc::new(collector.clone()))
        .compare();

        match outcome.error() {
            Some(ComparisonError::Build(err)) => {
                assert_eq!(err.step, BuildStep::Build);
                assert_eq!(err.revision, "master");
                assert!(err.message.contains("compilation failed"));
            }
            other => panic!("expected a build error, got {other:?}"),
        }
        assert_eq!(remaining_runs(scratch.path()), 0);

        let phases = collector.phases();
        assert!(phases.contains(&Phase::Failed));
        assert_eq!(phases.last(), Some(&Phase::Destroyed));
        assert!(!phases.contains(&Phase::Reporting));
    }

    #[test]
    fn test_clone_failure_is_fatal_and_cleaned_up() {
        let scratch = TempDir::new().unwrap();
        let executor = ScriptedExecutor::with_responder(|cmd| {
            if cmd.args.first().map(String::as_str) == Some("clone") {
                Ok(failed_output(128, "fatal: repository not found"))
            } else {
                Ok(ok_output(""))
            }
        });

        let outcome = BranchComparator::with_parts(
            params(scratch.path(), Some("https://example.com/missing.git")),
            RealFileSystem,
            &executor,
        )
        .compare();

        assert!(matches!(outcome.error(), Some(ComparisonError::Clone { .. })));
        assert!(outcome.error_message().unwrap().contains("repository not found"));
        assert_eq!(executor.calls().len(), 1);
        assert_eq!(remaining_runs(scratch.path()), 0);
    }

    #[test]
    fn test_ambient_mode_creates_no_scratch_dir() {
        let scratch = TempDir::new().unwrap();
        fs::create_dir_all(scratch.path().join("project")).unwrap();
        let executor = fake_project(two_branches, None, "");

        let outcome = BranchComparator::with_parts(
            params(scratch.path(), None),
            RealFileSystem,
            &executor,
        )
        .compare();

        assert!(outcome.is_success());
        assert!(!scratch.path().join("runs").exists());

        let lines = executor.command_lines();
        assert!(!lines.iter().any(|l| l.starts_with("git clone")));
        assert!(!lines.iter().any(|l| l.starts_with("git stash")));
        assert_eq!(lines.last().map(String::as_str), Some("git checkout feature"));
        assert!(executor
            .calls()
            .iter()
            .all(|c| c.cwd.as_deref() == Some(scratch.path().join("project").as_path())));
    }

    #[test]
    fn test_ambient_mode_stashes_and_restores_local_changes() {
        let scratch = TempDir::new().unwrap();
        fs::create_dir_all(scratch.path().join("project")).unwrap();
        let executor = fake_project(two_branches, Some("master"), " M src/app.js\n");

        let outcome = BranchComparator::with_parts(
            params(scratch.path(), None),
            RealFileSystem,
            &executor,
        )
        .compare();

        assert!(!outcome.is_success());
        let lines = executor.command_lines();
        let stash = lines
            .iter()
            .position(|l| l == "git stash push --include-untracked")
            .unwrap();
        let first_reset = lines.iter().position(|l| l == "git reset --hard").unwrap();
        assert!(stash < first_reset);
        assert_eq!(
            &lines[lines.len() - 4..],
            [
                "git reset --hard",
                "git clean -fd",
                "git checkout feature",
                "git stash pop"
            ]
        );
    }

    #[test]
    fn test_ambient_mode_outside_repository_touches_nothing() {
        let scratch = TempDir::new().unwrap();
        let executor = ScriptedExecutor::with_responder(|_| {
            Ok(failed_output(128, "fatal: not a git repository"))
        });

        let outcome = BranchComparator::with_parts(
            params(scratch.path(), None),
            RealFileSystem,
            &executor,
        )
        .compare();

        assert!(matches!(outcome.error(), Some(ComparisonError::Preserve(_))));
        assert!(!executor
            .command_lines()
            .iter()
            .any(|l| l.starts_with("git reset")));
    }

    #[test]
    fn test_failed_restore_is_a_warning_not_an_error() {
        let scratch = TempDir::new().unwrap();
        fs::create_dir_all(scratch.path().join("project")).unwrap();
        let checkouts = Arc::new(Mutex::new(0));
        let executor = ScriptedExecutor::with_responder(move |cmd| {
            let args: Vec<&str> = cmd.args.iter().map(String::as_str).collect();
            match args.as_slice() {
                ["rev-parse", "--abbrev-ref", "HEAD"] => Ok(ok_output("feature\n")),
                ["checkout", _] => {
                    let mut count = checkouts.lock();
                    *count += 1;
                    if *count == 3 {
                        Ok(failed_output(1, "error: your local changes would be overwritten"))
                    } else {
                        Ok(ok_output(""))
                    }
                }
                _ => Ok(ok_output("")),
            }
        });

        let outcome = BranchComparator::with_parts(
            params(scratch.path(), None),
            RealFileSystem,
            &executor,
        )
        .compare();

        assert!(outcome.is_success());
        assert_eq!(outcome.cleanup_warnings.len(), 1);
        assert!(outcome.cleanup_warnings[0]
            .to_string()
            .contains("would be overwritten"));
    }
}
