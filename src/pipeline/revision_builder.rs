//! Builds a single revision in a working tree
//!
//! Every build starts from a pristine tree: tracked changes are reset and
//! untracked files removed before checkout, so artifacts from the previous
//! build can neither block the checkout nor leak into the next measurement.

use std::path::{Path, PathBuf};

use crate::git::GitRepository;
use crate::infra::CommandExecutor;

use super::error::{BuildError, BuildStep};
use super::script_runner::ScriptRunner;
use super::telemetry::{ComparisonEvent, ProgressCollector};

/// Reset, clean, checkout, install and build one revision
pub struct RevisionBuilder<'a, CE: CommandExecutor> {
    git: GitRepository<&'a CE>,
    scripts: ScriptRunner<&'a CE>,
    work_dir: PathBuf,
    install_script: &'a str,
    build_script: &'a str,
    collector: &'a dyn ProgressCollector,
}

impl<'a, CE: CommandExecutor> RevisionBuilder<'a, CE> {
    /// Create a builder operating on `work_dir`
    pub fn new(
        work_dir: &Path,
        install_script: &'a str,
        build_script: &'a str,
        cmd_executor: &'a CE,
        collector: &'a dyn ProgressCollector,
    ) -> Self {
        Self {
            git: GitRepository::with_executor(work_dir, cmd_executor),
            scripts: ScriptRunner::new(cmd_executor),
            work_dir: work_dir.to_path_buf(),
            install_script,
            build_script,
            collector,
        }
    }

    /// Build `revision`, stopping at the first failing step.
    pub fn build_revision(&self, revision: &str) -> Result<(), BuildError> {
        for step in BuildStep::ALL {
            self.collector.record_event(ComparisonEvent::StepStarted {
                step,
                revision: revision.to_string(),
            });
            log::info!("{} {}", step, revision);
            self.run_step(step, revision)?;
        }
        Ok(())
    }

    fn run_step(&self, step: BuildStep, revision: &str) -> Result<(), BuildError> {
        let fail = |cause: &dyn std::fmt::Display| BuildError::new(step, revision, cause);
        match step {
            BuildStep::Reset => self.git.reset_hard().map_err(|e| fail(&e)),
            BuildStep::Clean => self.git.clean().map_err(|e| fail(&e)),
            BuildStep::Checkout => self.git.checkout(revision).map_err(|e| fail(&e)),
            BuildStep::Install => self
                .scripts
                .run(self.install_script, &self.work_dir)
                .map(drop)
                .map_err(|e| fail(&e)),
            BuildStep::Build => self
                .scripts
                .run(self.build_script, &self.work_dir)
                .map(drop)
                .map_err(|e| fail(&e)),
        }
    }
}
