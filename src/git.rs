//! Git operations against an explicit working tree

use std::path::{Path, PathBuf};

use crate::infra::{failure_message, CommandExecutor, RealCommandExecutor};
use thiserror::Error;

/// Git operation errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Git exited non-zero
    #[error("git {command} failed: {message}")]
    CommandFailed {
        /// Subcommand and arguments
        command: String,
        /// Captured stderr (or stdout)
        message: String,
    },

    /// The working directory is not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Git output contained invalid UTF-8
    #[error("Invalid UTF-8 in git output")]
    InvalidUtf8,

    /// Git could not be spawned
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Git repository interface with dependency injection for testability
pub struct GitRepository<CE: CommandExecutor = RealCommandExecutor> {
    work_dir: PathBuf,
    cmd_executor: CE,
}

impl GitRepository<RealCommandExecutor> {
    /// Operate on `work_dir` with real command execution
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            cmd_executor: RealCommandExecutor,
        }
    }
}

impl<CE: CommandExecutor> GitRepository<CE> {
    /// Create a GitRepository with a custom command executor (for testing)
    pub fn with_executor(work_dir: impl Into<PathBuf>, cmd_executor: CE) -> Self {
        Self {
            work_dir: work_dir.into(),
            cmd_executor,
        }
    }

    /// Directory every command runs in
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn git(&self, args: &[&str]) -> Result<String, GitError> {
        let work_dir = &self.work_dir;
        let output = self
            .cmd_executor
            .execute(|cmd| cmd.current_dir(work_dir).args(args), "git")?;

        if !output.status.success() {
            let message = failure_message(&output);
            if message.contains("not a git repository") {
                return Err(GitError::NotARepository(self.work_dir.clone()));
            }
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                message,
            });
        }

        String::from_utf8(output.stdout).map_err(|_| GitError::InvalidUtf8)
    }

    /// `git clone -- <url> .` into the (empty) working directory
    pub fn clone_from(&self, url: &str) -> Result<(), GitError> {
        self.git(&["clone", "--", url, "."]).map(drop)
    }

    /// Discard changes to tracked files
    pub fn reset_hard(&self) -> Result<(), GitError> {
        self.git(&["reset", "--hard"]).map(drop)
    }

    /// Remove untracked files and directories
    pub fn clean(&self) -> Result<(), GitError> {
        self.git(&["clean", "-fd"]).map(drop)
    }

    /// Check out a branch or revision
    pub fn checkout(&self, revision: &str) -> Result<(), GitError> {
        self.git(&["checkout", revision]).map(drop)
    }

    /// Whether the tree has uncommitted or untracked changes
    pub fn is_dirty(&self) -> Result<bool, GitError> {
        Ok(!self.git(&["status", "--porcelain"])?.trim().is_empty())
    }

    /// Stash local changes including untracked files
    pub fn stash_push(&self) -> Result<(), GitError> {
        self.git(&["stash", "push", "--include-untracked"]).map(drop)
    }

    /// Re-apply the most recent stash
    pub fn stash_pop(&self) -> Result<(), GitError> {
        self.git(&["stash", "pop"]).map(drop)
    }

    /// Full hash of the checked-out commit
    pub fn get_commit_hash(&self) -> Result<String, GitError> {
        Ok(self.git(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    /// Branch name, or the commit hash when HEAD is detached
    pub fn current_revision(&self) -> Result<String, GitError> {
        match self.get_branch_name()? {
            Some(branch) if branch != "HEAD" => Ok(branch),
            Some(_) => self.get_commit_hash(),
            None => Err(GitError::NotARepository(self.work_dir.clone())),
        }
    }

    /// Get current git branch name
    ///
    /// Returns `Ok(Some(branch))` inside a repository, `Ok(None)` when the
    /// directory is not a repository or git is missing.
    pub fn get_branch_name(&self) -> Result<Option<String>, GitError> {
        match self.git(&["rev-parse", "--abbrev-ref", "HEAD"]) {
            Ok(stdout) => Ok(Some(stdout.trim().to_string())),
            Err(GitError::NotARepository(_)) => Ok(None),
            Err(GitError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
