//! Error types for the revision build pipeline

use std::fmt;

use thiserror::Error;

/// Step of a revision build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStep {
    /// `git reset --hard`
    Reset,
    /// `git clean -fd`
    Clean,
    /// `git checkout <revision>`
    Checkout,
    /// Dependency installation script
    Install,
    /// Build script
    Build,
}

impl BuildStep {
    /// Steps in execution order
    pub const ALL: [BuildStep; 5] = [
        BuildStep::Reset,
        BuildStep::Clean,
        BuildStep::Checkout,
        BuildStep::Install,
        BuildStep::Build,
    ];

    /// Short lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStep::Reset => "reset",
            BuildStep::Clean => "clean",
            BuildStep::Checkout => "checkout",
            BuildStep::Install => "install",
            BuildStep::Build => "build",
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A revision could not be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{step} step failed for revision '{revision}': {message}")]
pub struct BuildError {
    /// Step that failed
    pub step: BuildStep,
    /// Revision being built
    pub revision: String,
    /// Captured stderr, stdout or spawn error
    pub message: String,
}

impl BuildError {
    /// Build an error from any displayable cause
    pub fn new(step: BuildStep, revision: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            step,
            revision: revision.into(),
            message: cause.to_string(),
        }
    }
}

/// A shell script could not be run to completion
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The shell could not be spawned
    #[error("could not start `{script}`: {source}")]
    Spawn {
        /// Script text
        script: String,
        /// Spawn error
        source: std::io::Error,
    },

    /// The script exited non-zero
    #[error("`{script}` failed: {message}")]
    Failed {
        /// Script text
        script: String,
        /// Exit code when the process was not killed by a signal
        code: Option<i32>,
        /// Captured stderr (or stdout)
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_message_names_step_and_revision() {
        let err = BuildError::new(BuildStep::Install, "feature/login", "npm ERR! 404");
        assert_eq!(
            err.to_string(),
            "install step failed for revision 'feature/login': npm ERR! 404"
        );
    }

    #[test]
    fn test_steps_are_ordered() {
        let names: Vec<_> = BuildStep::ALL.iter().map(BuildStep::as_str).collect();
        assert_eq!(names, vec!["reset", "clean", "checkout", "install", "build"]);
    }

    #[test]
    fn test_script_error_display() {
        let err = ScriptError::Failed {
            script: "yarn build".to_string(),
            code: Some(2),
            message: "exited with exit status: 2".to_string(),
        };
        assert_eq!(err.to_string(), "`yarn build` failed: exited with exit status: 2");
    }
}
