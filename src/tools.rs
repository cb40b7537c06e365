//! Tool detection and verification
//!
//! Detects the external programs a comparison shells out to:
//! - git (required for `compare`)
//! - gh, the GitHub CLI (required only when posting a comment)

use thiserror::Error;

use crate::infra::{CommandExecutor, RealCommandExecutor};

/// Errors that can occur during tool operations
#[derive(Error, Debug)]
pub enum ToolError {
    /// I/O error during tool execution
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool ran but reported a failure
    #[error("Failed to get version for {0}")]
    VersionFailed(String),

    /// Required tool is missing
    #[error("Required tool missing: {name}")]
    MissingTool {
        /// Human-readable tool name
        name: &'static str,
        /// How to install it
        install_hint: &'static str,
    },
}

/// An external program with detection capabilities
#[derive(Debug)]
pub struct Tool<CE: CommandExecutor = RealCommandExecutor> {
    /// Human-readable name
    pub name: &'static str,
    /// Binary name in PATH
    pub binary: &'static str,
    /// Flag to get version (e.g., "--version")
    pub version_flag: &'static str,
    /// Installation instructions
    pub install_hint: &'static str,
    cmd_executor: CE,
}

impl<CE: CommandExecutor> Tool<CE> {
    /// Create a new Tool with a custom command executor
    pub fn with_executor(
        name: &'static str,
        binary: &'static str,
        version_flag: &'static str,
        install_hint: &'static str,
        cmd_executor: CE,
    ) -> Self {
        Self {
            name,
            binary,
            version_flag,
            install_hint,
            cmd_executor,
        }
    }

    /// First line of the tool's version output
    pub fn version(&self) -> Result<String, ToolError> {
        let output = self
            .cmd_executor
            .execute(|cmd| cmd.arg(self.version_flag), self.binary)?;

        if !output.status.success() {
            return Err(ToolError::VersionFailed(self.name.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string())
    }

    /// Fail with [`ToolError::MissingTool`] unless the tool runs
    pub fn require(&self) -> Result<String, ToolError> {
        self.version().map_err(|e| {
            log::debug!("{} check failed: {}", self.binary, e);
            ToolError::MissingTool {
                name: self.name,
                install_hint: self.install_hint,
            }
        })
    }
}

/// The programs bundle-checker drives
pub struct ToolChain<CE: CommandExecutor = RealCommandExecutor> {
    /// git (required)
    pub git: Tool<CE>,
    /// GitHub CLI (pull-request comments only)
    pub gh: Tool<CE>,
}

impl Default for ToolChain<RealCommandExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolChain<RealCommandExecutor> {
    /// Create a new ToolChain with real command execution
    pub fn new() -> Self {
        Self::with_executor(RealCommandExecutor)
    }
}

impl<CE: CommandExecutor + Clone> ToolChain<CE> {
    /// Create a new ToolChain with a custom command executor
    pub fn with_executor(cmd_executor: CE) -> Self {
        Self {
            git: Tool::with_executor(
                "git",
                "git",
                "--version",
                "https://git-scm.com/downloads",
                cmd_executor.clone(),
            ),
            gh: Tool::with_executor(
                "GitHub CLI",
                "gh",
                "--version",
                "https://cli.github.com (brew install gh / apt install gh)",
                cmd_executor,
            ),
        }
    }
}

impl<CE: CommandExecutor> ToolChain<CE> {
    /// Verify the tools a run needs; `gh` only when `commenting`.
    pub fn check_required(&self, commenting: bool) -> Result<(), ToolError> {
        self.git.require()?;
        if commenting {
            self.gh.require()?;
        }
        Ok(())
    }
}
