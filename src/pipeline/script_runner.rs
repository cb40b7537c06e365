//! Shell script execution for install and build steps

use std::path::Path;
use std::process::Command;

use crate::infra::{failure_message, CommandExecutor};

use super::error::ScriptError;

/// Shell program and flag used to run a script string
#[cfg(not(windows))]
const SHELL: (&str, &str) = ("sh", "-c");

/// Shell program and flag used to run a script string
#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");

/// Build the command that runs `script` through the platform shell in `dir`.
pub fn shell_command(script: &str, dir: &Path) -> Command {
    let (program, flag) = SHELL;
    let mut cmd = Command::new(program);
    cmd.arg(flag).arg(script).current_dir(dir);
    cmd
}

/// Runs user-supplied scripts through an injected executor
pub struct ScriptRunner<CE: CommandExecutor> {
    cmd_executor: CE,
}

impl<CE: CommandExecutor> ScriptRunner<CE> {
    /// Create a runner around `cmd_executor`
    pub fn new(cmd_executor: CE) -> Self {
        Self { cmd_executor }
    }

    /// Run `script` in `dir`, returning its stdout on success.
    pub fn run(&self, script: &str, dir: &Path) -> Result<String, ScriptError> {
        let output = self
            .cmd_executor
            .output(&mut shell_command(script, dir))
            .map_err(|source| ScriptError::Spawn {
                script: script.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            return Err(ScriptError::Failed {
                script: script.to_string(),
                code: output.status.code(),
                message: failure_message(&output),
            });
        }

        if !stdout.trim().is_empty() {
            log::debug!("`{}` output:\n{}", script, stdout.trim_end());
        }
        Ok(stdout)
    }
}
