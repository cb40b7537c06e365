//! Completions command implementation
//!
//! Handles the `bundle-checker completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Generate shell completion scripts
///
/// Outputs the completion script for `shell` to stdout.
///
/// # Examples
///
/// ```bash
/// # Bash
/// bundle-checker completions bash > /etc/bash_completion.d/bundle-checker
///
/// # Zsh
/// bundle-checker completions zsh > ~/.zfunc/_bundle-checker
/// ```
pub fn cmd_completions(shell: Shell) {
    write_completions(shell, &mut std::io::stdout());
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    generate(shell, &mut Cli::command(), "bundle-checker", out);
}
