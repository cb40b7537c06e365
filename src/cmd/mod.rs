//! Command handlers for the bundle-checker CLI
//!
//! Each submodule handles one subcommand.

pub mod check;
pub mod compare;
pub mod completions;
pub mod init;

pub use check::cmd_check;
pub use compare::cmd_compare;
pub use completions::cmd_completions;
pub use init::cmd_init;
