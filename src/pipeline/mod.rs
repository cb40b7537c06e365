//! Revision build pipeline
//!
//! Builds one revision of the project in a working tree:
//! 1. `git reset --hard` and `git clean -fd`
//! 2. `git checkout <revision>`
//! 3. the install script
//! 4. the build script
//!
//! Progress is reported through a pluggable [`ProgressCollector`].

pub mod error;
pub mod revision_builder;
pub mod script_runner;
pub mod telemetry;

pub use error::{BuildError, BuildStep, ScriptError};
pub use revision_builder::RevisionBuilder;
pub use script_runner::{shell_command, ScriptRunner};
pub use telemetry::{
    ComparisonEvent, MemoryCollector, NoOpCollector, Phase, ProgressCollector, SpinnerCollector,
};
