//! Command-line interface definition

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::config::ConfigFile;
use crate::fmt::parse_size;
use crate::report::slug::DEFAULT_HEX_PATTERN;
use crate::report::SlugStrategy;

/// Compare the build output size of two git branches
///
/// bundle-checker builds the current and the target branch one after the
/// other, measures the produced artifacts and reports the difference as
/// console tables, markdown or a pull-request comment.
#[derive(Parser, Debug)]
#[command(name = "bundle-checker", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI or accessibility)
    #[arg(long, global = true)]
    pub no_emoji: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// bundle-checker subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build two branches and compare their bundle sizes
    Compare(CompareArgs),

    /// Check the current build output against a size limit
    Check(CheckArgs),

    /// Write a starter .bundle-checker.toml
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Slug strategies selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlugArg {
    /// Replace the last dot segment after the base name, skipping `min`
    LastSegment,
    /// Replace dot segments that look like hex hashes
    HexPattern,
    /// Keep file names as they are
    Disabled,
}

/// Flags shared by every command that measures artifacts
#[derive(Args, Debug, Clone, Default)]
pub struct ArtifactArgs {
    /// Directory build output lives under (relative to the working tree)
    #[arg(long, value_name = "DIR")]
    pub dist_path: Option<String>,

    /// Glob selecting artifacts to count (repeatable)
    #[arg(short, long = "pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// Maximum allowed total size (bytes, or with a unit such as 1.5MB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub size_limit: Option<u64>,

    /// Project directory containing .bundle-checker.toml
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,
}

/// `bundle-checker compare` flags
#[derive(Args, Debug, Clone, Default)]
pub struct CompareArgs {
    /// Shell command that builds the artifacts
    #[arg(long, value_name = "CMD")]
    pub build_script: Option<String>,

    /// Shell command that installs dependencies
    #[arg(long, value_name = "CMD")]
    pub install_script: Option<String>,

    /// Clone this repository into a scratch directory instead of using the project checkout
    #[arg(long, value_name = "URL")]
    pub git_repository: Option<String>,

    /// Branch under review (defaults to the checked-out branch)
    #[arg(long, value_name = "BRANCH")]
    pub current_branch: Option<String>,

    /// Branch to compare against
    #[arg(long, value_name = "BRANCH")]
    pub target_branch: Option<String>,

    /// How build hashes in file names are normalized
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub slugs: Option<SlugArg>,

    /// Artifact selection and size limit
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Print the markdown comment body instead of console tables
    #[arg(long, conflicts_with = "json")]
    pub markdown: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Post (or update) a comment on the pull request named by the CI environment
    #[arg(long)]
    pub comment: bool,

    /// Hide the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

/// `bundle-checker check` flags
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Artifact selection and size limit
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Run the configured build script before measuring
    #[arg(long)]
    pub build: bool,

    /// Override the build script used with --build
    #[arg(long, value_name = "CMD", requires = "build")]
    pub build_script: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl SlugArg {
    /// Strategy with default settings
    pub fn strategy(self) -> SlugStrategy {
        match self {
            SlugArg::LastSegment => SlugStrategy::LastSegment,
            SlugArg::HexPattern => SlugStrategy::HexPattern {
                pattern: DEFAULT_HEX_PATTERN.to_string(),
            },
            SlugArg::Disabled => SlugStrategy::Disabled,
        }
    }
}

impl ArtifactArgs {
    fn overrides(&self) -> ConfigFile {
        ConfigFile {
            dist_path: self.dist_path.clone(),
            target_files_pattern: Some(self.patterns.clone()),
            size_limit: self.size_limit,
            ..ConfigFile::default()
        }
    }
}

impl CompareArgs {
    /// Flags as a config layer to merge over the file
    pub fn overrides(&self) -> ConfigFile {
        ConfigFile {
            install_script: self.install_script.clone(),
            build_script: self.build_script.clone(),
            git_repository: self.git_repository.clone(),
            current_branch: self.current_branch.clone(),
            target_branch: self.target_branch.clone(),
            slugs: self.slugs.map(SlugArg::strategy),
            ..self.artifacts.overrides()
        }
    }
}

impl CheckArgs {
    /// Flags as a config layer to merge over the file
    pub fn overrides(&self) -> ConfigFile {
        ConfigFile {
            build_script: self.build_script.clone(),
            ..self.artifacts.overrides()
        }
    }
}
