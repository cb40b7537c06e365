//! Configuration management for bundle-checker
//!
//! This module provides:
//! - `.bundle-checker.toml` config file support
//! - merging of CLI overrides onto file values
//! - validated, immutable run parameters

pub mod file;
pub mod loader;
pub mod params;
pub mod resolver;

pub use file::{ConfigFile, CONFIG_FILE_NAME, DEFAULT_TARGET_FILES_PATTERN};
pub use loader::ConfigLoader;
pub use params::{BundleCheckerParams, BundleCheckerParamsBuilder, ConfigurationError};
pub use resolver::ConfigResolver;
