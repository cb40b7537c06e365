//! Configuration file loading and saving

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::error::BundleCheckerError;
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use std::path::Path;

const CONFIG_HEADER: &str = "\
# bundle-checker configuration
#
# Command-line flags override the values below.
# size-limit is in bytes; slugs.strategy is one of
# \"last-segment\", \"hex-pattern\" or \"disabled\".

";

/// Handles loading and saving configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from .bundle-checker.toml in the given directory
    ///
    /// A missing file yields the default (empty) configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bundle_checker::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("build script: {:?}", config.build_script);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(project_root: &Path) -> Result<ConfigFile> {
        Self::load_with_fs(project_root, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(project_root: &Path, fs: &FS) -> Result<ConfigFile> {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no {} in {}", CONFIG_FILE_NAME, project_root.display());
                return Ok(ConfigFile::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", CONFIG_FILE_NAME));
            }
        };

        toml_edit::de::from_str(&contents)
            .map_err(|e| BundleCheckerError::InvalidConfigFile {
                path: config_path.clone(),
                message: e.to_string(),
            })
            .with_context(|| format!("Failed to parse {}", CONFIG_FILE_NAME))
    }

    /// Render a config as commented TOML
    pub fn render(config: &ConfigFile) -> Result<String> {
        let body = toml_edit::ser::to_string_pretty(config).context("Failed to serialize config")?;
        Ok(format!("{}{}", CONFIG_HEADER, body))
    }

    /// Save config to .bundle-checker.toml in the given directory
    pub fn save(config: &ConfigFile, project_root: &Path) -> Result<()> {
        Self::save_with_fs(config, project_root, &RealFileSystem)
    }

    /// Save config with a custom filesystem implementation
    pub fn save_with_fs<FS: FileSystem>(
        config: &ConfigFile,
        project_root: &Path,
        fs: &FS,
    ) -> Result<()> {
        let config_path = project_root.join(CONFIG_FILE_NAME);
        let contents = Self::render(config)?;

        fs.write(&config_path, contents.as_bytes())
            .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

        Ok(())
    }

    /// Check if config file exists in project
    pub fn exists(project_root: &Path) -> bool {
        project_root.join(CONFIG_FILE_NAME).exists()
    }
}
