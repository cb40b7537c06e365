//! Configuration file data structures

use serde::{Deserialize, Serialize};

use crate::report::SlugStrategy;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".bundle-checker.toml";

/// Patterns used when none are configured
pub const DEFAULT_TARGET_FILES_PATTERN: [&str; 2] = ["**/*.js", "**/*.css"];

/// bundle-checker configuration file structure
///
/// Every field is optional here; required values are enforced when the file
/// is turned into [`BundleCheckerParams`](super::BundleCheckerParams), after
/// CLI flags have been merged in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    /// Shell command that installs dependencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_script: Option<String>,

    /// Shell command that produces the build output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_script: Option<String>,

    /// Directory the build output lives under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist_path: Option<String>,

    /// Glob patterns selecting counted artifacts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_files_pattern: Option<Vec<String>>,

    /// Repository to clone into a scratch directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_repository: Option<String>,

    /// Branch under review
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_branch: Option<String>,

    /// Branch compared against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,

    /// Size limit in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<u64>,

    /// Hash slug normalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slugs: Option<SlugStrategy>,
}

impl ConfigFile {
    /// Values written by `bundle-checker init`
    pub fn starter() -> Self {
        Self {
            install_script: Some("npm ci".to_string()),
            build_script: Some("npm run build".to_string()),
            dist_path: Some("dist".to_string()),
            target_files_pattern: Some(
                DEFAULT_TARGET_FILES_PATTERN
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
            ),
            git_repository: None,
            current_branch: None,
            target_branch: Some("master".to_string()),
            size_limit: None,
            slugs: Some(SlugStrategy::default()),
        }
    }

    /// Overlay `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merged_with(self, overrides: ConfigFile) -> ConfigFile {
        ConfigFile {
            install_script: overrides.install_script.or(self.install_script),
            build_script: overrides.build_script.or(self.build_script),
            dist_path: overrides.dist_path.or(self.dist_path),
            target_files_pattern: overrides
                .target_files_pattern
                .filter(|patterns| !patterns.is_empty())
                .or(self.target_files_pattern),
            git_repository: overrides.git_repository.or(self.git_repository),
            current_branch: overrides.current_branch.or(self.current_branch),
            target_branch: overrides.target_branch.or(self.target_branch),
            size_limit: overrides.size_limit.or(self.size_limit),
            slugs: overrides.slugs.or(self.slugs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_kebab_case_keys() {
        let toml = r#"
install-script = "yarn"
build-script = "yarn build:es"
dist-path = "dist"
target-files-pattern = ["**/*.js"]
git-repository = "https://github.com/ramda/ramda.git"
current-branch = "CrossEye-patch-1"
target-branch = "master"
size-limit = 1572864

[slugs]
strategy = "disabled"
"#;
        let config: ConfigFile = toml_edit::de::from_str(toml).unwrap();
        assert_eq!(config.build_script.as_deref(), Some("yarn build:es"));
        assert_eq!(config.target_files_pattern, Some(vec!["**/*.js".to_string()]));
        assert_eq!(config.size_limit, Some(1_572_864));
        assert_eq!(config.slugs, Some(SlugStrategy::Disabled));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: ConfigFile = toml_edit::de::from_str("").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let file = ConfigFile {
            build_script: Some("npm run build".to_string()),
            target_branch: Some("master".to_string()),
            target_files_pattern: Some(vec!["**/*.js".to_string()]),
            ..Default::default()
        };
        let overrides = ConfigFile {
            target_branch: Some("develop".to_string()),
            target_files_pattern: Some(vec![]),
            ..Default::default()
        };

        let merged = file.merged_with(overrides);
        assert_eq!(merged.build_script.as_deref(), Some("npm run build"));
        assert_eq!(merged.target_branch.as_deref(), Some("develop"));
        assert_eq!(
            merged.target_files_pattern,
            Some(vec!["**/*.js".to_string()])
        );
    }

    #[test]
    fn test_starter_round_trips_through_toml() {
        let starter = ConfigFile::starter();
        let text = toml_edit::ser::to_string_pretty(&starter).unwrap();
        assert!(text.contains("build-script = \"npm run build\""));
        let parsed: ConfigFile = toml_edit::de::from_str(&text).unwrap();
        assert_eq!(parsed, starter);
    }
}
