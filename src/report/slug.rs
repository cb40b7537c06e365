//! Build-hash slug normalization
//!
//! Bundlers embed content hashes in file names (`main.3f9a1c.js`), so the
//! same logical artifact gets a different name on every branch. Normalizing
//! the slug to a placeholder lets both branches line up on one row.
//!
//! Which segment is "the hash" depends on the bundler, so the rule is
//! pluggable through [`SlugStrategy`].

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::model::FileSizeReport;

/// Placeholder substituted for a detected hash slug
pub const HASH_PLACEHOLDER: &str = "[HASH]";

/// Default pattern for [`SlugStrategy::HexPattern`]
pub const DEFAULT_HEX_PATTERN: &str = "^[0-9a-fA-F]{6,}$";

/// Rewrites a single file name, leaving its directory untouched.
pub trait SlugNormalizer: Send + Sync {
    /// Normalize the slug of one file name (no directory components)
    fn normalize_file_name(&self, file_name: &str) -> String;

    /// Normalize a full path; only the last component is rewritten
    fn normalize_path(&self, path: &str) -> String {
        match path.rfind(['/', '\\']) {
            Some(idx) => format!(
                "{}{}",
                &path[..=idx],
                self.normalize_file_name(&path[idx + 1..])
            ),
            None => self.normalize_file_name(path),
        }
    }
}

/// Configured slug strategy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "strategy")]
pub enum SlugStrategy {
    /// Replace the last dot segment after the base name, skipping `min`
    #[default]
    LastSegment,
    /// Replace every dot segment after the base name matching `pattern`
    HexPattern {
        /// Regex a segment must fully match to count as a hash
        #[serde(default = "default_hex_pattern")]
        pattern: String,
    },
    /// Keep file names as they are
    Disabled,
}

fn default_hex_pattern() -> String {
    DEFAULT_HEX_PATTERN.to_string()
}

impl SlugStrategy {
    /// Build the normalizer for this strategy
    pub fn normalizer(&self) -> Result<Box<dyn SlugNormalizer>, regex::Error> {
        Ok(match self {
            Self::LastSegment => Box::new(LastSegmentSlug),
            Self::HexPattern { pattern } => Box::new(PatternSlug::new(pattern)?),
            Self::Disabled => Box::new(NoSlug),
        })
    }
}

/// Split `name` into dot segments of the stem plus the extension.
///
/// Returns `None` when the name has no extension or only a base name, i.e.
/// when there is nothing that could be a slug.
fn stem_segments(file_name: &str) -> Option<(Vec<&str>, &str)> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    let segments: Vec<&str> = stem.split('.').collect();
    if segments.len() < 2 || segments[0].is_empty() {
        return None;
    }
    Some((segments, ext))
}

fn is_min_segment(segment: &str) -> bool {
    segment.eq_ignore_ascii_case("min")
}

/// Treats the last non-`min` segment between base name and extension as the hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastSegmentSlug;

impl SlugNormalizer for LastSegmentSlug {
    fn normalize_file_name(&self, file_name: &str) -> String {
        let Some((mut segments, ext)) = stem_segments(file_name) else {
            return file_name.to_string();
        };

        let hash_idx = (1..segments.len())
            .rev()
            .find(|&idx| !is_min_segment(segments[idx]));

        match hash_idx {
            Some(idx) => {
                segments[idx] = HASH_PLACEHOLDER;
                format!("{}.{}", segments.join("."), ext)
            }
            None => file_name.to_string(),
        }
    }
}

/// Replaces every post-base segment that fully matches a regex.
#[derive(Debug, Clone)]
pub struct PatternSlug {
    pattern: Regex,
}

impl PatternSlug {
    /// Compile the hash pattern
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl SlugNormalizer for PatternSlug {
    fn normalize_file_name(&self, file_name: &str) -> String {
        let Some((segments, ext)) = stem_segments(file_name) else {
            return file_name.to_string();
        };

        let rewritten: Vec<&str> = segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| {
                if idx > 0 && !is_min_segment(segment) && self.pattern.is_match(segment) {
                    HASH_PLACEHOLDER
                } else {
                    segment
                }
            })
            .collect();

        format!("{}.{}", rewritten.join("."), ext)
    }
}

/// Leaves names unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSlug;

impl SlugNormalizer for NoSlug {
    fn normalize_file_name(&self, file_name: &str) -> String {
        file_name.to_string()
    }
}

/// Rewrite every key of `report` through `normalizer`.
///
/// Keys that collapse onto the same normalized name have their sizes summed.
pub fn normalize_slugs_in_file_names(
    report: &FileSizeReport,
    normalizer: &dyn SlugNormalizer,
) -> FileSizeReport {
    report
        .iter()
        .map(|(path, bytes)| (normalizer.normalize_path(path), *bytes))
        .collect()
}
