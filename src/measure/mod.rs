//! Artifact measurement
//!
//! Expands the configured patterns under a root directory and sums up the
//! byte size of every matched file into a [`FileSizeReport`].

pub mod discovery;
pub mod sizer;

pub use discovery::{discover_files, ArtifactDiscovery, DiscoveryError, GlobDiscovery};
pub use sizer::{FsSizeProvider, MeasureError, SizeProvider};

use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;

use crate::report::{normalize_slugs_in_file_names, FileSizeReport, SlugNormalizer};

/// Sizes of one build
#[derive(Debug, Clone, Default)]
pub struct Measurement {
    /// Sizes keyed by normalized relative path
    pub report: FileSizeReport,
    /// Absolute paths of the measured files
    pub files: Vec<PathBuf>,
}

/// Key of `file` in a report: its path relative to `root`, `/`-separated.
///
/// Files outside `root` keep their full path.
pub fn report_key(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::RootDir | Component::CurDir => None,
            other => Some(other.as_os_str().to_string_lossy().into_owned()),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Measure every file matched by `patterns` under `root`.
///
/// Sizes are looked up in parallel. A file whose size cannot be read counts
/// as zero; the failure is logged.
pub fn measure_artifacts(
    root: &Path,
    patterns: &[String],
    discovery: &dyn ArtifactDiscovery,
    sizer: &dyn SizeProvider,
    normalizer: &dyn SlugNormalizer,
) -> Measurement {
    let files = discover_files(discovery, root, patterns);

    let sized: Vec<(String, u64)> = files
        .par_iter()
        .map(|file| {
            let bytes = sizer.size_of(file).unwrap_or_else(|e| {
                log::warn!("{}; counting as 0 bytes", e);
                0
            });
            (report_key(root, file), bytes)
        })
        .collect();

    let raw: FileSizeReport = sized.into_iter().collect();
    Measurement {
        report: normalize_slugs_in_file_names(&raw, normalizer),
        files,
    }
}
