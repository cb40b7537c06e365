//! Per-file size lookup

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::infra::{FileSystem, RealFileSystem};

/// One file's size could not be read
#[derive(Debug, Error)]
#[error("cannot measure {}: {source}", path.display())]
pub struct MeasureError {
    /// File that was measured
    pub path: PathBuf,
    /// Underlying I/O error
    pub source: std::io::Error,
}

/// Answers "how many bytes is this file"
pub trait SizeProvider: Send + Sync {
    /// Size of `path` in bytes
    fn size_of(&self, path: &Path) -> Result<u64, MeasureError>;
}

/// Raw on-disk size through a [`FileSystem`]
#[derive(Debug, Clone, Default)]
pub struct FsSizeProvider<FS: FileSystem = RealFileSystem> {
    fs: FS,
}

impl FsSizeProvider<RealFileSystem> {
    /// Measure with the real filesystem
    pub fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl<FS: FileSystem> SizeProvider for FsSizeProvider<FS> {
    fn size_of(&self, path: &Path) -> Result<u64, MeasureError> {
        self.fs.file_size(path).map_err(|source| MeasureError {
            path: path.to_path_buf(),
            source,
        })
    }
}
