//! Scratch working directories for cloned comparisons

use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::infra::FileSystem;

/// Something could not be cleaned up after a comparison
#[derive(Debug, Error)]
pub enum CleanupError {
    /// Refused to delete an empty, relative-dot or filesystem-root path
    #[error("refusing to delete unsafe directory '{}'", .0.display())]
    UnsafeWorkDir(PathBuf),

    /// Deleting a file or directory failed
    #[error("could not remove {}: {source}", path.display())]
    Remove {
        /// Path that could not be removed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The caller's working tree could not be put back as it was
    #[error("could not restore working tree: {0}")]
    Restore(String),
}

/// Whether `path` is safe to delete recursively.
///
/// The path is normalized lexically first. Anything that resolves to an
/// empty path or a filesystem root, or climbs above its relative start,
/// is never safe.
pub fn is_safe_to_delete(path: &Path) -> bool {
    match lexically_normalized(path) {
        Some(normalized) => {
            !normalized.as_os_str().is_empty() && normalized.parent().is_some()
        }
        None => false,
    }
}

/// Drop `.` and resolve `..` without touching the filesystem.
///
/// Returns `None` when a relative path climbs above where it started.
fn lexically_normalized(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => {
                normalized.pop();
                depth -= 1;
            }
            // `/..` is still `/`
            Component::ParentDir if path.has_root() => {}
            Component::ParentDir => return None,
            Component::Normal(part) => {
                normalized.push(part);
                depth += 1;
            }
        }
    }
    Some(normalized)
}

/// Recursively delete `path` unless it is unsafe.
pub fn safe_remove_dir<FS: FileSystem>(fs: &FS, path: &Path) -> Result<(), CleanupError> {
    if !is_safe_to_delete(path) {
        return Err(CleanupError::UnsafeWorkDir(path.to_path_buf()));
    }
    match fs.remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CleanupError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Directory exclusively owned by one comparison
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// Create `<scratch_root>/<nanosecond timestamp>`.
    pub fn create<FS: FileSystem>(fs: &FS, scratch_root: &Path) -> io::Result<WorkDir> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        let mut path = scratch_root.join(nanos.to_string());
        let mut suffix = 1;
        while fs.exists(&path) {
            path = scratch_root.join(format!("{}-{}", nanos, suffix));
            suffix += 1;
        }

        fs.create_dir_all(&path)?;
        log::debug!("created work dir {}", path.display());
        Ok(WorkDir { path })
    }

    /// Wrap an existing directory
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the directory and everything in it
    pub fn remove<FS: FileSystem>(self, fs: &FS) -> Result<(), CleanupError> {
        safe_remove_dir(fs, &self.path)?;
        log::debug!("removed work dir {}", self.path.display());
        Ok(())
    }
}
