//! Grouping of artifact paths by file extension

use std::collections::BTreeMap;

/// Bucket for files whose name carries no extension
pub const NO_EXTENSION: &str = "(no extension)";

/// Extension of a path, including the leading dot.
///
/// Only the last path component is inspected. A component that is itself a
/// bare extension (`.js`) maps to itself, which is what makes squashing
/// idempotent; anything without a dot maps to [`NO_EXTENSION`].
///
/// ```
/// use bundle_checker::report::{extension_of, NO_EXTENSION};
///
/// assert_eq!(extension_of("dist/js/app.8f3a1c.js"), ".js");
/// assert_eq!(extension_of(".css"), ".css");
/// assert_eq!(extension_of("README"), NO_EXTENSION);
/// ```
pub fn extension_of(path: &str) -> String {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => name[idx..].to_string(),
        _ => NO_EXTENSION.to_string(),
    }
}

/// Group a flat file list by extension.
///
/// Files keep their input order inside each group.
pub fn group_files_by_extension<S: AsRef<str>>(files: &[S]) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in files {
        let file = file.as_ref();
        groups
            .entry(extension_of(file))
            .or_default()
            .push(file.to_string());
    }
    groups
}
