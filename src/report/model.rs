//! Size report data model
//!
//! A [`FileSizeReport`] maps a file path (or an extension, once squashed) to
//! its byte size. A [`ComparisonReport`] pairs the reports of the two
//! compared branches. Keys missing from one side count as zero.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use super::grouping::extension_of;
use crate::fmt::format_bytes;

/// Marker prepended to the delta of a growing entry
pub const GROWTH_MARKER: &str = "🔺 +";

/// Marker prepended to the delta of a shrinking entry
pub const SHRINK_MARKER: &str = "▼ -";

/// Byte sizes keyed by file path or extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSizeReport(BTreeMap<String, u64>);

impl FileSizeReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add bytes to an entry, creating it when absent.
    ///
    /// Accumulating rather than overwriting keeps sizes correct when two
    /// paths collapse onto the same key (extension squashing, slug
    /// normalization).
    pub fn add(&mut self, key: impl Into<String>, bytes: u64) {
        *self.0.entry(key.into()).or_insert(0) += bytes;
    }

    /// Size recorded for `key`, zero when absent
    pub fn size_of(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Whether the report has an entry for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sum of all entries
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the report has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, u64> {
        self.0.iter()
    }

    /// Iterate keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Group entries by file extension and sum their sizes.
    ///
    /// Idempotent: squashing an already squashed report yields the same
    /// mapping, since an extension key is its own extension.
    ///
    /// ```
    /// use bundle_checker::report::FileSizeReport;
    ///
    /// let report: FileSizeReport = [("main.js", 100), ("vendor.js", 50), ("app.css", 10)]
    ///     .into_iter()
    ///     .collect();
    /// let squashed = report.squash_by_extension();
    /// assert_eq!(squashed.size_of(".js"), 150);
    /// assert_eq!(squashed.size_of(".css"), 10);
    /// assert_eq!(squashed.squash_by_extension(), squashed);
    /// ```
    pub fn squash_by_extension(&self) -> FileSizeReport {
        let mut squashed = FileSizeReport::new();
        for (path, bytes) in &self.0 {
            squashed.add(extension_of(path), *bytes);
        }
        squashed
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for FileSizeReport {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut report = FileSizeReport::new();
        for (key, bytes) in iter {
            report.add(key, bytes);
        }
        report
    }
}

impl<'a> IntoIterator for &'a FileSizeReport {
    type Item = (&'a String, &'a u64);
    type IntoIter = btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Sizes of both compared branches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Report of the branch under review
    pub current_branch_report: FileSizeReport,
    /// Report of the branch compared against
    pub target_branch_report: FileSizeReport,
}

impl ComparisonReport {
    /// Pair two branch reports
    pub fn new(current_branch_report: FileSizeReport, target_branch_report: FileSizeReport) -> Self {
        Self {
            current_branch_report,
            target_branch_report,
        }
    }

    /// Union of the keys of both reports, sorted
    pub fn keys(&self) -> BTreeSet<&str> {
        self.current_branch_report
            .keys()
            .chain(self.target_branch_report.keys())
            .collect()
    }

    /// Per-extension projection of both reports
    pub fn by_extension(&self) -> ComparisonReport {
        ComparisonReport {
            current_branch_report: self.current_branch_report.squash_by_extension(),
            target_branch_report: self.target_branch_report.squash_by_extension(),
        }
    }

    /// Signed size difference `current - target` across all entries
    pub fn total_delta(&self) -> i128 {
        self.current_branch_report.total() as i128 - self.target_branch_report.total() as i128
    }
}

/// Format `new_size`, appending the signed difference from `old_size` when
/// the two differ.
///
/// ```
/// use bundle_checker::report::with_delta_size;
///
/// assert_eq!(with_delta_size(1000, 1000), "1000B");
/// assert_eq!(with_delta_size(0, 2000), "1.95KB (🔺 +1.95KB)");
/// assert_eq!(with_delta_size(150, 0), "0B (▼ -150B)");
/// ```
pub fn with_delta_size(old_size: u64, new_size: u64) -> String {
    if old_size == new_size {
        return format_bytes(new_size);
    }

    let marker = if new_size > old_size {
        GROWTH_MARKER
    } else {
        SHRINK_MARKER
    };
    format!(
        "{} ({}{})",
        format_bytes(new_size),
        marker,
        format_bytes(new_size.abs_diff(old_size))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_accumulates_colliding_keys() {
        let mut report = FileSizeReport::new();
        report.add("main.[HASH].js", 100);
        report.add("main.[HASH].js", 20);
        assert_eq!(report.size_of("main.[HASH].js"), 120);
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_size_of_missing_key_is_zero() {
        let report = FileSizeReport::new();
        assert_eq!(report.size_of("missing.js"), 0);
        assert!(!report.contains("missing.js"));
    }

    #[test]
    fn test_squash_groups_by_extension_and_sums() {
        let report: FileSizeReport = [
            ("static/js/main.js", 1000),
            ("static/js/chunk.1a2b.js", 500),
            ("static/css/main.css", 150),
            ("LICENSE", 20),
        ]
        .into_iter()
        .collect();

        let squashed = report.squash_by_extension();
        assert_eq!(squashed.size_of(".js"), 1500);
        assert_eq!(squashed.size_of(".css"), 150);
        assert_eq!(squashed.size_of(crate::report::NO_EXTENSION), 20);
        assert_eq!(squashed.total(), report.total());
    }

    #[test]
    fn test_comparison_keys_are_union() {
        let report = ComparisonReport::new(
            [(".jpg", 2000), (".js", 1100)].into_iter().collect(),
            [(".css", 150), (".js", 1000)].into_iter().collect(),
        );
        let keys: Vec<_> = report.keys().into_iter().collect();
        assert_eq!(keys, vec![".css", ".jpg", ".js"]);
        assert_eq!(report.total_delta(), 3100 - 1150);
    }

    #[test]
    fn test_report_serializes_as_plain_map() {
        let report: FileSizeReport = [("a.js", 1)].into_iter().collect();
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"a.js":1}"#);
    }

    proptest! {
        #[test]
        fn prop_squash_is_idempotent(
            entries in proptest::collection::btree_map("[a-z]{1,6}(\\.[a-z0-9]{1,4}){0,3}", 0u64..1_000_000, 0..20)
        ) {
            let report: FileSizeReport = entries.into_iter().collect();
            let once = report.squash_by_extension();
            prop_assert_eq!(once.squash_by_extension(), once.clone());
            prop_assert_eq!(once.total(), report.total());
        }

        #[test]
        fn prop_with_delta_size_contains_new_size_and_delta(a in 0u64..10_000_000, b in 0u64..10_000_000) {
            let text = with_delta_size(a, b);
            prop_assert!(text.starts_with(&format_bytes(b)));
            if a == b {
                prop_assert!(!text.contains('('));
            } else {
                let delta = format!("{})", format_bytes(a.abs_diff(b)));
                prop_assert!(text.ends_with(&delta));
            }
        }
    }
}
