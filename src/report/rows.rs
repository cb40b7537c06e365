//! Table rows derived from a [`ComparisonReport`]

use std::cmp::Reverse;

use super::model::{with_delta_size, ComparisonReport};
use crate::fmt::format_bytes;

/// One table row: `[label, current value, target value]`.
pub type TableRow = [String; 3];

/// Label of the single row rendered for a failed comparison
pub const ERROR_LABEL: &str = "Error";

/// How rows are ordered in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// Largest absolute change first, ties broken by label
    #[default]
    ByDelta,
    /// Label ascending
    Alphabetical,
}

/// Build one row per key of the union of both branch reports.
///
/// Keys absent from one branch count as zero there. The current column
/// carries the delta relative to the target branch.
///
/// ```
/// use bundle_checker::report::{formatted_rows, ComparisonReport, RowOrder};
///
/// let report = ComparisonReport::new(
///     [("a.js", 1000)].into_iter().collect(),
///     [("a.js", 1000)].into_iter().collect(),
/// );
/// let rows = formatted_rows(&report, RowOrder::ByDelta);
/// assert_eq!(rows[0], ["a.js".to_string(), "1000B".to_string(), "1000B".to_string()]);
/// ```
pub fn formatted_rows(report: &ComparisonReport, order: RowOrder) -> Vec<TableRow> {
    let mut entries: Vec<(&str, u64, u64)> = report
        .keys()
        .into_iter()
        .map(|key| {
            (
                key,
                report.current_branch_report.size_of(key),
                report.target_branch_report.size_of(key),
            )
        })
        .collect();

    match order {
        RowOrder::ByDelta => entries.sort_by_key(|&(key, current, target)| {
            (Reverse(current.abs_diff(target)), key)
        }),
        RowOrder::Alphabetical => entries.sort_by_key(|&(key, _, _)| key),
    }

    entries
        .into_iter()
        .map(|(key, current, target)| {
            [
                key.to_string(),
                with_delta_size(target, current),
                format_bytes(target),
            ]
        })
        .collect()
}

/// Header row for a table whose first column is labelled `label`
pub fn header_row(label: &str, current_branch: &str, target_branch: &str) -> TableRow {
    [
        label.to_string(),
        current_branch.to_string(),
        target_branch.to_string(),
    ]
}

/// Row shown in place of size rows when the comparison failed.
///
/// Only the first non-empty line of `message` is kept so captured build
/// output cannot spill over several table lines.
pub fn error_row(message: &str) -> TableRow {
    let first_line = message
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    [ERROR_LABEL.to_string(), first_line.to_string(), String::new()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::FileSizeReport;

    fn row(cells: [&str; 3]) -> TableRow {
        cells.map(str::to_string)
    }

    #[test]
    fn test_identical_branches_have_no_delta_marker() {
        let report = ComparisonReport::new(
            [("a.js", 1000)].into_iter().collect(),
            [("a.js", 1000)].into_iter().collect(),
        );
        let rows = formatted_rows(&report, RowOrder::ByDelta);
        assert_eq!(rows, vec![row(["a.js", "1000B", "1000B"])]);
    }

    #[test]
    fn test_added_and_removed_extensions() {
        let report = ComparisonReport::new(
            [(".jpg", 2000), (".js", 1100)].into_iter().collect(),
            [(".css", 150), (".js", 1000)].into_iter().collect(),
        );
        let rows = formatted_rows(&report, RowOrder::ByDelta);

        assert_eq!(
            rows,
            vec![
                row([".jpg", "1.95KB (🔺 +1.95KB)", "0B"]),
                row([".css", "0B (▼ -150B)", "150B"]),
                row([".js", "1.07KB (🔺 +100B)", "1000B"]),
            ]
        );
    }

    #[test]
    fn test_delta_ties_fall_back_to_label() {
        let report = ComparisonReport::new(
            [("b.js", 10), ("a.js", 10)].into_iter().collect(),
            FileSizeReport::new(),
        );
        let labels: Vec<_> = formatted_rows(&report, RowOrder::ByDelta)
            .into_iter()
            .map(|r| r[0].clone())
            .collect();
        assert_eq!(labels, vec!["a.js", "b.js"]);
    }

    #[test]
    fn test_alphabetical_order() {
        let report = ComparisonReport::new(
            [("z.js", 1), ("a.js", 5000)].into_iter().collect(),
            [("m.css", 3)].into_iter().collect(),
        );
        let labels: Vec<_> = formatted_rows(&report, RowOrder::Alphabetical)
            .into_iter()
            .map(|r| r[0].clone())
            .collect();
        assert_eq!(labels, vec!["a.js", "m.css", "z.js"]);
    }

    #[test]
    fn test_error_row_shape() {
        assert_eq!(error_row("boom"), row(["Error", "boom", ""]));
    }

    #[test]
    fn test_error_row_keeps_first_line_of_build_output() {
        let message = "\n  build step failed: ERROR in ./src/a.js\nModule not found\n | import b\n";
        assert_eq!(
            error_row(message),
            row(["Error", "build step failed: ERROR in ./src/a.js", ""])
        );
        assert_eq!(error_row(""), row(["Error", "", ""]));
    }
}
