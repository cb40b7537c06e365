//! Markdown rendering of comparison tables and pull-request comments

use super::model::ComparisonReport;
use super::rows::{formatted_rows, header_row, RowOrder, TableRow};

/// Marker embedded in every posted comment so later runs can find it
pub const COMMENT_WATERMARK: &str = "<p align=\"right\"><i>Generated by </i><a href=\"https://www.npmjs.com/package/bundle-checker\" target=\"_blank\">bundle-checker</a>🔎📦</p>";

/// Title of the per-extension table
pub const TOTALS_TITLE: &str = "Overview";

/// Title of the per-file table
pub const FILES_BREAKDOWN_TITLE: &str = "All targeted files";

/// First-column label of the per-extension table
pub const FILE_EXTENSION_LABEL: &str = "file extension";

/// First-column label of the per-file table
pub const FILE_NAME_LABEL: &str = "name";

/// Summary line of the collapsible breakdown
pub const COLLAPSIBLE_SUMMARY: &str = "Details of bundled changes";

/// Render rows as a markdown table; the first row is the header.
///
/// Cells are emitted verbatim, so callers must not pass `|`.
///
/// ```
/// use bundle_checker::report::create_markdown_table;
///
/// let table = create_markdown_table(&[
///     ["name", "feature", "main"].map(String::from),
///     ["a.js", "1KB", "1KB"].map(String::from),
/// ]);
/// assert_eq!(table, "| name | feature | main |\n| --- | --- | --- |\n| a.js | 1KB | 1KB |");
/// ```
pub fn create_markdown_table<R: AsRef<[String]>>(rows: &[R]) -> String {
    let Some((header, content)) = rows.split_first() else {
        return String::new();
    };
    let header = header.as_ref();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(markdown_row(header));
    lines.push(format!("| {} |", vec!["---"; header.len()].join(" | ")));
    lines.extend(content.iter().map(|row| markdown_row(row.as_ref())));
    lines.join("\n")
}

fn markdown_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Wrap content in a `<details>` block
pub fn wrap_in_collapsible(content: &str, summary: &str) -> String {
    format!("<details><summary>{summary}</summary>\n\n{content}\n\n</details>")
}

/// `### title` followed by the table
fn titled_table(title: &str, rows: &[TableRow]) -> String {
    format!("### {}\n{}", title, create_markdown_table(rows))
}

/// Per-extension table rows, header first
pub fn overview_rows(
    report: &ComparisonReport,
    current_branch: &str,
    target_branch: &str,
) -> Vec<TableRow> {
    let mut rows = vec![header_row(
        FILE_EXTENSION_LABEL,
        current_branch,
        target_branch,
    )];
    rows.extend(formatted_rows(&report.by_extension(), RowOrder::ByDelta));
    rows
}

/// Per-file table rows, header first
pub fn breakdown_rows(
    report: &ComparisonReport,
    current_branch: &str,
    target_branch: &str,
) -> Vec<TableRow> {
    let mut rows = vec![header_row(FILE_NAME_LABEL, current_branch, target_branch)];
    rows.extend(formatted_rows(report, RowOrder::Alphabetical));
    rows
}

/// Full pull-request comment body: overview, collapsible breakdown, watermark.
pub fn comment_body(report: &ComparisonReport, current_branch: &str, target_branch: &str) -> String {
    let overview = titled_table(
        TOTALS_TITLE,
        &overview_rows(report, current_branch, target_branch),
    );
    let breakdown = wrap_in_collapsible(
        &titled_table(
            FILES_BREAKDOWN_TITLE,
            &breakdown_rows(report, current_branch, target_branch),
        ),
        COLLAPSIBLE_SUMMARY,
    );
    format!("{overview}\n\n{breakdown}\n\n{COMMENT_WATERMARK}")
}

/// Escape `|` so `cell` stays inside one markdown table cell
pub fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

/// Comment body for a comparison that failed before producing sizes
pub fn error_comment_body(message: &str) -> String {
    let table = create_markdown_table(&[
        header_row(FILE_NAME_LABEL, "", ""),
        super::rows::error_row(message).map(|cell| escape_cell(&cell)),
    ]);
    format!("### {TOTALS_TITLE}\n{table}\n\n{COMMENT_WATERMARK}")
}
