//! Console and pull-request presentation of a comparison

use console::{measure_text_width, pad_str, style, Alignment};

use super::markdown::{
    breakdown_rows, comment_body, error_comment_body, overview_rows, FILES_BREAKDOWN_TITLE,
    FILE_NAME_LABEL, TOTALS_TITLE,
};
use super::model::ComparisonReport;
use super::rows::{error_row, header_row, TableRow};
use crate::notify::{upsert_comment, CommentAction, CommentSink, NotifyError};

/// What a finished comparison has to show
#[derive(Debug, Clone, Copy)]
pub enum ReportContent<'a> {
    /// Both branches were measured
    Sizes(&'a ComparisonReport),
    /// The comparison failed with this message
    Failure(&'a str),
}

/// Renders a comparison for the terminal and for pull-request comments.
#[derive(Debug, Clone)]
pub struct ReportPresenter {
    current_branch: String,
    target_branch: String,
}

impl ReportPresenter {
    /// Presenter labelling columns with the two branch names
    pub fn new(current_branch: impl Into<String>, target_branch: impl Into<String>) -> Self {
        Self {
            current_branch: current_branch.into(),
            target_branch: target_branch.into(),
        }
    }

    /// Both tables laid out as aligned columns for a terminal
    pub fn console_tables(&self, content: ReportContent<'_>) -> String {
        match content {
            ReportContent::Sizes(report) => {
                let overview = overview_rows(report, &self.current_branch, &self.target_branch);
                let breakdown = breakdown_rows(report, &self.current_branch, &self.target_branch);
                format!(
                    "{}\n{}\n\n{}\n{}",
                    style(TOTALS_TITLE).bold(),
                    console_table(&overview),
                    style(FILES_BREAKDOWN_TITLE).bold(),
                    console_table(&breakdown)
                )
            }
            ReportContent::Failure(message) => {
                let rows = [
                    header_row(FILE_NAME_LABEL, &self.current_branch, &self.target_branch),
                    error_row(message),
                ];
                format!("{}\n{}", style(TOTALS_TITLE).bold(), console_table(&rows))
            }
        }
    }

    /// Markdown comment body
    pub fn markdown(&self, content: ReportContent<'_>) -> String {
        match content {
            ReportContent::Sizes(report) => {
                comment_body(report, &self.current_branch, &self.target_branch)
            }
            ReportContent::Failure(message) => error_comment_body(message),
        }
    }

    /// Post the markdown body, replacing an earlier comment from this tool.
    pub fn publish(
        &self,
        content: ReportContent<'_>,
        sink: &dyn CommentSink,
    ) -> Result<CommentAction, NotifyError> {
        upsert_comment(sink, &self.markdown(content))
    }
}

/// Align rows into space-padded columns; the first row is underlined.
fn console_table(rows: &[TableRow]) -> String {
    let mut widths = [0usize; 3];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let render = |row: &TableRow| {
        row.iter()
            .zip(widths)
            .map(|(cell, width)| pad_str(cell, width, Alignment::Left, None).into_owned())
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    if let Some((header, content)) = rows.split_first() {
        lines.push(style(render(header)).bold().to_string());
        let rule: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
        lines.push(style("─".repeat(rule)).dim().to_string());
        lines.extend(content.iter().map(render));
    }
    lines.join("\n")
}
