//! Size report model and rendering
//!
//! - [`model`]: per-file and per-extension size maps, delta formatting
//! - [`grouping`]: extension detection and grouping
//! - [`slug`]: build-hash normalization of file names
//! - [`rows`] / [`markdown`]: table rows and markdown rendering
//! - [`presenter`]: console tables and pull-request comment publishing

pub mod grouping;
pub mod markdown;
pub mod model;
pub mod presenter;
pub mod rows;
pub mod slug;

pub use grouping::{extension_of, group_files_by_extension, NO_EXTENSION};
pub use markdown::{
    comment_body, create_markdown_table, escape_cell, wrap_in_collapsible, COMMENT_WATERMARK,
};
pub use model::{with_delta_size, ComparisonReport, FileSizeReport};
pub use presenter::{ReportContent, ReportPresenter};
pub use rows::{error_row, formatted_rows, RowOrder, TableRow};
pub use slug::{normalize_slugs_in_file_names, SlugNormalizer, SlugStrategy, HASH_PLACEHOLDER};
