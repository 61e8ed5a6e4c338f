//! External-interface collaborators
//!
//! Pure functions at the system boundary: the clipboard-paste import
//! parser, the spreadsheet row mapping over a derived view's record set,
//! and the plain-text schedule message composer. None of these talk to
//! the store — they consume or produce the document model only.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod export;
pub mod import;
pub mod message;

pub use export::{rows, schedule_rows, status_columns, ExportColumn};
pub use import::{parse_tabular, stage_status_records, ImportRecord};
pub use message::{compose_schedule_message, display_date};
