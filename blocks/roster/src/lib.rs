//! Team roster page: per-user member list with inline edits, summary
//! metrics and spreadsheet export.

pub mod export;
pub mod metrics;
pub mod roster;

pub use export::{
    format_salary, DirectorySink, ExportError, ExportFile, ExportRow, ExportSheet, FileSink,
    EXPORT_FILENAME, HEADERS, SHEET_NAME,
};
pub use metrics::RosterMetrics;
pub use roster::{Roster, RosterError, RosterRow};
