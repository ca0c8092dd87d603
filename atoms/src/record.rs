use crate::fields::FormDraft;
use crate::row::{Row, RowError, Table};
use std::fmt;

pub type RecordId = String;

/// One line of a list row's kind-specific summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryLine {
    Heading(String),
    Detail(String),
    Caption(String),
}

/// A dashboard record kind: identity, status handling, search text and
/// backend translation.
pub trait Record: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    type Draft: FormDraft;

    const TABLE: Table;
    /// Human name used in notices, e.g. `Video task`.
    const LABEL: &'static str;

    fn id(&self) -> &str;

    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    fn to_draft(&self) -> Self::Draft;

    /// Status text, or `None` for kinds that carry a flag instead.
    fn status(&self) -> Option<&'static str>;

    /// Delivered flag, for kinds that carry one.
    fn delivered(&self) -> Option<bool> {
        None
    }

    /// Whether the row toggle renders as checked.
    fn is_checked(&self) -> bool;

    /// The record after one click on its toggle.
    fn toggled(&self) -> Self;

    /// Partial row that moves the stored record to `self.toggled()`.
    fn toggle_patch(&self) -> Row;

    /// Every non-empty field value in text form, identifier included.
    fn search_values(&self) -> Vec<String>;

    /// Default list renderer.
    fn summary(&self) -> Vec<SummaryLine>;

    fn from_row(row: &Row) -> Result<Self, RowError>;

    /// Full row for a draft, used by insert and update.
    fn draft_row(draft: &Self::Draft) -> Row;
}
