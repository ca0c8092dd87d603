use crewdesk_atoms::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status half of the filter parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    /// Matches records whose status text equals the value.
    Status(String),
    Delivered,
    NotDelivered,
}

/// Options offered by the status filter, with display labels.
pub const STATUS_FILTER_OPTIONS: [(&str, &str); 9] = [
    ("all", "All Status"),
    ("pending", "Pending"),
    ("in-progress", "In Progress"),
    ("completed", "Completed"),
    ("scheduled", "Scheduled"),
    ("posted", "Posted"),
    ("not-posted", "Not Posted"),
    ("delivered", "Delivered"),
    ("not-delivered", "Not Delivered"),
];

impl StatusFilter {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "all" => StatusFilter::All,
            "delivered" => StatusFilter::Delivered,
            "not-delivered" => StatusFilter::NotDelivered,
            other => StatusFilter::Status(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Status(s) => s,
            StatusFilter::Delivered => "delivered",
            StatusFilter::NotDelivered => "not-delivered",
        }
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Status(s) => record.status() == Some(s.as_str()),
            StatusFilter::Delivered => record.delivered() == Some(true),
            StatusFilter::NotDelivered => record.delivered() == Some(false),
        }
    }
}

impl From<String> for StatusFilter {
    fn from(raw: String) -> Self {
        StatusFilter::parse(&raw)
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter plus search text, applied to every collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterParams {
    pub status: StatusFilter,
    pub search: String,
}

impl FilterParams {
    pub fn new(status: &str, search: &str) -> Self {
        Self {
            status: StatusFilter::parse(status),
            search: search.to_string(),
        }
    }
}

/// Case-insensitive substring match against every field's text form.
pub fn matches_search<R: Record>(record: &R, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record
        .search_values()
        .iter()
        .any(|v| v.to_lowercase().contains(&needle))
}

/// Records passing both the status and the search filter, in collection
/// order.
pub fn filter_records<'a, R: Record>(records: &'a [R], params: &FilterParams) -> Vec<&'a R> {
    records
        .iter()
        .filter(|r| params.status.matches(*r) && matches_search(*r, &params.search))
        .collect()
}
