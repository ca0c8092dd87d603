use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt;

/// Flat backend row. Keys use the snake_case column names of the table.
pub type Row = serde_json::Map<String, Value>;

pub const ID: &str = "id";
pub const USER_ID: &str = "user_id";
pub const CREATED_AT: &str = "created_at";

/// Columns the backend owns; patches never write them.
pub const RESERVED_COLUMNS: [&str; 3] = [ID, USER_ID, CREATED_AT];

/// Calendar dates travel as `YYYY-MM-DD` text.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    VideoTasks,
    CelebritySchedules,
    ProductDeliveries,
    SocialMediaChecks,
    TeamMembers,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::VideoTasks => "video_tasks",
            Table::CelebritySchedules => "celebrity_schedules",
            Table::ProductDeliveries => "product_deliveries",
            Table::SocialMediaChecks => "social_media_checks",
            Table::TeamMembers => "team_members",
        }
    }

    /// Sort-key prefix used by single-table stores (`VIDEO_TASK#<id>`).
    pub fn item_prefix(&self) -> &'static str {
        match self {
            Table::VideoTasks => "VIDEO_TASK",
            Table::CelebritySchedules => "CELEBRITY_SCHEDULE",
            Table::ProductDeliveries => "PRODUCT_DELIVERY",
            Table::SocialMediaChecks => "SOCIAL_MEDIA_CHECK",
            Table::TeamMembers => "TEAM_MEMBER",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("row is missing column `{0}`")]
    Missing(&'static str),

    #[error("column `{column}` holds invalid value `{value}`")]
    Invalid { column: &'static str, value: String },
}

fn invalid(column: &'static str, value: &Value) -> RowError {
    RowError::Invalid {
        column,
        value: match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

/// Required text column.
pub fn text(row: &Row, column: &'static str) -> Result<String, RowError> {
    match row.get(column) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(RowError::Missing(column)),
        Some(other) => Err(invalid(column, other)),
    }
}

/// Optional text column; absent and null read as empty.
pub fn optional_text(row: &Row, column: &'static str) -> String {
    row.get(column)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

pub fn flag(row: &Row, column: &'static str) -> bool {
    row.get(column).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Whole number column. Numeric text is accepted, as some backends return it.
pub fn whole_number(row: &Row, column: &'static str) -> Result<u32, RowError> {
    match row.get(column) {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u32))
            .ok_or_else(|| invalid(column, &Value::Number(n.clone()))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid(column, &Value::String(s.clone()))),
        Some(Value::Null) | None => Err(RowError::Missing(column)),
        Some(other) => Err(invalid(column, other)),
    }
}

pub fn decimal(row: &Row, column: &'static str) -> Result<f64, RowError> {
    match row.get(column) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| invalid(column, &Value::Number(n.clone()))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(column, &Value::String(s.clone()))),
        Some(Value::Null) | None => Err(RowError::Missing(column)),
        Some(other) => Err(invalid(column, other)),
    }
}

/// Date column. Plain dates, RFC 3339 timestamps and naive timestamps all
/// collapse to the calendar date they name.
pub fn date(row: &Row, column: &'static str) -> Result<NaiveDate, RowError> {
    let raw = text(row, column)?;
    parse_date(&raw).ok_or(RowError::Invalid { column, value: raw })
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|d| d.date())
        })
}

pub fn date_value(date: NaiveDate) -> Value {
    Value::String(date.format(DATE_FORMAT).to_string())
}

/// Display form used by list summaries: `January 10, 2025`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
