use serde_json::Value;

use super::model::{CelebritySchedule, CelebrityScheduleDraft, CelebrityStatus};
use crate::row::{self, Row, RowError};

pub const NAME: &str = "name";
pub const VIDEO_COUNT: &str = "video_count";
pub const SCHEDULED_DATE: &str = "scheduled_date";
pub const STATUS: &str = "status";

pub fn celebrity_schedule_from_row(row: &Row) -> Result<CelebritySchedule, RowError> {
    let raw_status = row::text(row, STATUS)?;
    let status = CelebrityStatus::parse(&raw_status).ok_or(RowError::Invalid {
        column: STATUS,
        value: raw_status,
    })?;

    let video_count = row::whole_number(row, VIDEO_COUNT)?;
    if video_count == 0 {
        return Err(RowError::Invalid {
            column: VIDEO_COUNT,
            value: "0".to_string(),
        });
    }

    Ok(CelebritySchedule {
        id: row::text(row, row::ID)?,
        name: row::text(row, NAME)?,
        video_count,
        scheduled_date: row::date(row, SCHEDULED_DATE)?,
        status,
    })
}

pub fn celebrity_schedule_row(draft: &CelebrityScheduleDraft) -> Row {
    let mut row = Row::new();
    row.insert(NAME.into(), Value::String(draft.name.clone()));
    row.insert(VIDEO_COUNT.into(), Value::from(draft.video_count));
    row.insert(SCHEDULED_DATE.into(), row::date_value(draft.scheduled_date));
    row.insert(STATUS.into(), Value::String(draft.status.as_str().into()));
    row
}

pub fn status_patch(status: CelebrityStatus) -> Row {
    let mut row = Row::new();
    row.insert(STATUS.into(), Value::String(status.as_str().into()));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_row_with_numeric_text() {
        let row = json!({
            "id": "c1",
            "name": "Ada",
            "video_count": "4",
            "scheduled_date": "2025-02-01",
            "status": "scheduled"
        });
        let schedule = celebrity_schedule_from_row(row.as_object().unwrap()).unwrap();
        assert_eq!(schedule.video_count, 4);
    }

    #[test]
    fn zero_video_count_is_rejected() {
        let row = json!({
            "id": "c1",
            "name": "Ada",
            "video_count": 0,
            "scheduled_date": "2025-02-01",
            "status": "scheduled"
        });
        assert!(celebrity_schedule_from_row(row.as_object().unwrap()).is_err());
    }
}
