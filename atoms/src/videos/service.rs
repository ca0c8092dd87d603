use serde_json::Value;

use super::model::{VideoStatus, VideoTask, VideoTaskDraft};
use crate::row::{self, Row, RowError};

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const DUE_DATE: &str = "due_date";
pub const STATUS: &str = "status";

/// Translate a `video_tasks` row into a task
pub fn video_task_from_row(row: &Row) -> Result<VideoTask, RowError> {
    let raw_status = row::text(row, STATUS)?;
    let status = VideoStatus::parse(&raw_status).ok_or(RowError::Invalid {
        column: STATUS,
        value: raw_status,
    })?;

    Ok(VideoTask {
        id: row::text(row, row::ID)?,
        title: row::text(row, TITLE)?,
        description: row::optional_text(row, DESCRIPTION),
        due_date: row::date(row, DUE_DATE)?,
        status,
    })
}

pub fn video_task_row(draft: &VideoTaskDraft) -> Row {
    let mut row = Row::new();
    row.insert(TITLE.into(), Value::String(draft.title.clone()));
    row.insert(DESCRIPTION.into(), Value::String(draft.description.clone()));
    row.insert(DUE_DATE.into(), row::date_value(draft.due_date));
    row.insert(STATUS.into(), Value::String(draft.status.as_str().into()));
    row
}

pub fn status_patch(status: VideoStatus) -> Row {
    let mut row = Row::new();
    row.insert(STATUS.into(), Value::String(status.as_str().into()));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn reads_backend_row() {
        let row = json!({
            "id": "abc",
            "user_id": "u1",
            "title": "Intro Cut",
            "description": null,
            "due_date": "2025-01-10T00:00:00+00:00",
            "status": "in-progress",
            "created_at": "2025-01-01T09:00:00+00:00"
        });
        let task = video_task_from_row(row.as_object().unwrap()).unwrap();
        assert_eq!(task.id, "abc");
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(task.status, VideoStatus::InProgress);
    }

    #[test]
    fn unknown_status_is_invalid() {
        let row = json!({
            "id": "abc",
            "title": "t",
            "due_date": "2025-01-10",
            "status": "archived"
        });
        let err = video_task_from_row(row.as_object().unwrap()).unwrap_err();
        assert_eq!(
            err,
            RowError::Invalid { column: STATUS, value: "archived".into() }
        );
    }

    #[test]
    fn draft_row_uses_snake_case_columns() {
        let draft = VideoTaskDraft {
            title: "Intro Cut".into(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            status: VideoStatus::Pending,
        };
        let row = video_task_row(&draft);
        assert_eq!(row["due_date"], json!("2025-01-10"));
        assert_eq!(row["status"], json!("pending"));
        assert!(!row.contains_key("id"));
    }
}
