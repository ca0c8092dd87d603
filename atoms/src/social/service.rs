use serde_json::Value;

use super::model::{PostStatus, SocialMediaCheck, SocialMediaCheckDraft};
use crate::row::{self, Row, RowError};

pub const PLATFORM: &str = "platform";
pub const POST_DATE: &str = "post_date";
pub const DESIGNER_NAME: &str = "designer_name";
pub const STATUS: &str = "status";
pub const NOTES: &str = "notes";

/// Platform text is taken as stored; only the form restricts it to the
/// known platform list.
pub fn social_media_check_from_row(row: &Row) -> Result<SocialMediaCheck, RowError> {
    let raw_status = row::text(row, STATUS)?;
    let status = PostStatus::parse(&raw_status).ok_or(RowError::Invalid {
        column: STATUS,
        value: raw_status,
    })?;

    Ok(SocialMediaCheck {
        id: row::text(row, row::ID)?,
        platform: row::text(row, PLATFORM)?,
        post_date: row::date(row, POST_DATE)?,
        designer_name: row::text(row, DESIGNER_NAME)?,
        status,
        notes: row::optional_text(row, NOTES),
    })
}

pub fn social_media_check_row(draft: &SocialMediaCheckDraft) -> Row {
    let mut row = Row::new();
    row.insert(PLATFORM.into(), Value::String(draft.platform.clone()));
    row.insert(POST_DATE.into(), row::date_value(draft.post_date));
    row.insert(DESIGNER_NAME.into(), Value::String(draft.designer_name.clone()));
    row.insert(STATUS.into(), Value::String(draft.status.as_str().into()));
    row.insert(NOTES.into(), Value::String(draft.notes.clone()));
    row
}

pub fn status_patch(status: PostStatus) -> Row {
    let mut row = Row::new();
    row.insert(STATUS.into(), Value::String(status.as_str().into()));
    row
}
