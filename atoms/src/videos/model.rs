use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::service;
use crate::fields::{FieldSpec, FieldValues, FormDraft};
use crate::record::{Record, RecordId, SummaryLine};
use crate::row::{display_date, Row, RowError, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoStatus {
    Pending,
    InProgress,
    Completed,
}

impl VideoStatus {
    pub const VALUES: &'static [&'static str] = &["pending", "in-progress", "completed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::InProgress => "in-progress",
            VideoStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(VideoStatus::Pending),
            "in-progress" => Some(VideoStatus::InProgress),
            "completed" => Some(VideoStatus::Completed),
            _ => None,
        }
    }
}

/// Video recording task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoTask {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub status: VideoStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoTaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub status: VideoStatus,
}

impl FormDraft for VideoTaskDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text(service::TITLE, "Video Title"),
        FieldSpec::long_text(service::DESCRIPTION, "Description"),
        FieldSpec::date(service::DUE_DATE, "Due Date"),
        FieldSpec::choice(service::STATUS, "Status", VideoStatus::VALUES, "pending"),
    ];

    fn to_values(&self) -> FieldValues {
        FieldValues::new()
            .with_text(service::TITLE, self.title.clone())
            .with_text(service::DESCRIPTION, self.description.clone())
            .with_date(service::DUE_DATE, self.due_date)
            .with_text(service::STATUS, self.status.as_str())
    }

    fn from_values(values: &FieldValues) -> Option<Self> {
        Some(Self {
            title: values.text(service::TITLE).to_string(),
            description: values.text(service::DESCRIPTION).to_string(),
            due_date: values.date(service::DUE_DATE)?,
            status: VideoStatus::parse(values.text(service::STATUS))?,
        })
    }
}

impl Record for VideoTask {
    type Draft = VideoTaskDraft;

    const TABLE: Table = Table::VideoTasks;
    const LABEL: &'static str = "Video task";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: RecordId, draft: VideoTaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            status: draft.status,
        }
    }

    fn to_draft(&self) -> VideoTaskDraft {
        VideoTaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            status: self.status,
        }
    }

    fn status(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }

    fn is_checked(&self) -> bool {
        self.status == VideoStatus::Completed
    }

    fn toggled(&self) -> Self {
        let status = match self.status {
            VideoStatus::Completed => VideoStatus::Pending,
            _ => VideoStatus::Completed,
        };
        Self {
            status,
            ..self.clone()
        }
    }

    fn toggle_patch(&self) -> Row {
        service::status_patch(self.toggled().status)
    }

    fn search_values(&self) -> Vec<String> {
        [
            self.id.clone(),
            self.title.clone(),
            self.description.clone(),
            self.due_date.to_string(),
            self.status.as_str().to_string(),
        ]
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect()
    }

    fn summary(&self) -> Vec<SummaryLine> {
        vec![
            SummaryLine::Heading(self.title.clone()),
            SummaryLine::Detail(self.description.clone()),
            SummaryLine::Caption(format!("Due: {}", display_date(self.due_date))),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, RowError> {
        service::video_task_from_row(row)
    }

    fn draft_row(draft: &VideoTaskDraft) -> Row {
        service::video_task_row(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: VideoStatus) -> VideoTask {
        VideoTask {
            id: "v1".into(),
            title: "Intro Cut".into(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            status,
        }
    }

    #[test]
    fn toggle_flips_between_completed_and_pending() {
        let pending = task(VideoStatus::Pending);
        let completed = pending.toggled();
        assert_eq!(completed.status, VideoStatus::Completed);
        assert!(completed.is_checked());
        assert_eq!(completed.toggled(), pending);
    }

    #[test]
    fn in_progress_toggles_to_completed() {
        assert_eq!(
            task(VideoStatus::InProgress).toggled().status,
            VideoStatus::Completed
        );
    }

    #[test]
    fn search_values_skip_empty_fields() {
        let values = task(VideoStatus::Pending).search_values();
        assert_eq!(values, vec!["v1", "Intro Cut", "2025-01-10", "pending"]);
    }

    #[test]
    fn summary_lines() {
        let lines = task(VideoStatus::Pending).summary();
        assert_eq!(lines[0], SummaryLine::Heading("Intro Cut".into()));
        assert_eq!(lines[2], SummaryLine::Caption("Due: January 10, 2025".into()));
    }
}
