use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::service;
use crate::fields::{FieldSpec, FieldValues, FormDraft};
use crate::record::{Record, RecordId, SummaryLine};
use crate::row::{display_date, Row, RowError, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CelebrityStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl CelebrityStatus {
    pub const VALUES: &'static [&'static str] = &["scheduled", "in-progress", "completed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CelebrityStatus::Scheduled => "scheduled",
            CelebrityStatus::InProgress => "in-progress",
            CelebrityStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "scheduled" => Some(CelebrityStatus::Scheduled),
            "in-progress" => Some(CelebrityStatus::InProgress),
            "completed" => Some(CelebrityStatus::Completed),
            _ => None,
        }
    }
}

/// Recording session booked with a celebrity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebritySchedule {
    pub id: RecordId,
    pub name: String,
    pub video_count: u32,
    pub scheduled_date: NaiveDate,
    pub status: CelebrityStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrityScheduleDraft {
    pub name: String,
    pub video_count: u32,
    pub scheduled_date: NaiveDate,
    pub status: CelebrityStatus,
}

impl FormDraft for CelebrityScheduleDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text(service::NAME, "Celebrity Name"),
        FieldSpec::positive_int(service::VIDEO_COUNT, "Number of Videos"),
        FieldSpec::date(service::SCHEDULED_DATE, "Scheduled Date"),
        FieldSpec::choice(service::STATUS, "Status", CelebrityStatus::VALUES, "scheduled"),
    ];

    fn to_values(&self) -> FieldValues {
        FieldValues::new()
            .with_text(service::NAME, self.name.clone())
            .with_text(service::VIDEO_COUNT, self.video_count.to_string())
            .with_date(service::SCHEDULED_DATE, self.scheduled_date)
            .with_text(service::STATUS, self.status.as_str())
    }

    fn from_values(values: &FieldValues) -> Option<Self> {
        let video_count = values
            .text(service::VIDEO_COUNT)
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)?;

        Some(Self {
            name: values.text(service::NAME).to_string(),
            video_count,
            scheduled_date: values.date(service::SCHEDULED_DATE)?,
            status: CelebrityStatus::parse(values.text(service::STATUS))?,
        })
    }
}

impl Record for CelebritySchedule {
    type Draft = CelebrityScheduleDraft;

    const TABLE: Table = Table::CelebritySchedules;
    const LABEL: &'static str = "Celebrity schedule";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: RecordId, draft: CelebrityScheduleDraft) -> Self {
        Self {
            id,
            name: draft.name,
            video_count: draft.video_count,
            scheduled_date: draft.scheduled_date,
            status: draft.status,
        }
    }

    fn to_draft(&self) -> CelebrityScheduleDraft {
        CelebrityScheduleDraft {
            name: self.name.clone(),
            video_count: self.video_count,
            scheduled_date: self.scheduled_date,
            status: self.status,
        }
    }

    fn status(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }

    fn is_checked(&self) -> bool {
        self.status == CelebrityStatus::Completed
    }

    fn toggled(&self) -> Self {
        let status = match self.status {
            CelebrityStatus::Completed => CelebrityStatus::Scheduled,
            _ => CelebrityStatus::Completed,
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
        let mut values = vec![self.id.clone(), self.name.clone()];
        if self.video_count > 0 {
            values.push(self.video_count.to_string());
        }
        values.push(self.scheduled_date.to_string());
        values.push(self.status.as_str().to_string());
        values.retain(|v| !v.is_empty());
        values
    }

    fn summary(&self) -> Vec<SummaryLine> {
        vec![
            SummaryLine::Heading(self.name.clone()),
            SummaryLine::Detail(format!("Videos: {}", self.video_count)),
            SummaryLine::Caption(format!("Scheduled: {}", display_date(self.scheduled_date))),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, RowError> {
        service::celebrity_schedule_from_row(row)
    }

    fn draft_row(draft: &CelebrityScheduleDraft) -> Row {
        service::celebrity_schedule_row(draft)
    }
}
