use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::service;
use crate::fields::{FieldSpec, FieldValues, FormDraft};
use crate::record::{Record, RecordId, SummaryLine};
use crate::row::{display_date, Row, RowError, Table};

/// Platforms a post can be checked on.
pub const PLATFORMS: &[&str] = &[
    "Facebook",
    "TikTok",
    "Instagram",
    "Twitter",
    "LinkedIn",
    "YouTube",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostStatus {
    Posted,
    NotPosted,
    Pending,
}

impl PostStatus {
    pub const VALUES: &'static [&'static str] = &["posted", "not-posted", "pending"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Posted => "posted",
            PostStatus::NotPosted => "not-posted",
            PostStatus::Pending => "pending",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "posted" => Some(PostStatus::Posted),
            "not-posted" => Some(PostStatus::NotPosted),
            "pending" => Some(PostStatus::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMediaCheck {
    pub id: RecordId,
    pub platform: String,
    pub post_date: NaiveDate,
    pub designer_name: String,
    pub status: PostStatus,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMediaCheckDraft {
    pub platform: String,
    pub post_date: NaiveDate,
    pub designer_name: String,
    pub status: PostStatus,
    pub notes: String,
}

impl FormDraft for SocialMediaCheckDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::choice(service::PLATFORM, "Platform", PLATFORMS, ""),
        FieldSpec::date(service::POST_DATE, "Post Date"),
        FieldSpec::text(service::DESIGNER_NAME, "Designer Name"),
        FieldSpec::choice(service::STATUS, "Status", PostStatus::VALUES, "not-posted"),
        FieldSpec::long_text(service::NOTES, "Notes"),
    ];

    fn to_values(&self) -> FieldValues {
        FieldValues::new()
            .with_text(service::PLATFORM, self.platform.clone())
            .with_date(service::POST_DATE, self.post_date)
            .with_text(service::DESIGNER_NAME, self.designer_name.clone())
            .with_text(service::STATUS, self.status.as_str())
            .with_text(service::NOTES, self.notes.clone())
    }

    fn from_values(values: &FieldValues) -> Option<Self> {
        Some(Self {
            platform: values.text(service::PLATFORM).to_string(),
            post_date: values.date(service::POST_DATE)?,
            designer_name: values.text(service::DESIGNER_NAME).to_string(),
            status: PostStatus::parse(values.text(service::STATUS))?,
            notes: values.text(service::NOTES).to_string(),
        })
    }
}

impl Record for SocialMediaCheck {
    type Draft = SocialMediaCheckDraft;

    const TABLE: Table = Table::SocialMediaChecks;
    const LABEL: &'static str = "Social media check";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: RecordId, draft: SocialMediaCheckDraft) -> Self {
        Self {
            id,
            platform: draft.platform,
            post_date: draft.post_date,
            designer_name: draft.designer_name,
            status: draft.status,
            notes: draft.notes,
        }
    }

    fn to_draft(&self) -> SocialMediaCheckDraft {
        SocialMediaCheckDraft {
            platform: self.platform.clone(),
            post_date: self.post_date,
            designer_name: self.designer_name.clone(),
            status: self.status,
            notes: self.notes.clone(),
        }
    }

    fn status(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }

    fn is_checked(&self) -> bool {
        self.status == PostStatus::Posted
    }

    fn toggled(&self) -> Self {
        let status = match self.status {
            PostStatus::Posted => PostStatus::NotPosted,
            _ => PostStatus::Posted,
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
            self.platform.clone(),
            self.post_date.to_string(),
            self.designer_name.clone(),
            self.status.as_str().to_string(),
            self.notes.clone(),
        ]
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect()
    }

    fn summary(&self) -> Vec<SummaryLine> {
        let mut lines = vec![
            SummaryLine::Heading(self.platform.clone()),
            SummaryLine::Detail(format!("Designer: {}", self.designer_name)),
            SummaryLine::Caption(format!("Date: {}", display_date(self.post_date))),
        ];
        if !self.notes.is_empty() {
            lines.push(SummaryLine::Caption(format!("Notes: {}", self.notes)));
        }
        lines
    }

    fn from_row(row: &Row) -> Result<Self, RowError> {
        service::social_media_check_from_row(row)
    }

    fn draft_row(draft: &SocialMediaCheckDraft) -> Row {
        service::social_media_check_row(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_moves_between_posted_and_not_posted() {
        let check = SocialMediaCheck {
            id: "s1".into(),
            platform: "Instagram".into(),
            post_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            designer_name: "Noor".into(),
            status: PostStatus::Pending,
            notes: String::new(),
        };
        let posted = check.toggled();
        assert_eq!(posted.status, PostStatus::Posted);
        assert!(posted.is_checked());
        assert_eq!(posted.toggled().status, PostStatus::NotPosted);
        assert_eq!(posted.toggled().toggled(), posted);
    }
}
