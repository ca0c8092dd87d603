use serde::{Deserialize, Serialize};

use crate::record::RecordId;

/// Members below this many target videos are flagged on the roster.
pub const TARGET_VIDEO_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: RecordId,
    pub description: String,
    pub phone: String,
    pub salary: f64,
    pub target_videos: u32,
}

impl TeamMember {
    pub fn is_below_target(&self) -> bool {
        self.target_videos < TARGET_VIDEO_THRESHOLD
    }

    pub fn apply(&mut self, field: &TeamMemberField) {
        match field {
            TeamMemberField::Description(v) => self.description = v.clone(),
            TeamMemberField::Phone(v) => self.phone = v.clone(),
            TeamMemberField::Salary(v) => self.salary = *v,
            TeamMemberField::TargetVideos(v) => self.target_videos = *v,
        }
    }
}

/// Editable roster columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterColumn {
    Description,
    Phone,
    Salary,
    TargetVideos,
}

/// One edited cell of a roster row.
#[derive(Debug, Clone, PartialEq)]
pub enum TeamMemberField {
    Description(String),
    Phone(String),
    Salary(f64),
    TargetVideos(u32),
}

impl TeamMemberField {
    /// Interprets raw cell input. Numbers that do not parse become 0 and
    /// negative numbers clamp to 0.
    pub fn parse(column: RosterColumn, raw: &str) -> Self {
        match column {
            RosterColumn::Description => TeamMemberField::Description(raw.to_string()),
            RosterColumn::Phone => TeamMemberField::Phone(raw.to_string()),
            RosterColumn::Salary => {
                let salary = raw.trim().parse::<f64>().unwrap_or(0.0);
                TeamMemberField::Salary(if salary.is_finite() { salary.max(0.0) } else { 0.0 })
            }
            RosterColumn::TargetVideos => {
                let target = raw.trim().parse::<i64>().unwrap_or(0);
                TeamMemberField::TargetVideos(u32::try_from(target.max(0)).unwrap_or(u32::MAX))
            }
        }
    }

    pub fn column(&self) -> RosterColumn {
        match self {
            TeamMemberField::Description(_) => RosterColumn::Description,
            TeamMemberField::Phone(_) => RosterColumn::Phone,
            TeamMemberField::Salary(_) => RosterColumn::Salary,
            TeamMemberField::TargetVideos(_) => RosterColumn::TargetVideos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults_bad_numbers_to_zero() {
        assert_eq!(
            TeamMemberField::parse(RosterColumn::Salary, "abc"),
            TeamMemberField::Salary(0.0)
        );
        assert_eq!(
            TeamMemberField::parse(RosterColumn::Salary, "-40"),
            TeamMemberField::Salary(0.0)
        );
        assert_eq!(
            TeamMemberField::parse(RosterColumn::TargetVideos, " 5 "),
            TeamMemberField::TargetVideos(5)
        );
        assert_eq!(
            TeamMemberField::parse(RosterColumn::TargetVideos, "-1"),
            TeamMemberField::TargetVideos(0)
        );
    }

    #[test]
    fn below_target_threshold() {
        let mut member = TeamMember {
            id: "m1".into(),
            description: "Editor".into(),
            phone: String::new(),
            salary: 0.0,
            target_videos: 2,
        };
        assert!(member.is_below_target());
        member.apply(&TeamMemberField::TargetVideos(3));
        assert!(!member.is_below_target());
    }
}
