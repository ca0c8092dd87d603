use crewdesk_atoms::TeamMember;
use serde::Serialize;

/// Summary cards above the roster table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterMetrics {
    pub member_count: usize,
    /// 0 for an empty roster.
    pub average_salary: f64,
    pub total_target_videos: u64,
}

impl RosterMetrics {
    pub fn from_members(members: &[TeamMember]) -> Self {
        let total_salary: f64 = members.iter().map(|m| m.salary).sum();
        let average_salary = if members.is_empty() {
            0.0
        } else {
            total_salary / members.len() as f64
        };
        Self {
            member_count: members.len(),
            average_salary,
            total_target_videos: members.iter().map(|m| u64::from(m.target_videos)).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(salary: f64, target_videos: u32) -> TeamMember {
        TeamMember {
            id: format!("m-{target_videos}"),
            description: "Editor".into(),
            phone: String::new(),
            salary,
            target_videos,
        }
    }

    #[test]
    fn empty_roster_averages_zero() {
        assert_eq!(RosterMetrics::from_members(&[]), RosterMetrics::default());
    }

    #[test]
    fn sums_and_averages() {
        let metrics = RosterMetrics::from_members(&[member(1000.0, 2), member(2000.0, 5)]);
        assert_eq!(metrics.member_count, 2);
        assert_eq!(metrics.average_salary, 1500.0);
        assert_eq!(metrics.total_target_videos, 7);
    }
}
