use serde_json::Value;

use super::model::{TeamMember, TeamMemberField};
use crate::row::{self, Row, RowError, Table};
use crate::store::{translate_rows, Loaded, RecordStore, SortOrder, StoreError};

pub const DESCRIPTION: &str = "description";
pub const PHONE: &str = "phone";
pub const SALARY: &str = "salary";
pub const TARGET_VIDEOS: &str = "target_videos";

pub const NEW_MEMBER_DESCRIPTION: &str = "New Member";

pub fn team_member_from_row(row: &Row) -> Result<TeamMember, RowError> {
    Ok(TeamMember {
        id: row::text(row, row::ID)?,
        description: row::optional_text(row, DESCRIPTION),
        phone: row::optional_text(row, PHONE),
        salary: row::decimal(row, SALARY).unwrap_or(0.0).max(0.0),
        target_videos: row::whole_number(row, TARGET_VIDEOS).unwrap_or(0),
    })
}

/// Row for a freshly added roster member
pub fn new_member_row() -> Row {
    let mut row = Row::new();
    row.insert(DESCRIPTION.into(), Value::String(NEW_MEMBER_DESCRIPTION.into()));
    row.insert(PHONE.into(), Value::String(String::new()));
    row.insert(SALARY.into(), Value::from(0));
    row.insert(TARGET_VIDEOS.into(), Value::from(0));
    row
}

pub fn field_patch(field: &TeamMemberField) -> Row {
    let (column, value) = match field {
        TeamMemberField::Description(v) => (DESCRIPTION, Value::String(v.clone())),
        TeamMemberField::Phone(v) => (PHONE, Value::String(v.clone())),
        TeamMemberField::Salary(v) => (
            SALARY,
            serde_json::Number::from_f64(*v).map(Value::Number).unwrap_or(Value::from(0)),
        ),
        TeamMemberField::TargetVideos(v) => (TARGET_VIDEOS, Value::from(*v)),
    };
    let mut row = Row::new();
    row.insert(column.into(), value);
    row
}

/// Load the roster for a user, oldest member first. Unreadable rows are
/// skipped and reported in the result.
pub async fn load_team_members(
    store: &dyn RecordStore,
    user_id: &str,
) -> Result<Loaded<TeamMember>, StoreError> {
    let rows = store
        .select_for_user(Table::TeamMembers, user_id, SortOrder::OldestFirst)
        .await?;
    Ok(translate_rows(Table::TeamMembers, &rows, team_member_from_row))
}

pub async fn create_team_member(
    store: &dyn RecordStore,
    user_id: &str,
) -> Result<TeamMember, StoreError> {
    let stored = store.insert(Table::TeamMembers, user_id, new_member_row()).await?;
    Ok(team_member_from_row(&stored)?)
}

pub async fn update_team_member(
    store: &dyn RecordStore,
    user_id: &str,
    member_id: &str,
    field: &TeamMemberField,
) -> Result<(), StoreError> {
    store
        .update(Table::TeamMembers, user_id, member_id, field_patch(field))
        .await
}

pub async fn delete_team_member(
    store: &dyn RecordStore,
    user_id: &str,
    member_id: &str,
) -> Result<(), StoreError> {
    store.delete(Table::TeamMembers, user_id, member_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn patch_names_one_column() {
        let patch = field_patch(&TeamMemberField::Salary(1250.5));
        assert_eq!(patch.len(), 1);
        assert_eq!(patch[SALARY], json!(1250.5));
    }

    #[tokio::test]
    async fn created_member_has_defaults() {
        let store = MemoryStore::new();
        let member = create_team_member(&store, "u1").await.unwrap();
        assert_eq!(member.description, NEW_MEMBER_DESCRIPTION);
        assert_eq!(member.salary, 0.0);
        assert_eq!(member.target_videos, 0);

        update_team_member(&store, "u1", &member.id, &TeamMemberField::Phone("555".into()))
            .await
            .unwrap();
        let members = load_team_members(&store, "u1").await.unwrap().records;
        assert_eq!(members[0].phone, "555");
    }
}
