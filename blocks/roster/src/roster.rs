use std::path::PathBuf;
use std::sync::Arc;

use crewdesk_atoms::team::{
    create_team_member, delete_team_member, load_team_members, update_team_member,
};
use crewdesk_atoms::{
    Notice, Notices, RecordStore, RosterColumn, StoreError, Table, TeamMember, TeamMemberField,
};
use tracing::info;

use crate::export::{ExportError, ExportSheet, FileSink};
use crate::metrics::RosterMetrics;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("no team member with id {0}")]
    UnknownMember(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// One rendered roster line.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow<'a> {
    /// 1-based position.
    pub index: usize,
    pub member: &'a TeamMember,
    pub below_target: bool,
    pub editing: bool,
}

/// Team roster for one user. Writes are confirmed by the store before the
/// local list changes; adds and deletes re-fetch the whole roster.
pub struct Roster {
    store: Arc<dyn RecordStore>,
    user_id: String,
    members: Vec<TeamMember>,
    loading: bool,
    editing: Option<String>,
    notices: Notices,
}

impl Roster {
    pub fn new(store: Arc<dyn RecordStore>, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            members: Vec::new(),
            loading: true,
            editing: None,
            notices: Notices::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Fetches the roster, oldest member first. On failure the current list
    /// is kept.
    pub async fn load(&mut self) -> Result<(), RosterError> {
        let store = Arc::clone(&self.store);
        let result = load_team_members(store.as_ref(), &self.user_id).await;
        self.loading = false;
        match result {
            Ok(loaded) => {
                info!(
                    user_id = %self.user_id,
                    count = loaded.records.len(),
                    skipped = loaded.skipped.len(),
                    "roster loaded"
                );
                if let Some(summary) = loaded.skipped_summary(Table::TeamMembers) {
                    self.notices.error("Some team members could not be read", summary);
                }
                self.members = loaded.records;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Adds a default member, then re-fetches.
    pub async fn add_member(&mut self) -> Result<(), RosterError> {
        let store = Arc::clone(&self.store);
        let result = create_team_member(store.as_ref(), &self.user_id).await;
        match result {
            Ok(member) => {
                info!(id = %member.id, "team member added");
                self.load().await?;
                self.notices.success("Member added successfully");
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub async fn update_member(
        &mut self,
        id: &str,
        field: TeamMemberField,
    ) -> Result<(), RosterError> {
        if !self.members.iter().any(|m| m.id == id) {
            return Err(RosterError::UnknownMember(id.to_string()));
        }
        let store = Arc::clone(&self.store);
        let result = update_team_member(store.as_ref(), &self.user_id, id, &field).await;
        match result {
            Ok(()) => {
                info!(id = %id, column = ?field.column(), "team member updated");
                if let Some(member) = self.members.iter_mut().find(|m| m.id == id) {
                    member.apply(&field);
                }
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Parses raw cell input for `column` and saves it.
    pub async fn edit_cell(
        &mut self,
        id: &str,
        column: RosterColumn,
        raw: &str,
    ) -> Result<(), RosterError> {
        self.update_member(id, TeamMemberField::parse(column, raw)).await
    }

    /// Deletes a member, then re-fetches.
    pub async fn delete_member(&mut self, id: &str) -> Result<(), RosterError> {
        let store = Arc::clone(&self.store);
        let result = delete_team_member(store.as_ref(), &self.user_id, id).await;
        match result {
            Ok(()) => {
                info!(id = %id, "team member deleted");
                if self.editing.as_deref() == Some(id) {
                    self.editing = None;
                }
                self.load().await?;
                self.notices.success("Member deleted successfully");
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub fn start_editing(&mut self, id: &str) {
        self.editing = Some(id.to_string());
    }

    pub fn stop_editing(&mut self) {
        self.editing = None;
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn rows(&self) -> Vec<RosterRow<'_>> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, member)| RosterRow {
                index: i + 1,
                member,
                below_target: member.is_below_target(),
                editing: self.editing.as_deref() == Some(member.id.as_str()),
            })
            .collect()
    }

    pub fn metrics(&self) -> RosterMetrics {
        RosterMetrics::from_members(&self.members)
    }

    pub fn export_sheet(&self) -> ExportSheet {
        ExportSheet::from_members(&self.members)
    }

    /// Builds the spreadsheet from the in-memory roster and hands it to
    /// `sink`.
    pub async fn export(&mut self, sink: &dyn FileSink) -> Result<PathBuf, RosterError> {
        let delivered = match self.export_sheet().to_file() {
            Ok(file) => sink.deliver(&file).await,
            Err(err) => Err(err),
        };
        match delivered {
            Ok(path) => {
                self.notices.success("Excel file downloaded successfully");
                Ok(path)
            }
            Err(err) => {
                self.notices.error("Error", err.to_string());
                Err(err.into())
            }
        }
    }

    fn fail(&mut self, err: StoreError) -> RosterError {
        self.notices.error("Error", err.to_string());
        RosterError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportFile;
    use async_trait::async_trait;
    use crewdesk_atoms::{MemoryStore, NoticeLevel, Row, SortOrder, StoreOp};
    use serde_json::json;
    use std::sync::Mutex;

    async fn roster_with(count: usize) -> (Roster, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mut roster = Roster::new(store.clone(), "user-1");
        roster.load().await.unwrap();
        for _ in 0..count {
            roster.add_member().await.unwrap();
        }
        roster.take_notices();
        (roster, store)
    }

    #[derive(Default)]
    struct Captured {
        files: Mutex<Vec<ExportFile>>,
    }

    #[async_trait]
    impl FileSink for Captured {
        async fn deliver(&self, file: &ExportFile) -> Result<PathBuf, ExportError> {
            self.files.lock().unwrap().push(file.clone());
            Ok(PathBuf::from(&file.filename))
        }
    }

    /// Serves a fixed set of rows and refuses writes.
    struct FixedRows(Vec<Row>);

    #[async_trait]
    impl RecordStore for FixedRows {
        async fn insert(&self, table: Table, _: &str, _: Row) -> Result<Row, StoreError> {
            Err(StoreError::Backend {
                table,
                message: "read only".into(),
            })
        }

        async fn select_for_user(
            &self,
            _: Table,
            _: &str,
            _: SortOrder,
        ) -> Result<Vec<Row>, StoreError> {
            Ok(self.0.clone())
        }

        async fn update(&self, table: Table, _: &str, _: &str, _: Row) -> Result<(), StoreError> {
            Err(StoreError::Backend {
                table,
                message: "read only".into(),
            })
        }

        async fn delete(&self, table: Table, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend {
                table,
                message: "read only".into(),
            })
        }
    }

    #[tokio::test]
    async fn unreadable_member_is_skipped_with_one_notice() {
        let rows = [
            json!({"id": "m1", "description": "Lea", "salary": 900}),
            json!({"description": "no id"}),
            json!({"id": "m2", "description": "Sam", "target_videos": 6}),
        ]
        .into_iter()
        .filter_map(|value| value.as_object().cloned())
        .collect();
        let mut roster = Roster::new(Arc::new(FixedRows(rows)), "user-1");

        roster.load().await.unwrap();
        let ids: Vec<_> = roster.members().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);

        let notices = roster.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].title, "Some team members could not be read");
    }

    #[tokio::test]
    async fn new_roster_is_loading_until_fetched() {
        let store = Arc::new(MemoryStore::new());
        let mut roster = Roster::new(store, "user-1");
        assert!(roster.is_loading());
        roster.load().await.unwrap();
        assert!(!roster.is_loading());
        assert!(roster.members().is_empty());
    }

    #[tokio::test]
    async fn added_members_keep_creation_order() {
        let (roster, _) = roster_with(3).await;
        let rows = roster.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(rows.iter().all(|r| r.member.description == "New Member"));
    }

    #[tokio::test]
    async fn raising_target_clears_the_flag() {
        let (mut roster, _) = roster_with(1).await;
        let id = roster.members()[0].id.clone();

        roster.edit_cell(&id, RosterColumn::TargetVideos, "2").await.unwrap();
        assert!(roster.rows()[0].below_target);

        roster.edit_cell(&id, RosterColumn::TargetVideos, "5").await.unwrap();
        assert!(!roster.rows()[0].below_target);
        assert_eq!(roster.metrics().total_target_videos, 5);
    }

    #[tokio::test]
    async fn rejected_edit_leaves_member_unchanged() {
        let (mut roster, store) = roster_with(1).await;
        let id = roster.members()[0].id.clone();
        store.fail_on(Table::TeamMembers, StoreOp::Update);

        let err = roster
            .update_member(&id, TeamMemberField::Salary(900.0))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Store(_)));
        assert_eq!(roster.members()[0].salary, 0.0);
        assert_eq!(roster.take_notices()[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn delete_refetches() {
        let (mut roster, store) = roster_with(2).await;
        let id = roster.members()[0].id.clone();
        roster.start_editing(&id);

        roster.delete_member(&id).await.unwrap();
        assert_eq!(roster.members().len(), 1);
        assert_eq!(roster.editing_id(), None);
        assert_eq!(store.rows(Table::TeamMembers).len(), 1);
        assert_eq!(roster.take_notices()[0].title, "Member deleted successfully");
    }

    #[tokio::test]
    async fn export_hands_workbook_to_sink() {
        let (mut roster, _) = roster_with(2).await;
        let id = roster.members()[1].id.clone();
        roster.edit_cell(&id, RosterColumn::Salary, "1250.5").await.unwrap();

        let sheet = roster.export_sheet();
        assert_eq!(sheet.rows[1].salary, "$1250.50");

        let sink = Captured::default();
        let path = roster.export(&sink).await.unwrap();
        assert_eq!(path, PathBuf::from("team_tracking.xlsx"));
        assert_eq!(sink.files.lock().unwrap().len(), 1);
        assert_eq!(
            roster.take_notices()[0].title,
            "Excel file downloaded successfully"
        );
    }
}
