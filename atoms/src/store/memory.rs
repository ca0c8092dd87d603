use super::{RecordStore, SortOrder, StoreError};
use crate::row::{Row, Table, CREATED_AT, ID, RESERVED_COLUMNS, USER_ID};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Insert,
    Select,
    Update,
    Delete,
}

#[derive(Default)]
struct Tables {
    rows: HashMap<Table, Vec<Row>>,
    failing: HashSet<(Table, StoreOp)>,
}

/// Record store kept in process memory. Rows stay in insertion order, which
/// is also creation order.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `op` against `table` fail until [`MemoryStore::recover`].
    pub fn fail_on(&self, table: Table, op: StoreOp) {
        self.lock().failing.insert((table, op));
    }

    pub fn recover(&self, table: Table, op: StoreOp) {
        self.lock().failing.remove(&(table, op));
    }

    /// Rows of a table across all users, oldest first.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.lock().rows.get(&table).cloned().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn check(tables: &Tables, table: Table, op: StoreOp) -> Result<(), StoreError> {
    if tables.failing.contains(&(table, op)) {
        return Err(StoreError::Backend {
            table,
            message: format!("{:?} rejected by backend", op),
        });
    }
    Ok(())
}

fn owned_by(row: &Row, user_id: &str) -> bool {
    row.get(USER_ID).and_then(Value::as_str) == Some(user_id)
}

fn has_id(row: &Row, id: &str) -> bool {
    row.get(ID).and_then(Value::as_str) == Some(id)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, table: Table, user_id: &str, mut row: Row) -> Result<Row, StoreError> {
        let mut tables = self.lock();
        check(&tables, table, StoreOp::Insert)?;

        row.insert(ID.to_string(), Value::String(uuid::Uuid::new_v4().to_string()));
        row.insert(USER_ID.to_string(), Value::String(user_id.to_string()));
        row.insert(
            CREATED_AT.to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
        tables.rows.entry(table).or_default().push(row.clone());
        Ok(row)
    }

    async fn select_for_user(
        &self,
        table: Table,
        user_id: &str,
        order: SortOrder,
    ) -> Result<Vec<Row>, StoreError> {
        let tables = self.lock();
        check(&tables, table, StoreOp::Select)?;

        let mut rows: Vec<Row> = tables
            .rows
            .get(&table)
            .map(|rows| rows.iter().filter(|r| owned_by(r, user_id)).cloned().collect())
            .unwrap_or_default();
        if order == SortOrder::NewestFirst {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn update(
        &self,
        table: Table,
        user_id: &str,
        id: &str,
        patch: Row,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock();
        check(&tables, table, StoreOp::Update)?;

        let row = tables
            .rows
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|r| has_id(r, id) && owned_by(r, user_id)))
            .ok_or_else(|| StoreError::NotFound {
                table,
                id: id.to_string(),
            })?;
        for (column, value) in patch {
            if !RESERVED_COLUMNS.contains(&column.as_str()) {
                row.insert(column, value);
            }
        }
        Ok(())
    }

    async fn delete(&self, table: Table, user_id: &str, id: &str) -> Result<(), StoreError> {
        let mut tables = self.lock();
        check(&tables, table, StoreOp::Delete)?;

        if let Some(rows) = tables.rows.get_mut(&table) {
            rows.retain(|r| !(has_id(r, id) && owned_by(r, user_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_backend_columns() {
        let store = MemoryStore::new();
        let stored = store
            .insert(Table::VideoTasks, "u1", row(json!({ "title": "Intro" })))
            .await
            .unwrap();
        assert!(stored.get(ID).and_then(Value::as_str).is_some());
        assert_eq!(stored.get(USER_ID), Some(&json!("u1")));
        assert!(stored.contains_key(CREATED_AT));
    }

    #[tokio::test]
    async fn select_is_scoped_and_ordered() {
        let store = MemoryStore::new();
        for title in ["a", "b"] {
            store
                .insert(Table::VideoTasks, "u1", row(json!({ "title": title })))
                .await
                .unwrap();
        }
        store
            .insert(Table::VideoTasks, "u2", row(json!({ "title": "other" })))
            .await
            .unwrap();

        let newest = store
            .select_for_user(Table::VideoTasks, "u1", SortOrder::NewestFirst)
            .await
            .unwrap();
        let titles: Vec<_> = newest.iter().map(|r| r["title"].clone()).collect();
        assert_eq!(titles, vec![json!("b"), json!("a")]);
    }

    #[tokio::test]
    async fn update_keeps_reserved_columns() {
        let store = MemoryStore::new();
        let stored = store
            .insert(Table::TeamMembers, "u1", row(json!({ "phone": "" })))
            .await
            .unwrap();
        let id = stored[ID].as_str().unwrap().to_string();

        store
            .update(Table::TeamMembers, "u1", &id, row(json!({ "phone": "555", "id": "hijack" })))
            .await
            .unwrap();
        let rows = store.rows(Table::TeamMembers);
        assert_eq!(rows[0]["phone"], json!("555"));
        assert_eq!(rows[0][ID], json!(id));
    }

    #[tokio::test]
    async fn update_of_foreign_row_is_not_found() {
        let store = MemoryStore::new();
        let stored = store
            .insert(Table::TeamMembers, "u1", Row::new())
            .await
            .unwrap();
        let id = stored[ID].as_str().unwrap();
        let err = store
            .update(Table::TeamMembers, "u2", id, Row::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn injected_failures_until_recovered() {
        let store = MemoryStore::new();
        store.fail_on(Table::VideoTasks, StoreOp::Insert);
        assert!(store.insert(Table::VideoTasks, "u1", Row::new()).await.is_err());
        store.recover(Table::VideoTasks, StoreOp::Insert);
        assert!(store.insert(Table::VideoTasks, "u1", Row::new()).await.is_ok());
    }
}
