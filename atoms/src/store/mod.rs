pub mod memory;

pub use memory::{MemoryStore, StoreOp};

use crate::record::Record;
use crate::row::{Row, RowError, Table, ID};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    OldestFirst,
    NewestFirst,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("{table} request failed: {message}")]
    Backend { table: Table, message: String },

    #[error("no {table} record with id {id}")]
    NotFound { table: Table, id: String },

    #[error(transparent)]
    Row(#[from] RowError),
}

/// Hosted backend holding per-user rows for each table.
///
/// Every call is scoped to `user_id`; rows owned by other users are never
/// returned or touched.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Stores a row and returns it with `id`, `user_id` and `created_at` set.
    async fn insert(&self, table: Table, user_id: &str, row: Row) -> Result<Row, StoreError>;

    async fn select_for_user(
        &self,
        table: Table,
        user_id: &str,
        order: SortOrder,
    ) -> Result<Vec<Row>, StoreError>;

    /// Writes the columns present in `patch` onto the row with `id`.
    async fn update(
        &self,
        table: Table,
        user_id: &str,
        id: &str,
        patch: Row,
    ) -> Result<(), StoreError>;

    async fn delete(&self, table: Table, user_id: &str, id: &str) -> Result<(), StoreError>;
}

/// A row left out of a load because it could not be translated.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Stored identifier, empty when the row has none.
    pub id: String,
    pub error: RowError,
}

/// Outcome of a load: every row that translated, in store order, and the
/// rows that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

impl<T> Loaded<T> {
    /// One-line account of the skipped rows, if any.
    pub fn skipped_summary(&self, table: Table) -> Option<String> {
        let first = self.skipped.first()?;
        Some(format!(
            "{} {} row(s) could not be read: {}",
            self.skipped.len(),
            table,
            first.error
        ))
    }
}

/// Translates rows one by one. A row that fails is logged and skipped; the
/// rest are kept.
pub fn translate_rows<T>(
    table: Table,
    rows: &[Row],
    translate: impl Fn(&Row) -> Result<T, RowError>,
) -> Loaded<T> {
    let mut loaded = Loaded {
        records: Vec::with_capacity(rows.len()),
        skipped: Vec::new(),
    };
    for row in rows {
        match translate(row) {
            Ok(record) => loaded.records.push(record),
            Err(error) => {
                let id = row.get(ID).and_then(Value::as_str).unwrap_or_default();
                tracing::warn!(%table, id, %error, "skipping unreadable row");
                loaded.skipped.push(SkippedRow {
                    id: id.to_string(),
                    error,
                });
            }
        }
    }
    loaded
}

/// Load every record of one kind for a user.
pub async fn load_records<R: Record>(
    store: &dyn RecordStore,
    user_id: &str,
    order: SortOrder,
) -> Result<Loaded<R>, StoreError> {
    let rows = store.select_for_user(R::TABLE, user_id, order).await?;
    Ok(translate_rows(R::TABLE, &rows, R::from_row))
}

/// Insert a draft and return the stored record with its backend id.
pub async fn create_record<R: Record>(
    store: &dyn RecordStore,
    user_id: &str,
    draft: &R::Draft,
) -> Result<R, StoreError> {
    let stored = store.insert(R::TABLE, user_id, R::draft_row(draft)).await?;
    Ok(R::from_row(&stored)?)
}

/// Overwrite every form field of a stored record.
pub async fn update_record<R: Record>(
    store: &dyn RecordStore,
    user_id: &str,
    record: &R,
) -> Result<(), StoreError> {
    store
        .update(R::TABLE, user_id, record.id(), R::draft_row(&record.to_draft()))
        .await
}

/// Persist one toggle click and return the toggled record.
pub async fn toggle_record<R: Record>(
    store: &dyn RecordStore,
    user_id: &str,
    record: &R,
) -> Result<R, StoreError> {
    store
        .update(R::TABLE, user_id, record.id(), record.toggle_patch())
        .await?;
    Ok(record.toggled())
}

pub async fn delete_record<R: Record>(
    store: &dyn RecordStore,
    user_id: &str,
    id: &str,
) -> Result<(), StoreError> {
    store.delete(R::TABLE, user_id, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap_or_default()
    }

    fn count(row: &Row) -> Result<u64, RowError> {
        match row.get("count").and_then(Value::as_u64) {
            Some(0) | None => Err(RowError::Missing("count")),
            Some(n) => Ok(n),
        }
    }

    #[test]
    fn bad_rows_are_skipped_and_good_rows_kept() {
        let rows = vec![
            row(json!({"id": "a", "count": 2})),
            row(json!({"id": "b", "count": 0})),
            row(json!({"id": "c", "count": 5})),
        ];
        let loaded = translate_rows(Table::CelebritySchedules, &rows, count);

        assert_eq!(loaded.records, vec![2, 5]);
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.skipped[0].id, "b");
        let summary = loaded.skipped_summary(Table::CelebritySchedules).unwrap();
        assert_eq!(
            summary,
            "1 celebrity_schedules row(s) could not be read: row is missing column `count`"
        );
    }

    #[test]
    fn clean_load_has_no_summary() {
        let rows = vec![row(json!({"id": "a", "count": 1}))];
        let loaded = translate_rows(Table::VideoTasks, &rows, count);
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.skipped_summary(Table::VideoTasks), None);
    }
}
