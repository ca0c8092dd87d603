use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use crewdesk_atoms::row::{CREATED_AT, ID, RESERVED_COLUMNS, USER_ID};
use crewdesk_atoms::{RecordStore, Row, SortOrder, StoreError, Table};
use serde_json::{Number, Value};

/// Single-table DynamoDB store. Items live under `PK=USER#<user_id>`,
/// `SK=<TABLE_PREFIX>#<id>`.
#[derive(Clone, Debug)]
pub struct DynamoStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoStore {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

pub fn partition_key(user_id: &str) -> String {
    format!("USER#{}", user_id)
}

pub fn sort_key(table: Table, id: &str) -> String {
    format!("{}#{}", table.item_prefix(), id)
}

pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute(v)))
                .collect(),
        ),
    }
}

pub fn from_attribute(attr: &AttributeValue) -> Value {
    match attr {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(items) => Value::Array(items.iter().map(from_attribute).collect()),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), from_attribute(v)))
                .collect(),
        ),
        // Sets and binary values are never written by this store.
        _ => Value::Null,
    }
}

fn parse_number(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Item attributes back to a row, dropping the key attributes.
pub fn item_to_row(item: &HashMap<String, AttributeValue>) -> Row {
    item.iter()
        .filter(|(k, _)| k.as_str() != "PK" && k.as_str() != "SK")
        .map(|(k, v)| (k.clone(), from_attribute(v)))
        .collect()
}

fn created_at(row: &Row) -> &str {
    row.get(CREATED_AT).and_then(Value::as_str).unwrap_or_default()
}

/// Orders rows by their RFC 3339 `created_at`.
pub fn sort_rows(rows: &mut [Row], order: SortOrder) {
    rows.sort_by(|a, b| created_at(a).cmp(created_at(b)));
    if order == SortOrder::NewestFirst {
        rows.reverse();
    }
}

fn backend(table: Table, context: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Backend {
        table,
        message: format!("DynamoDB {} error: {}", context, err),
    }
}

#[async_trait]
impl RecordStore for DynamoStore {
    async fn insert(&self, table: Table, user_id: &str, mut row: Row) -> Result<Row, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        row.insert(ID.to_string(), Value::String(id.clone()));
        row.insert(USER_ID.to_string(), Value::String(user_id.to_string()));
        row.insert(CREATED_AT.to_string(), Value::String(now));

        let mut item: HashMap<String, AttributeValue> = row
            .iter()
            .map(|(k, v)| (k.clone(), to_attribute(v)))
            .collect();
        item.insert("PK".into(), AttributeValue::S(partition_key(user_id)));
        item.insert("SK".into(), AttributeValue::S(sort_key(table, &id)));

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| backend(table, "put_item", e))?;

        tracing::info!(%table, %id, "item stored");
        Ok(row)
    }

    async fn select_for_user(
        &self,
        table: Table,
        user_id: &str,
        order: SortOrder,
    ) -> Result<Vec<Row>, StoreError> {
        let mut rows = Vec::new();
        let mut start_key = None;
        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
                .expression_attribute_values(":pk", AttributeValue::S(partition_key(user_id)))
                .expression_attribute_values(
                    ":sk_prefix",
                    AttributeValue::S(format!("{}#", table.item_prefix())),
                )
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| backend(table, "query", e))?;

            rows.extend(result.items().iter().map(item_to_row));
            match result.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }
        sort_rows(&mut rows, order);
        Ok(rows)
    }

    async fn update(
        &self,
        table: Table,
        user_id: &str,
        id: &str,
        patch: Row,
    ) -> Result<(), StoreError> {
        let mut update_expr = vec![];
        let mut expr_names = HashMap::new();
        let mut expr_values = HashMap::new();

        for (i, (column, value)) in patch
            .iter()
            .filter(|(column, _)| !RESERVED_COLUMNS.contains(&column.as_str()))
            .enumerate()
        {
            update_expr.push(format!("#f{i} = :v{i}"));
            expr_names.insert(format!("#f{i}"), column.clone());
            expr_values.insert(format!(":v{i}"), to_attribute(value));
        }
        if update_expr.is_empty() {
            return Ok(());
        }

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(partition_key(user_id)))
            .key("SK", AttributeValue::S(sort_key(table, id)))
            .update_expression(format!("SET {}", update_expr.join(", ")))
            .condition_expression("attribute_exists(SK)")
            .set_expression_attribute_names(Some(expr_names))
            .set_expression_attribute_values(Some(expr_values))
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(%table, %id, "item updated");
                Ok(())
            }
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::NotFound {
                    table,
                    id: id.to_string(),
                })
            }
            Err(e) => Err(backend(table, "update_item", e)),
        }
    }

    async fn delete(&self, table: Table, user_id: &str, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(partition_key(user_id)))
            .key("SK", AttributeValue::S(sort_key(table, id)))
            .send()
            .await
            .map_err(|e| backend(table, "delete_item", e))?;

        tracing::info!(%table, %id, "item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_scope_items_to_user_and_table() {
        assert_eq!(partition_key("u1"), "USER#u1");
        assert_eq!(sort_key(Table::VideoTasks, "abc"), "VIDEO_TASK#abc");
    }

    #[test]
    fn attributes_convert_both_ways() {
        let value = json!({
            "title": "Intro Cut",
            "video_count": 3,
            "salary": 1250.5,
            "delivered": false,
            "notes": null,
        });
        assert_eq!(from_attribute(&to_attribute(&value)), value);
        assert_eq!(to_attribute(&json!(3)), AttributeValue::N("3".into()));
    }

    #[test]
    fn item_keys_are_not_row_columns() {
        let mut item = HashMap::new();
        item.insert("PK".to_string(), AttributeValue::S("USER#u1".into()));
        item.insert("SK".to_string(), AttributeValue::S("TEAM_MEMBER#m1".into()));
        item.insert("phone".to_string(), AttributeValue::S("555".into()));

        let row = item_to_row(&item);
        assert_eq!(row.len(), 1);
        assert_eq!(row["phone"], "555");
    }

    #[test]
    fn rows_sort_by_creation_time() {
        let mut rows: Vec<Row> = ["2025-01-02T00:00:00+00:00", "2025-01-01T00:00:00+00:00"]
            .iter()
            .map(|at| {
                let mut row = Row::new();
                row.insert(CREATED_AT.into(), json!(at));
                row
            })
            .collect();

        sort_rows(&mut rows, SortOrder::OldestFirst);
        assert_eq!(rows[0][CREATED_AT], "2025-01-01T00:00:00+00:00");
        sort_rows(&mut rows, SortOrder::NewestFirst);
        assert_eq!(rows[0][CREATED_AT], "2025-01-02T00:00:00+00:00");
    }
}
