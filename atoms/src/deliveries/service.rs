use serde_json::Value;

use super::model::{ProductDelivery, ProductDeliveryDraft};
use crate::row::{self, Row, RowError};

pub const PRODUCT_NAME: &str = "product_name";
pub const CELEBRITY_NAME: &str = "celebrity_name";
pub const DELIVERY_DATE: &str = "delivery_date";
pub const DELIVERED: &str = "delivered";
pub const NOTES: &str = "notes";

pub fn product_delivery_from_row(row: &Row) -> Result<ProductDelivery, RowError> {
    Ok(ProductDelivery {
        id: row::text(row, row::ID)?,
        product_name: row::text(row, PRODUCT_NAME)?,
        celebrity_name: row::text(row, CELEBRITY_NAME)?,
        delivery_date: row::date(row, DELIVERY_DATE)?,
        delivered: row::flag(row, DELIVERED),
        notes: row::optional_text(row, NOTES),
    })
}

pub fn product_delivery_row(draft: &ProductDeliveryDraft) -> Row {
    let mut row = Row::new();
    row.insert(PRODUCT_NAME.into(), Value::String(draft.product_name.clone()));
    row.insert(CELEBRITY_NAME.into(), Value::String(draft.celebrity_name.clone()));
    row.insert(DELIVERY_DATE.into(), row::date_value(draft.delivery_date));
    row.insert(DELIVERED.into(), Value::Bool(draft.delivered));
    row.insert(NOTES.into(), Value::String(draft.notes.clone()));
    row
}

pub fn delivered_patch(delivered: bool) -> Row {
    let mut row = Row::new();
    row.insert(DELIVERED.into(), Value::Bool(delivered));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_flag_reads_as_undelivered() {
        let row = json!({
            "id": "d1",
            "product_name": "Serum",
            "celebrity_name": "Ada",
            "delivery_date": "2025-03-04"
        });
        let delivery = product_delivery_from_row(row.as_object().unwrap()).unwrap();
        assert!(!delivery.delivered);
        assert_eq!(delivery.notes, "");
    }

    #[test]
    fn patch_carries_only_the_flag() {
        let patch = delivered_patch(true);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch[DELIVERED], json!(true));
    }
}
