use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::service;
use crate::fields::{FieldSpec, FieldValues, FormDraft};
use crate::record::{Record, RecordId, SummaryLine};
use crate::row::{display_date, Row, RowError, Table};

/// Product shipped to a celebrity. Tracks a delivered flag instead of a
/// status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDelivery {
    pub id: RecordId,
    pub product_name: String,
    pub celebrity_name: String,
    pub delivery_date: NaiveDate,
    pub delivered: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDeliveryDraft {
    pub product_name: String,
    pub celebrity_name: String,
    pub delivery_date: NaiveDate,
    pub delivered: bool,
    pub notes: String,
}

impl FormDraft for ProductDeliveryDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text(service::PRODUCT_NAME, "Product Name"),
        FieldSpec::text(service::CELEBRITY_NAME, "Celebrity Name"),
        FieldSpec::date(service::DELIVERY_DATE, "Delivery Date"),
        FieldSpec::flag(service::DELIVERED, "Delivered"),
        FieldSpec::long_text(service::NOTES, "Notes"),
    ];

    fn to_values(&self) -> FieldValues {
        FieldValues::new()
            .with_text(service::PRODUCT_NAME, self.product_name.clone())
            .with_text(service::CELEBRITY_NAME, self.celebrity_name.clone())
            .with_date(service::DELIVERY_DATE, self.delivery_date)
            .with_flag(service::DELIVERED, self.delivered)
            .with_text(service::NOTES, self.notes.clone())
    }

    fn from_values(values: &FieldValues) -> Option<Self> {
        Some(Self {
            product_name: values.text(service::PRODUCT_NAME).to_string(),
            celebrity_name: values.text(service::CELEBRITY_NAME).to_string(),
            delivery_date: values.date(service::DELIVERY_DATE)?,
            delivered: values.flag(service::DELIVERED),
            notes: values.text(service::NOTES).to_string(),
        })
    }
}

impl Record for ProductDelivery {
    type Draft = ProductDeliveryDraft;

    const TABLE: Table = Table::ProductDeliveries;
    const LABEL: &'static str = "Product delivery";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: RecordId, draft: ProductDeliveryDraft) -> Self {
        Self {
            id,
            product_name: draft.product_name,
            celebrity_name: draft.celebrity_name,
            delivery_date: draft.delivery_date,
            delivered: draft.delivered,
            notes: draft.notes,
        }
    }

    fn to_draft(&self) -> ProductDeliveryDraft {
        ProductDeliveryDraft {
            product_name: self.product_name.clone(),
            celebrity_name: self.celebrity_name.clone(),
            delivery_date: self.delivery_date,
            delivered: self.delivered,
            notes: self.notes.clone(),
        }
    }

    fn status(&self) -> Option<&'static str> {
        None
    }

    fn delivered(&self) -> Option<bool> {
        Some(self.delivered)
    }

    fn is_checked(&self) -> bool {
        self.delivered
    }

    fn toggled(&self) -> Self {
        Self {
            delivered: !self.delivered,
            ..self.clone()
        }
    }

    fn toggle_patch(&self) -> Row {
        service::delivered_patch(!self.delivered)
    }

    fn search_values(&self) -> Vec<String> {
        let mut values = vec![
            self.id.clone(),
            self.product_name.clone(),
            self.celebrity_name.clone(),
            self.delivery_date.to_string(),
        ];
        // A false flag has no text form.
        if self.delivered {
            values.push("true".to_string());
        }
        values.push(self.notes.clone());
        values.retain(|v| !v.is_empty());
        values
    }

    fn summary(&self) -> Vec<SummaryLine> {
        let mut lines = vec![
            SummaryLine::Heading(self.product_name.clone()),
            SummaryLine::Detail(format!("To: {}", self.celebrity_name)),
            SummaryLine::Caption(format!("Delivery: {}", display_date(self.delivery_date))),
        ];
        if !self.notes.is_empty() {
            lines.push(SummaryLine::Caption(format!("Notes: {}", self.notes)));
        }
        lines
    }

    fn from_row(row: &Row) -> Result<Self, RowError> {
        service::product_delivery_from_row(row)
    }

    fn draft_row(draft: &ProductDeliveryDraft) -> Row {
        service::product_delivery_row(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery(delivered: bool) -> ProductDelivery {
        ProductDelivery {
            id: "d1".into(),
            product_name: "Serum".into(),
            celebrity_name: "Ada".into(),
            delivery_date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            delivered,
            notes: String::new(),
        }
    }

    #[test]
    fn toggle_negates_flag() {
        let pending = delivery(false);
        assert!(pending.toggled().delivered);
        assert_eq!(pending.toggled().toggled(), pending);
    }

    #[test]
    fn no_status_badge() {
        assert_eq!(delivery(true).status(), None);
        assert_eq!(delivery(true).delivered(), Some(true));
    }

    #[test]
    fn flag_text_only_when_set() {
        assert!(delivery(true).search_values().contains(&"true".to_string()));
        assert!(!delivery(false).search_values().iter().any(|v| v == "false"));
    }

    #[test]
    fn notes_line_only_when_present() {
        assert_eq!(delivery(false).summary().len(), 3);
        let mut noted = delivery(false);
        noted.notes = "fragile".into();
        assert_eq!(
            noted.summary().last(),
            Some(&SummaryLine::Caption("Notes: fragile".into()))
        );
    }
}
