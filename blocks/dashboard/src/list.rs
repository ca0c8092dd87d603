use crewdesk_atoms::{Record, RecordId, SummaryLine};
use serde::Serialize;

use crate::form::EntityForm;

/// Colour family of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeTone {
    Pending,
    InProgress,
    Completed,
    Muted,
}

impl BadgeTone {
    pub fn for_status(status: &str) -> Self {
        match status {
            "pending" | "not-posted" => BadgeTone::Pending,
            "in-progress" | "scheduled" => BadgeTone::InProgress,
            "completed" | "posted" => BadgeTone::Completed,
            _ => BadgeTone::Muted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

/// Render model for one list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: RecordId,
    pub checked: bool,
    pub badge: Option<Badge>,
    pub fields: Vec<SummaryLine>,
    /// This row's edit form is open.
    pub editing: bool,
}

/// What a list asks its owner to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction<R> {
    Toggle(RecordId),
    Update(R),
    Delete(RecordId),
}

/// List of records of one kind with at most one open edit form.
#[derive(Debug)]
pub struct RecordList<R: Record> {
    editing: Option<(RecordId, EntityForm<R::Draft>)>,
}

impl<R: Record> Default for RecordList<R> {
    fn default() -> Self {
        Self { editing: None }
    }
}

impl<R: Record> RecordList<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// One row per record, in the given order.
    pub fn rows<F>(&self, records: &[&R], render: F) -> Vec<ListRow>
    where
        F: Fn(&R) -> Vec<SummaryLine>,
    {
        records
            .iter()
            .map(|&record| ListRow {
                id: record.id().to_string(),
                checked: record.is_checked(),
                badge: record.status().map(|label| Badge {
                    label,
                    tone: BadgeTone::for_status(label),
                }),
                fields: render(record),
                editing: self.editing_id() == Some(record.id()),
            })
            .collect()
    }

    pub fn toggle(&self, record: &R) -> ListAction<R> {
        ListAction::Toggle(record.id().to_string())
    }

    pub fn delete(&self, record: &R) -> ListAction<R> {
        ListAction::Delete(record.id().to_string())
    }

    /// Opens the edit form for `record`, closing any other open form.
    pub fn open_edit(&mut self, record: &R) {
        if let Some((open, _)) = &self.editing {
            tracing::debug!(closed = %open, opened = %record.id(), "switching edit form");
        }
        self.editing = Some((record.id().to_string(), EntityForm::editing(&record.to_draft())));
    }

    pub fn close_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn edit_form(&self) -> Option<&EntityForm<R::Draft>> {
        self.editing.as_ref().map(|(_, form)| form)
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EntityForm<R::Draft>> {
        self.editing.as_mut().map(|(_, form)| form)
    }

    /// Submits the open edit form. A valid form becomes an update carrying
    /// the original identifier and the form closes; an invalid one stays
    /// open and nothing is emitted.
    pub fn submit_edit(&mut self) -> Option<ListAction<R>> {
        let (id, form) = self.editing.as_mut()?;
        let draft = form.submit()?;
        let updated = R::from_draft(id.clone(), draft);
        self.editing = None;
        Some(ListAction::Update(updated))
    }

    /// Drops edit state for records that no longer exist.
    pub fn forget(&mut self, id: &str) {
        if self.editing_id() == Some(id) {
            self.editing = None;
        }
    }
}
