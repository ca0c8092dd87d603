//! Task dashboard: four record kinds behind one filter, each with a create
//! form and an editable list, persisted through a [`RecordStore`].
//!
//! [`RecordStore`]: crewdesk_atoms::RecordStore

pub mod controller;
pub mod filter;
pub mod form;
pub mod list;
pub mod state;

pub use controller::{Dashboard, DashboardError, Overview, Phase};
pub use filter::{
    filter_records, matches_search, FilterParams, StatusFilter, STATUS_FILTER_OPTIONS,
};
pub use form::{EntityForm, FieldError, FormMode};
pub use list::{Badge, BadgeTone, ListAction, ListRow, RecordList};
pub use state::{DashboardState, Pane, Slot};
