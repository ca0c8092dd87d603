use std::sync::Arc;

use crewdesk_atoms::store::{
    create_record, delete_record, load_records, toggle_record, update_record,
};
use crewdesk_atoms::{
    AuthError, AuthEvent, AuthProvider, CelebritySchedule, Loaded, Notice, Notices,
    ProductDelivery, RecordStore, Route, Session, SocialMediaCheck, SortOrder, StoreError, Table,
    VideoTask,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::filter::{filter_records, FilterParams, StatusFilter};
use crate::form::EntityForm;
use crate::list::{ListAction, ListRow};
use crate::state::{DashboardState, Pane, Slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Unauthenticated,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("dashboard has no loaded session")]
    NotReady,

    #[error("no {table} record with id {id}")]
    UnknownRecord { table: Table, id: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Unfiltered collection sizes for the page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub video_tasks: usize,
    pub celebrity_schedules: usize,
    pub product_deliveries: usize,
    pub social_media_checks: usize,
}

/// Session-scoped dashboard: the four collections, their lists and forms,
/// the shared filter, and pending notices.
///
/// Every write goes to the store first; local state changes only after the
/// store confirms.
pub struct Dashboard {
    store: Arc<dyn RecordStore>,
    auth: Arc<dyn AuthProvider>,
    phase: Phase,
    session: Option<Session>,
    state: DashboardState,
    filter: FilterParams,
    notices: Notices,
}

impl Dashboard {
    pub fn new(store: Arc<dyn RecordStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            store,
            auth,
            phase: Phase::Unauthenticated,
            session: None,
            state: DashboardState::default(),
            filter: FilterParams::default(),
            notices: Notices::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Resolves the current session and loads every collection for it.
    pub async fn start(&mut self) -> Route {
        let current = self.auth.current_session().await;
        match current {
            Ok(Some(session)) => {
                self.open_session(session).await;
                Route::Dashboard
            }
            Ok(None) => {
                info!("no session, routing to sign-in");
                self.teardown();
                Route::SignIn
            }
            Err(err) => {
                self.notices.error("Error", err.to_string());
                self.teardown();
                Route::SignIn
            }
        }
    }

    pub async fn handle_auth_event(&mut self, event: AuthEvent) -> Route {
        match event {
            AuthEvent::SignedIn(session) | AuthEvent::TokenRefreshed(session) => {
                let same_user = self
                    .session
                    .as_ref()
                    .is_some_and(|current| current.user_id == session.user_id);
                if same_user && self.phase == Phase::Ready {
                    self.session = Some(session);
                } else {
                    self.open_session(session).await;
                }
                Route::Dashboard
            }
            AuthEvent::SignedOut => {
                info!("session ended");
                self.teardown();
                Route::SignIn
            }
        }
    }

    async fn open_session(&mut self, session: Session) {
        info!(user_id = %session.user_id, "loading dashboard");
        self.state.clear();
        self.filter = FilterParams::default();
        self.session = Some(session);
        self.phase = Phase::Loading;
        self.load().await;
        self.phase = Phase::Ready;
    }

    async fn load(&mut self) {
        let Some(user_id) = self.session.as_ref().map(|s| s.user_id.clone()) else {
            return;
        };
        let store = Arc::clone(&self.store);
        let store = store.as_ref();
        let order = SortOrder::NewestFirst;
        let (videos, schedules, deliveries, checks) = tokio::join!(
            load_records::<VideoTask>(store, &user_id, order),
            load_records::<CelebritySchedule>(store, &user_id, order),
            load_records::<ProductDelivery>(store, &user_id, order),
            load_records::<SocialMediaCheck>(store, &user_id, order),
        );
        self.install(videos);
        self.install(schedules);
        self.install(deliveries);
        self.install(checks);
    }

    fn install<R: Slot>(&mut self, loaded: Result<Loaded<R>, StoreError>) {
        match loaded {
            Ok(loaded) => {
                info!(
                    table = %R::TABLE,
                    count = loaded.records.len(),
                    skipped = loaded.skipped.len(),
                    "collection loaded"
                );
                if let Some(summary) = loaded.skipped_summary(R::TABLE) {
                    self.notices
                        .error(format!("Some {} could not be read", R::TABLE), summary);
                }
                R::pane_mut(&mut self.state).records = loaded.records;
            }
            Err(err) => {
                self.notices
                    .error(format!("Failed to load {}", R::TABLE), err.to_string());
            }
        }
    }

    fn user_id(&self) -> Result<String, DashboardError> {
        match (&self.session, self.phase) {
            (Some(session), Phase::Ready) => Ok(session.user_id.clone()),
            _ => Err(DashboardError::NotReady),
        }
    }

    fn pane<R: Slot>(&self) -> &Pane<R> {
        R::pane(&self.state)
    }

    fn pane_mut<R: Slot>(&mut self) -> &mut Pane<R> {
        R::pane_mut(&mut self.state)
    }

    fn fail(&mut self, err: StoreError) -> DashboardError {
        self.notices.error("Error", err.to_string());
        DashboardError::Store(err)
    }

    fn unknown<R: Slot>(id: &str) -> DashboardError {
        DashboardError::UnknownRecord {
            table: R::TABLE,
            id: id.to_string(),
        }
    }

    /// Inserts a new record and appends it to its collection. A later load
    /// lists it first, since loads are newest first.
    pub async fn create<R: Slot>(&mut self, draft: R::Draft) -> Result<(), DashboardError> {
        let user_id = self.user_id()?;
        let store = Arc::clone(&self.store);
        let result = create_record::<R>(store.as_ref(), &user_id, &draft).await;
        match result {
            Ok(record) => {
                info!(table = %R::TABLE, id = %record.id(), "record created");
                self.pane_mut::<R>().records.push(record);
                self.notices.success(format!("{} added", R::LABEL));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Submits the create form of `R`. An incomplete form is left as it is
    /// and nothing is written.
    pub async fn submit_create<R: Slot>(&mut self) -> Result<(), DashboardError> {
        self.user_id()?;
        let Some(draft) = self.pane_mut::<R>().form.submit() else {
            return Ok(());
        };
        self.create::<R>(draft).await
    }

    pub async fn update<R: Slot>(&mut self, record: R) -> Result<(), DashboardError> {
        let user_id = self.user_id()?;
        if self.pane::<R>().find(record.id()).is_none() {
            return Err(Self::unknown::<R>(record.id()));
        }
        let store = Arc::clone(&self.store);
        let result = update_record(store.as_ref(), &user_id, &record).await;
        match result {
            Ok(()) => {
                info!(table = %R::TABLE, id = %record.id(), "record updated");
                self.pane_mut::<R>().replace(record);
                self.notices.success(format!("{} updated", R::LABEL));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// One click on a record's toggle.
    pub async fn toggle<R: Slot>(&mut self, id: &str) -> Result<(), DashboardError> {
        let user_id = self.user_id()?;
        let Some(current) = self.pane::<R>().find(id).cloned() else {
            return Err(Self::unknown::<R>(id));
        };
        let store = Arc::clone(&self.store);
        let result = toggle_record(store.as_ref(), &user_id, &current).await;
        match result {
            Ok(toggled) => {
                info!(table = %R::TABLE, id = %id, "record toggled");
                self.pane_mut::<R>().replace(toggled);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub async fn delete<R: Slot>(&mut self, id: &str) -> Result<(), DashboardError> {
        let user_id = self.user_id()?;
        if self.pane::<R>().find(id).is_none() {
            return Err(Self::unknown::<R>(id));
        }
        let store = Arc::clone(&self.store);
        let result = delete_record::<R>(store.as_ref(), &user_id, id).await;
        match result {
            Ok(()) => {
                info!(table = %R::TABLE, id = %id, "record deleted");
                self.pane_mut::<R>().remove(id);
                self.notices.success(format!("{} deleted", R::LABEL));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Carries out an action emitted by a record list.
    pub async fn apply<R: Slot>(&mut self, action: ListAction<R>) -> Result<(), DashboardError> {
        match action {
            ListAction::Toggle(id) => self.toggle::<R>(&id).await,
            ListAction::Update(record) => self.update(record).await,
            ListAction::Delete(id) => self.delete::<R>(&id).await,
        }
    }

    /// Opens the edit form for one record, closing any other open form of
    /// the same kind.
    pub fn open_edit<R: Slot>(&mut self, id: &str) -> Result<(), DashboardError> {
        let pane = self.pane_mut::<R>();
        let Some(record) = pane.records.iter().find(|r| r.id() == id) else {
            return Err(Self::unknown::<R>(id));
        };
        let record = record.clone();
        pane.list.open_edit(&record);
        Ok(())
    }

    pub fn close_edit<R: Slot>(&mut self) {
        self.pane_mut::<R>().list.close_edit();
    }

    /// Submits the open edit form of `R`, if any and if complete.
    pub async fn submit_edit<R: Slot>(&mut self) -> Result<(), DashboardError> {
        self.user_id()?;
        match self.pane_mut::<R>().list.submit_edit() {
            Some(action) => self.apply(action).await,
            None => Ok(()),
        }
    }

    pub fn create_form<R: Slot>(&self) -> &EntityForm<R::Draft> {
        &self.pane::<R>().form
    }

    pub fn create_form_mut<R: Slot>(&mut self) -> &mut EntityForm<R::Draft> {
        &mut self.pane_mut::<R>().form
    }

    pub fn edit_form_mut<R: Slot>(&mut self) -> Option<&mut EntityForm<R::Draft>> {
        self.pane_mut::<R>().list.edit_form_mut()
    }

    pub fn editing_id<R: Slot>(&self) -> Option<&str> {
        self.pane::<R>().list.editing_id()
    }

    pub fn filter(&self) -> &FilterParams {
        &self.filter
    }

    pub fn set_status_filter(&mut self, raw: &str) {
        self.filter.status = StatusFilter::parse(raw);
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search = text.into();
    }

    /// Unfiltered collection of `R`.
    pub fn records<R: Slot>(&self) -> &[R] {
        &self.pane::<R>().records
    }

    /// Records of `R` passing the current filter. Empty until ready.
    pub fn visible<R: Slot>(&self) -> Vec<&R> {
        if self.phase != Phase::Ready {
            return Vec::new();
        }
        filter_records(self.records::<R>(), &self.filter)
    }

    pub fn rows<R: Slot>(&self) -> Vec<ListRow> {
        self.pane::<R>().list.rows(&self.visible::<R>(), R::summary)
    }

    pub fn overview(&self) -> Overview {
        Overview {
            video_tasks: self.state.video_tasks.records.len(),
            celebrity_schedules: self.state.celebrity_schedules.records.len(),
            product_deliveries: self.state.product_deliveries.records.len(),
            social_media_checks: self.state.social_media_checks.records.len(),
        }
    }

    /// Ends the session with the provider and drops all session state.
    pub async fn sign_out(&mut self) -> Route {
        let result = self.auth.sign_out().await;
        if let Err(err) = result {
            warn!("sign-out failed at provider: {}", err);
            self.notices.error("Error", err.to_string());
        }
        self.teardown();
        Route::SignIn
    }

    fn teardown(&mut self) {
        if self.session.is_some() {
            info!("clearing dashboard state");
        }
        self.session = None;
        self.state.clear();
        self.filter = FilterParams::default();
        self.phase = Phase::Unauthenticated;
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("phase", &self.phase)
            .field("session", &self.session)
            .field("filter", &self.filter)
            .field("overview", &self.overview())
            .finish()
    }
}
