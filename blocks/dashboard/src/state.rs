use crewdesk_atoms::{CelebritySchedule, ProductDelivery, Record, SocialMediaCheck, VideoTask};

use crate::form::EntityForm;
use crate::list::RecordList;

/// Everything the dashboard holds for one record kind: the collection, its
/// list (with edit state) and its create form.
#[derive(Debug)]
pub struct Pane<R: Record> {
    pub records: Vec<R>,
    pub list: RecordList<R>,
    pub form: EntityForm<R::Draft>,
}

impl<R: Record> Default for Pane<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            list: RecordList::new(),
            form: EntityForm::new(),
        }
    }
}

impl<R: Record> Pane<R> {
    pub fn find(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn replace(&mut self, record: R) -> bool {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.records.retain(|r| r.id() != id);
        self.list.forget(id);
    }
}

/// The four task collections owned by the dashboard.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub video_tasks: Pane<VideoTask>,
    pub celebrity_schedules: Pane<CelebritySchedule>,
    pub product_deliveries: Pane<ProductDelivery>,
    pub social_media_checks: Pane<SocialMediaCheck>,
}

impl DashboardState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A record kind with a pane in [`DashboardState`].
pub trait Slot: Record {
    fn pane(state: &DashboardState) -> &Pane<Self>;
    fn pane_mut(state: &mut DashboardState) -> &mut Pane<Self>;
}

impl Slot for VideoTask {
    fn pane(state: &DashboardState) -> &Pane<Self> {
        &state.video_tasks
    }
    fn pane_mut(state: &mut DashboardState) -> &mut Pane<Self> {
        &mut state.video_tasks
    }
}

impl Slot for CelebritySchedule {
    fn pane(state: &DashboardState) -> &Pane<Self> {
        &state.celebrity_schedules
    }
    fn pane_mut(state: &mut DashboardState) -> &mut Pane<Self> {
        &mut state.celebrity_schedules
    }
}

impl Slot for ProductDelivery {
    fn pane(state: &DashboardState) -> &Pane<Self> {
        &state.product_deliveries
    }
    fn pane_mut(state: &mut DashboardState) -> &mut Pane<Self> {
        &mut state.product_deliveries
    }
}

impl Slot for SocialMediaCheck {
    fn pane(state: &DashboardState) -> &Pane<Self> {
        &state.social_media_checks
    }
    fn pane_mut(state: &mut DashboardState) -> &mut Pane<Self> {
        &mut state.social_media_checks
    }
}
