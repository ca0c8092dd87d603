pub mod model;
pub mod service;

pub use model::{CelebritySchedule, CelebrityScheduleDraft, CelebrityStatus};
pub use service::*;
