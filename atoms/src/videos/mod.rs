pub mod model;
pub mod service;

pub use model::{VideoStatus, VideoTask, VideoTaskDraft};
pub use service::*;
