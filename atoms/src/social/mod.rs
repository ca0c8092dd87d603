pub mod model;
pub mod service;

pub use model::{PostStatus, SocialMediaCheck, SocialMediaCheckDraft, PLATFORMS};
pub use service::*;
