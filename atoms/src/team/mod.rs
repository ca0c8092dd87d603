pub mod model;
pub mod service;

pub use model::{RosterColumn, TeamMember, TeamMemberField, TARGET_VIDEO_THRESHOLD};
pub use service::*;
