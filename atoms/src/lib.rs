pub mod fields;
pub mod notice;
pub mod record;
pub mod row;
pub mod session;
pub mod store;

pub mod celebrities;
pub mod deliveries;
pub mod social;
pub mod team;
pub mod videos;

pub use fields::{FieldKind, FieldSpec, FieldValue, FieldValues, FormDraft};
pub use notice::{Notice, NoticeLevel, Notices};
pub use record::{Record, RecordId, SummaryLine};
pub use row::{Row, RowError, Table};
pub use session::{AuthError, AuthEvent, AuthProvider, LocalAuth, Route, Session};
pub use store::{Loaded, MemoryStore, RecordStore, SkippedRow, SortOrder, StoreError, StoreOp};

pub use celebrities::{CelebritySchedule, CelebrityScheduleDraft, CelebrityStatus};
pub use deliveries::{ProductDelivery, ProductDeliveryDraft};
pub use social::{PostStatus, SocialMediaCheck, SocialMediaCheckDraft, PLATFORMS};
pub use team::{RosterColumn, TeamMember, TeamMemberField, TARGET_VIDEO_THRESHOLD};
pub use videos::{VideoStatus, VideoTask, VideoTaskDraft};
