pub mod model;
pub mod service;

pub use model::{ProductDelivery, ProductDeliveryDraft};
pub use service::*;
