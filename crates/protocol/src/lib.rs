pub mod constants;
pub mod entity;
pub mod history_doc;
pub mod types;

pub use entity::VisibleEntity;
pub use history_doc::{HistoryDoc, PointRecord};
pub use types::{GeoPoint, Rotation};
