pub mod frame;
pub mod history;
pub mod layout;

pub use frame::Frame;
pub use history::{History, HistoryError};
pub use layout::{Column, Layout, LayoutError, Occupant, Slot};
