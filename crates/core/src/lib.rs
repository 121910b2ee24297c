pub mod generate;
pub mod loader;
pub mod model;
pub mod playback;

pub use generate::{GenerateConfig, generate, generate_history};
pub use loader::{LoadError, load_history};
pub use model::{Column, Frame, History, HistoryError, Layout, LayoutError, Occupant, Slot};
pub use playback::{PlaybackController, Renderer, Speed, TimerRequest, TransportState};
