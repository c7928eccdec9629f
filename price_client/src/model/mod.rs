//! View model published to the render boundary.
//!
//! - `display`: `DisplayModel` and the per-panel states it carries.
pub mod display;

pub use display::{DisplayModel, HistoryPanel, SnapshotState};
