//! Controller layer: UI actions, load-state transitions, and load orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;

pub use events::{failure_message, Action};
pub use orchestration::LoadCoordinator;
pub use reducer::{LoadState, ViewState};
