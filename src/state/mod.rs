// State management module.
// Holds the dashboard's view state between refresh messages and key presses.

pub mod stats;

pub use stats::{LoadingState, StatsViewState};
