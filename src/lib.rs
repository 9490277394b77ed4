// starboard: GitHub repository stats with a freshness/cooldown cache.
// The binary is a thin shell over these modules; integration tests use them directly.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod docs;
pub mod error;
pub mod format;
pub mod github;
pub mod refresh;
pub mod state;
pub mod stats;
pub mod ui;
