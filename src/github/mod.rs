// GitHub API module.
// Client and response types for the repository summary and contributor reads.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::GitHubClient;
pub use types::*;
