// Cache module for local persistence.
// Stores the last-known-good stats entry so restarts keep the cooldown and the data.

pub mod paths;
pub mod store;

pub use store::{FileStore, MemoryStore};
