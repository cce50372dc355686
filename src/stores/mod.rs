//! Storage implementations.

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryStore, MemoryTextCache};
pub use sqlite::SqliteStore;
