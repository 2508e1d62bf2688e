// Implementations of the progression store port.

pub mod in_memory;
pub mod json_store;
pub mod sqlite_store;

// Re-export for convenience
pub use in_memory::InMemoryProgressStore;
pub use json_store::JsonProgressStore;
pub use sqlite_store::SqliteProgressStore;
