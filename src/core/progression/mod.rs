// The progression feature: levels and XP earned by chatting.
// Nothing in here knows about Discord. Ids are plain u64s.

pub mod progression_engine;
pub mod progression_models;
pub mod progression_service;
pub mod progression_store;

pub use progression_engine::{ProgressionCurve, ProgressionEngine};
pub use progression_models::{LevelUpNotice, ProgressionError, UserProgress};
pub use progression_service::ProgressionService;
pub use progression_store::{ProgressionStore, StoreError};
