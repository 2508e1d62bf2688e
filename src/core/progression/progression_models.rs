use super::progression_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// A user's progression snapshot.
///
/// `xp` is the progress inside the current level and is always below the
/// threshold for `level` once the engine has normalized it. `total_xp` is
/// lifetime XP and only grows through message awards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: u64,
    pub level: u32,
    pub xp: u64,
    pub total_xp: u64,
}

impl UserProgress {
    /// The record every user starts with.
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            level: 0,
            xp: 0,
            total_xp: 0,
        }
    }
}

/// Result of awarding XP: the new snapshot plus every level crossed on the
/// way, ascending, each reported once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpAward {
    pub progress: UserProgress,
    pub amount: u64,
    pub levels_crossed: Vec<u32>,
}

/// A level-up announcement ready to be delivered by whatever frontend
/// is in charge of sending messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpNotice {
    pub user_id: u64,
    pub level: u32,
    pub title: String,
    pub body: String,
}

/// What happened after a chat message was processed.
#[derive(Debug, Clone)]
pub struct MessageOutcome {
    pub award: XpAward,
    pub notices: Vec<LevelUpNotice>,
}

/// Read-only view used by the `level` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub user_id: u64,
    pub level: u32,
    pub xp: u64,
    pub xp_needed: u64,
    pub total_xp: u64,
    pub progress_bar: String,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ProgressionError {
    /// The requested level (or the level a delta would produce) is out of range.
    #[error("Level {requested} is not allowed; levels must be between 0 and {max}")]
    InvalidLevel { requested: i64, max: u32 },

    #[error("Level changes must be at least 1")]
    InvalidDelta,

    #[error("Invalid progression curve: {0}")]
    InvalidCurve(String),

    #[error("Invalid per-message XP range {min}..={max}")]
    InvalidXpRange { min: u64, max: u64 },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}
