use super::progression_models::UserProgress;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(String),
    /// The backing medium could not be read. Stores recover from this at
    /// startup by starting empty; it only escapes when recovery also fails.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence port for progression records, keyed by user id.
///
/// A `get` followed by a `set` for the same user is not atomic. Two messages
/// from one user racing each other can lose one award; XP is cheap enough
/// that this is accepted rather than locked around.
#[async_trait]
pub trait ProgressionStore: Send + Sync {
    /// Return the stored record, creating and persisting the zero record
    /// the first time a user is seen.
    async fn get(&self, user_id: u64) -> Result<UserProgress, StoreError>;

    /// Overwrite the whole record for `user_id`.
    async fn set(&self, user_id: u64, progress: &UserProgress) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: ProgressionStore + ?Sized> ProgressionStore for Box<T> {
    async fn get(&self, user_id: u64) -> Result<UserProgress, StoreError> {
        (**self).get(user_id).await
    }

    async fn set(&self, user_id: u64, progress: &UserProgress) -> Result<(), StoreError> {
        (**self).set(user_id, progress).await
    }
}
