// In-memory progression store.
//
// Nothing is written to disk, so progress is gone after a restart. Handy for
// local runs (`PROGRESSION_BACKEND=memory`) and for tests.

use crate::core::progression::{ProgressionStore, StoreError, UserProgress};
use async_trait::async_trait;
use dashmap::DashMap;

/// **DashMap:** a concurrent map, so simultaneous events don't need a
/// global lock. Per-key updates go through `entry()` and are atomic.
pub struct InMemoryProgressStore {
    data: DashMap<u64, UserProgress>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl Default for InMemoryProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressionStore for InMemoryProgressStore {
    async fn get(&self, user_id: u64) -> Result<UserProgress, StoreError> {
        let entry = self
            .data
            .entry(user_id)
            .or_insert_with(|| UserProgress::new(user_id));
        Ok(*entry)
    }

    async fn set(&self, user_id: u64, progress: &UserProgress) -> Result<(), StoreError> {
        self.data.insert(user_id, *progress);
        Ok(())
    }
}
