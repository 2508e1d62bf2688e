use crate::core::progression::{ProgressionStore, StoreError, UserProgress};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// One user's entry in the JSON file. The user id is the map key.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct StoredProgress {
    #[serde(default)]
    level: u32,
    #[serde(default)]
    xp: u64,
    #[serde(default, alias = "totalXp")]
    total_xp: u64,
}

impl StoredProgress {
    fn into_progress(self, user_id: u64) -> UserProgress {
        UserProgress {
            user_id,
            level: self.level,
            xp: self.xp,
            total_xp: self.total_xp,
        }
    }
}

impl From<&UserProgress> for StoredProgress {
    fn from(progress: &UserProgress) -> Self {
        Self {
            level: progress.level,
            xp: progress.xp,
            total_xp: progress.total_xp,
        }
    }
}

/// JSON-backed progression store. Everything lives in a single object:
/// `{ "<user_id>": { "level": 0, "xp": 0, "total_xp": 0 } }`
///
/// The whole file is rewritten on every change while the write lock is
/// held, so writers never interleave.
pub struct JsonProgressStore {
    path: PathBuf,
    cache: RwLock<HashMap<u64, StoredProgress>>,
}

impl JsonProgressStore {
    /// Open (or start) the store at `path`.
    ///
    /// An unreadable or corrupt file is treated as empty: prior progression
    /// is lost and the file is replaced on the next write. This is logged.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let cache = match load_snapshot(&path) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Progression file unreadable; starting with empty progression data"
                );
                HashMap::new()
            }
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    fn persist(&self, records: &HashMap<u64, StoredProgress>) -> Result<(), StoreError> {
        // Write next to the target and swap it in, so a crash mid-write
        // leaves the previous file intact.
        let tmp_path = self.path.with_extension("json.tmp");
        let file = std::fs::File::create(&tmp_path)?;
        serde_json::to_writer_pretty(file, records)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

fn load_snapshot(path: &Path) -> Result<HashMap<u64, StoredProgress>, StoreError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| StoreError::Unavailable(format!("cannot read {}: {e}", path.display())))?;
    if raw.trim().is_empty() {
        return Ok(HashMap::new());
    }

    serde_json::from_str(&raw)
        .map_err(|e| StoreError::Unavailable(format!("corrupt {}: {e}", path.display())))
}

#[async_trait]
impl ProgressionStore for JsonProgressStore {
    async fn get(&self, user_id: u64) -> Result<UserProgress, StoreError> {
        {
            let cache = self.cache.read().await;
            if let Some(stored) = cache.get(&user_id) {
                return Ok(stored.into_progress(user_id));
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have created it while we waited for the lock.
        if let Some(stored) = cache.get(&user_id) {
            return Ok(stored.into_progress(user_id));
        }

        let fresh = UserProgress::new(user_id);
        cache.insert(user_id, StoredProgress::from(&fresh));
        if let Err(err) = self.persist(&cache) {
            cache.remove(&user_id);
            return Err(err);
        }
        Ok(fresh)
    }

    async fn set(&self, user_id: u64, progress: &UserProgress) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        let previous = cache.insert(user_id, StoredProgress::from(progress));
        if let Err(err) = self.persist(&cache) {
            // Keep memory in line with what is on disk.
            match previous {
                Some(previous) => cache.insert(user_id, previous),
                None => cache.remove(&user_id),
            };
            return Err(err);
        }
        Ok(())
    }
}
