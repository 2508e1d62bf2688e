use crate::core::progression::{ProgressionStore, StoreError, UserProgress};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::path::{Path, PathBuf};

/// SQLite-backed progression store: one row per user in `levels`.
pub struct SqliteProgressStore {
    pool: Pool<Sqlite>,
}

impl SqliteProgressStore {
    /// Open the database at `path`, creating it if needed.
    ///
    /// If the file exists but is not a usable database it is renamed to
    /// `<path>.corrupt` and a fresh database takes its place. Prior
    /// progression is lost; the move is logged so it can be inspected.
    pub async fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        match Self::connect(path).await {
            Ok(store) => Ok(store),
            Err(err) if path.exists() => {
                let aside = corrupt_path(path);
                tracing::warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    error = %err,
                    "Progression database unreadable; starting with an empty one"
                );
                std::fs::rename(path, &aside)?;
                Self::connect(path).await
            }
            Err(err) => Err(err),
        }
    }

    async fn connect(path: &Path) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        // One connection keeps writes strictly one at a time.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        store.check_integrity().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS levels (
                user_id INTEGER PRIMARY KEY,
                level INTEGER NOT NULL DEFAULT 0,
                xp INTEGER NOT NULL DEFAULT 0,
                total_xp INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn check_integrity(&self) -> anyhow::Result<()> {
        let row = sqlx::query("PRAGMA quick_check")
            .fetch_one(&self.pool)
            .await?;
        let verdict: String = row.get(0);
        if verdict != "ok" {
            anyhow::bail!("integrity check failed: {verdict}");
        }
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

fn row_to_progress(user_id: u64, row: &sqlx::sqlite::SqliteRow) -> UserProgress {
    UserProgress {
        user_id,
        level: row.get::<i64, _>("level") as u32,
        xp: row.get::<i64, _>("xp") as u64,
        total_xp: row.get::<i64, _>("total_xp") as u64,
    }
}

#[async_trait]
impl ProgressionStore for SqliteProgressStore {
    async fn get(&self, user_id: u64) -> Result<UserProgress, StoreError> {
        // Insert-if-absent first, so repeated gets never create duplicates
        // and never hand back an unsaved default.
        sqlx::query(
            r#"
            INSERT INTO levels (user_id, level, xp, total_xp)
            VALUES (?, 0, 0, 0)
            ON CONFLICT(user_id) DO NOTHING
            "#,
        )
        .bind(user_id as i64)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let row = sqlx::query("SELECT level, xp, total_xp FROM levels WHERE user_id = ?")
            .bind(user_id as i64)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row_to_progress(user_id, &row))
    }

    async fn set(&self, user_id: u64, progress: &UserProgress) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO levels (user_id, level, xp, total_xp)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                level = excluded.level,
                xp = excluded.xp,
                total_xp = excluded.total_xp
            "#,
        )
        .bind(user_id as i64)
        .bind(i64::from(progress.level))
        .bind(progress.xp as i64)
        .bind(progress.total_xp as i64)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("levels.db");

        let progress = UserProgress {
            user_id: 123,
            level: 4,
            xp: 12,
            total_xp: 824,
        };
        {
            let store = SqliteProgressStore::new(&path).await.unwrap();
            store.set(123, &progress).await.unwrap();
            store.pool.close().await;
        }

        let reopened = SqliteProgressStore::new(&path).await.unwrap();
        assert_eq!(reopened.get(123).await.unwrap(), progress);
    }

    #[tokio::test]
    async fn repeated_get_creates_one_row() {
        let dir = TempDir::new().unwrap();
        let store = SqliteProgressStore::new(dir.path().join("levels.db"))
            .await
            .unwrap();

        let first = store.get(77).await.unwrap();
        let second = store.get(77).await.unwrap();
        assert_eq!(first, UserProgress::new(77));
        assert_eq!(first, second);

        let count: i64 = sqlx::query("SELECT COUNT(*) FROM levels")
            .fetch_one(&store.pool)
            .await
            .unwrap()
            .get(0);
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn set_overwrites_the_whole_record() {
        let dir = TempDir::new().unwrap();
        let store = SqliteProgressStore::new(dir.path().join("levels.db"))
            .await
            .unwrap();

        store.get(9).await.unwrap();
        let updated = UserProgress {
            user_id: 9,
            level: 1,
            xp: 3,
            total_xp: 103,
        };
        store.set(9, &updated).await.unwrap();
        assert_eq!(store.get(9).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn corrupt_database_is_moved_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("levels.db");
        std::fs::write(&path, "definitely not sqlite ".repeat(256)).unwrap();

        let store = SqliteProgressStore::new(&path).await.unwrap();
        assert_eq!(store.get(1).await.unwrap(), UserProgress::new(1));
        assert!(corrupt_path(&path).exists());
    }
}
