// The progression service ties the pure engine to a store.
//
// Flow for a chat message:
// 1. store.get(user)    (lazily creates the zero record)
// 2. engine.award_xp    (pure)
// 3. store.set(user)    (write errors propagate; losing XP silently is worse)
// 4. build one notice per crossed level for the frontend to deliver

use super::progression_engine::{render_progress_bar, ProgressionEngine, PROGRESS_BAR_WIDTH};
use super::progression_models::{
    MessageOutcome, ProgressReport, ProgressionError, UserProgress, XpAward,
};
use super::progression_store::ProgressionStore;
use rand::Rng;
use std::ops::RangeInclusive;

pub const DEFAULT_XP_PER_MESSAGE: RangeInclusive<u64> = 3..=8;

pub struct ProgressionService<S: ProgressionStore> {
    store: S,
    engine: ProgressionEngine,
    /// Inclusive range a message award is rolled from.
    xp_per_message: RangeInclusive<u64>,
}

impl<S: ProgressionStore> ProgressionService<S> {
    /// Default curve and the default 3..=8 XP roll.
    #[cfg(test)]
    pub fn new(store: S) -> Self {
        Self {
            store,
            engine: ProgressionEngine::default(),
            xp_per_message: DEFAULT_XP_PER_MESSAGE,
        }
    }

    pub fn with_settings(
        store: S,
        engine: ProgressionEngine,
        xp_per_message: RangeInclusive<u64>,
    ) -> Result<Self, ProgressionError> {
        let (min, max) = (*xp_per_message.start(), *xp_per_message.end());
        if min == 0 || min > max {
            return Err(ProgressionError::InvalidXpRange { min, max });
        }
        Ok(Self {
            store,
            engine,
            xp_per_message,
        })
    }

    /// Award a random message roll to the author of a chat message.
    pub async fn process_message(&self, user_id: u64) -> Result<MessageOutcome, ProgressionError> {
        let amount = rand::thread_rng().gen_range(self.xp_per_message.clone());
        let award = self.award_xp(user_id, amount).await?;

        let notices = award
            .levels_crossed
            .iter()
            .map(|level| self.engine.level_up_notice(user_id, *level))
            .collect();

        Ok(MessageOutcome { award, notices })
    }

    /// Award a fixed amount of XP and persist the result.
    pub async fn award_xp(&self, user_id: u64, amount: u64) -> Result<XpAward, ProgressionError> {
        let current = self.store.get(user_id).await?;
        let award = self.engine.award_xp(current, amount);
        self.store.set(user_id, &award.progress).await?;
        Ok(award)
    }

    pub async fn get_progress(&self, user_id: u64) -> Result<ProgressReport, ProgressionError> {
        let progress = self.store.get(user_id).await?;
        let xp_needed = self.engine.xp_required_for(progress.level);

        Ok(ProgressReport {
            user_id,
            level: progress.level,
            xp: progress.xp,
            xp_needed,
            total_xp: progress.total_xp,
            progress_bar: render_progress_bar(progress.xp, xp_needed, PROGRESS_BAR_WIDTH),
        })
    }

    pub async fn grant_levels(
        &self,
        user_id: u64,
        delta: u32,
    ) -> Result<UserProgress, ProgressionError> {
        self.change_level(user_id, i64::from(delta), delta).await
    }

    /// Refuses (rather than clamping to 0) when the user has fewer levels
    /// than `delta`.
    pub async fn revoke_levels(
        &self,
        user_id: u64,
        delta: u32,
    ) -> Result<UserProgress, ProgressionError> {
        self.change_level(user_id, -i64::from(delta), delta).await
    }

    async fn change_level(
        &self,
        user_id: u64,
        signed_delta: i64,
        delta: u32,
    ) -> Result<UserProgress, ProgressionError> {
        if delta == 0 {
            return Err(ProgressionError::InvalidDelta);
        }

        let current = self.store.get(user_id).await?;
        // Validation happens before the write, so a rejection leaves the record alone.
        let updated = self.engine.adjust_level(current, signed_delta)?;
        self.store.set(user_id, &updated).await?;

        tracing::info!(
            user_id,
            old_level = current.level,
            new_level = updated.level,
            "Level adjusted by admin"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progression::StoreError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        records: Mutex<HashMap<u64, UserProgress>>,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl ProgressionStore for MapStore {
        async fn get(&self, user_id: u64) -> Result<UserProgress, StoreError> {
            let mut records = self.records.lock().await;
            Ok(*records
                .entry(user_id)
                .or_insert_with(|| UserProgress::new(user_id)))
        }

        async fn set(&self, user_id: u64, progress: &UserProgress) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.records.lock().await.insert(user_id, *progress);
            Ok(())
        }
    }

    struct BrokenWrites;

    #[async_trait]
    impl ProgressionStore for BrokenWrites {
        async fn get(&self, user_id: u64) -> Result<UserProgress, StoreError> {
            Ok(UserProgress::new(user_id))
        }

        async fn set(&self, _: u64, _: &UserProgress) -> Result<(), StoreError> {
            Err(StoreError::Database("disk full".to_string()))
        }
    }

    async fn seeded(user_id: u64, progress: UserProgress) -> ProgressionService<MapStore> {
        let store = MapStore::default();
        store.set(user_id, &progress).await.unwrap();
        store.writes.store(0, Ordering::SeqCst);
        ProgressionService::new(store)
    }

    #[tokio::test]
    async fn message_award_is_persisted_within_range() {
        let service = ProgressionService::new(MapStore::default());
        let outcome = service.process_message(9).await.unwrap();

        assert!((3..=8).contains(&outcome.award.amount));
        let stored = service.store.get(9).await.unwrap();
        assert_eq!(stored.total_xp, outcome.award.amount);
        assert_eq!(stored.xp, outcome.award.amount);
        assert!(outcome.notices.is_empty());
    }

    #[tokio::test]
    async fn message_award_produces_notice_per_level() {
        let service = seeded(
            5,
            UserProgress {
                user_id: 5,
                level: 0,
                xp: 99,
                total_xp: 99,
            },
        )
        .await;

        let outcome = service.process_message(5).await.unwrap();
        assert_eq!(outcome.award.levels_crossed, vec![1]);
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].level, 1);
    }

    #[tokio::test]
    async fn total_xp_only_grows_through_messages() {
        let service = ProgressionService::new(MapStore::default());
        let mut last = 0;
        for _ in 0..50 {
            let outcome = service.process_message(1).await.unwrap();
            assert!(outcome.award.progress.total_xp > last);
            last = outcome.award.progress.total_xp;
        }
    }

    #[tokio::test]
    async fn report_includes_bar_and_threshold() {
        let service = seeded(
            3,
            UserProgress {
                user_id: 3,
                level: 1,
                xp: 75,
                total_xp: 175,
            },
        )
        .await;

        let report = service.get_progress(3).await.unwrap();
        assert_eq!(report.level, 1);
        assert_eq!(report.xp_needed, 150);
        assert_eq!(report.total_xp, 175);
        assert_eq!(report.progress_bar.chars().filter(|c| *c == '█').count(), 10);
    }

    #[tokio::test]
    async fn get_progress_creates_unknown_users() {
        let service = ProgressionService::new(MapStore::default());
        let report = service.get_progress(404).await.unwrap();
        assert_eq!(report.level, 0);
        assert_eq!(report.xp_needed, 100);
        assert_eq!(service.store.records.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn grant_levels_recomputes_totals() {
        let service = ProgressionService::new(MapStore::default());
        let updated = service.grant_levels(8, 2).await.unwrap();
        assert_eq!(updated.level, 2);
        assert_eq!(updated.xp, 0);
        assert_eq!(updated.total_xp, 250);
    }

    #[tokio::test]
    async fn revoking_too_many_levels_changes_nothing() {
        let original = UserProgress {
            user_id: 4,
            level: 2,
            xp: 30,
            total_xp: 280,
        };
        let service = seeded(4, original).await;

        let result = service.revoke_levels(4, 3).await;
        assert!(matches!(result, Err(ProgressionError::InvalidLevel { .. })));
        assert_eq!(service.store.get(4).await.unwrap(), original);
        assert_eq!(service.store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_delta_is_rejected() {
        let service = ProgressionService::new(MapStore::default());
        assert!(matches!(
            service.grant_levels(1, 0).await,
            Err(ProgressionError::InvalidDelta)
        ));
    }

    #[tokio::test]
    async fn write_failures_propagate() {
        let service = ProgressionService::new(BrokenWrites);
        let err = service.award_xp(1, 5).await.unwrap_err();
        assert!(matches!(err, ProgressionError::Store(_)));
    }

    #[test]
    fn bad_xp_ranges_are_rejected() {
        let engine = ProgressionEngine::default();
        assert!(ProgressionService::with_settings(MapStore::default(), engine, 0..=5).is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 9..=2;
        assert!(ProgressionService::with_settings(MapStore::default(), engine, reversed).is_err());
        assert!(ProgressionService::with_settings(MapStore::default(), engine, 4..=4).is_ok());
    }
}
