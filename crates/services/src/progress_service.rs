use cbt_core::Clock;
use cbt_core::model::{AveragePolicy, ProgressRecord, ScoreResult};
use storage::{LocalRecords, StorageError};

/// Reads and folds attempts into the stored progress record.
#[derive(Clone)]
pub struct ProgressService {
    records: LocalRecords,
    clock: Clock,
    policy: AveragePolicy,
}

impl ProgressService {
    #[must_use]
    pub fn new(records: LocalRecords, clock: Clock, policy: AveragePolicy) -> Self {
        Self {
            records,
            clock,
            policy,
        }
    }

    /// Stored progress, or zeroed defaults when absent or unreadable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn load(&self) -> Result<ProgressRecord, StorageError> {
        Ok(self
            .records
            .progress()
            .await?
            .unwrap_or_else(|| ProgressRecord::zeroed(self.clock.now())))
    }

    /// Fold one submitted attempt into the stored record and persist it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or write failures.
    pub async fn record_attempt(&self, score: &ScoreResult) -> Result<ProgressRecord, StorageError> {
        let mut progress = self.load().await?;
        progress.record_attempt(score, self.clock.now(), self.policy);
        self.records.save_progress(&progress).await?;

        tracing::info!(
            tests_completed = progress.tests_completed,
            average_score = progress.average_score,
            "progress updated"
        );
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cbt_core::time::{fixed_clock, fixed_now};
    use storage::records::PROGRESS_KEY;
    use storage::{InMemoryStore, KeyValueStore};

    fn service(policy: AveragePolicy) -> (InMemoryStore, ProgressService) {
        let store = InMemoryStore::new();
        let records = LocalRecords::new(Arc::new(store.clone()));
        (store, ProgressService::new(records, fixed_clock(), policy))
    }

    fn score(percentage: u32, secs: u64) -> ScoreResult {
        ScoreResult {
            correct: 0,
            total: 5,
            percentage,
            time_spent_secs: secs,
        }
    }

    #[tokio::test]
    async fn load_defaults_when_absent() {
        let (_, progress) = service(AveragePolicy::Blend);
        let record = progress.load().await.unwrap();
        assert_eq!(record, ProgressRecord::zeroed(fixed_now()));
    }

    #[tokio::test]
    async fn corrupt_record_is_replaced_on_attempt() {
        let (store, progress) = service(AveragePolicy::Blend);
        store.set(PROGRESS_KEY, "not json").await.unwrap();

        let record = progress.record_attempt(&score(80, 95)).await.unwrap();
        assert_eq!(record.tests_completed, 1);
        assert_eq!(record.average_score, 80);
        assert_eq!(record.study_time, 95);
        assert_eq!(progress.load().await.unwrap(), record);
    }

    #[tokio::test]
    async fn attempts_accumulate_under_policy() {
        let (_, blend) = service(AveragePolicy::Blend);
        let (_, mean) = service(AveragePolicy::CumulativeMean);
        for pct in [100, 50, 50] {
            blend.record_attempt(&score(pct, 60)).await.unwrap();
            mean.record_attempt(&score(pct, 60)).await.unwrap();
        }
        assert_eq!(blend.load().await.unwrap().average_score, 63);
        assert_eq!(mean.load().await.unwrap().average_score, 67);
        assert_eq!(mean.load().await.unwrap().study_time, 180);
    }
}
