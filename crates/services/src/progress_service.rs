use std::sync::Arc;

use tracing::info;

use quiz_core::model::{ProgressRecord, ProgressStats, QuizId};

use crate::local_state::LocalStateStore;

/// History of completed attempts, most recent first.
#[derive(Clone)]
pub struct ProgressStore {
    state: Arc<LocalStateStore>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(state: Arc<LocalStateStore>) -> Self {
        Self { state }
    }

    /// Prepend `record` and persist. Visible to `list` immediately, even if
    /// the write fails.
    pub async fn record(&self, record: ProgressRecord) {
        self.state
            .update(|s| s.quiz_progress.insert(0, record))
            .await;
    }

    #[must_use]
    pub fn list(&self) -> Vec<ProgressRecord> {
        self.state.read(|s| s.quiz_progress.clone())
    }

    pub async fn clear(&self) {
        let removed = self
            .state
            .update(|s| std::mem::take(&mut s.quiz_progress).len())
            .await;
        info!(removed, "quiz progress cleared");
    }

    #[must_use]
    pub fn latest_for_quiz(&self, quiz_id: &QuizId) -> Option<ProgressRecord> {
        self.state.read(|s| {
            s.quiz_progress
                .iter()
                .find(|r| &r.quiz_id == quiz_id)
                .cloned()
        })
    }

    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        self.state
            .read(|s| ProgressStats::from_records(&s.quiz_progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::time::fixed_now;
    use std::collections::BTreeMap;
    use storage::repository::{InMemoryRepository, KeyValueStore, StorageError};

    fn record(quiz: &str, score: u32, total: u32) -> ProgressRecord {
        ProgressRecord {
            quiz_id: QuizId::new(quiz).unwrap(),
            score,
            total_questions: total,
            completed_at: fixed_now(),
            answers: BTreeMap::new(),
        }
    }

    struct FailingKv;

    #[async_trait]
    impl KeyValueStore for FailingKv {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn records_are_most_recent_first() {
        let kv = Arc::new(InMemoryRepository::new());
        let store = ProgressStore::new(Arc::new(LocalStateStore::load(kv).await));
        store.record(record("a", 1, 2)).await;
        store.record(record("b", 2, 2)).await;
        let ids: Vec<_> = store.list().iter().map(|r| r.quiz_id.to_string()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn survives_reload_through_same_kv() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryRepository::new());
        let store = ProgressStore::new(Arc::new(LocalStateStore::load(kv.clone()).await));
        store.record(record("a", 3, 4)).await;

        let reloaded = ProgressStore::new(Arc::new(LocalStateStore::load(kv).await));
        assert_eq!(reloaded.list(), store.list());
    }

    #[tokio::test]
    async fn failing_store_keeps_records_in_memory() {
        let store = ProgressStore::new(Arc::new(LocalStateStore::load(Arc::new(FailingKv)).await));
        store.record(record("a", 1, 1)).await;
        assert_eq!(store.list().len(), 1);
        store.clear().await;
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn latest_and_stats() {
        let kv = Arc::new(InMemoryRepository::new());
        let store = ProgressStore::new(Arc::new(LocalStateStore::load(kv).await));
        assert_eq!(store.stats(), ProgressStats::default());

        store.record(record("a", 1, 2)).await;
        store.record(record("b", 4, 4)).await;
        store.record(record("a", 2, 2)).await;

        let latest = store.latest_for_quiz(&QuizId::new("a").unwrap()).unwrap();
        assert_eq!(latest.score, 2);
        assert!(store.latest_for_quiz(&QuizId::new("zzz").unwrap()).is_none());

        let stats = store.stats();
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.perfect_scores, 2);
        // (1 + 4 + 2) / 3 = 2.33
        assert_eq!(stats.average_score, 2);
        // (50 + 100 + 100) / 3 = 83.3
        assert_eq!(stats.average_percentage, 83);
    }
}
