use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::config::RecordDefaults;
use crate::types::PerformanceRecord;

/// Shared handle to one learner's record. Holding the mutex across a whole
/// turn serializes mutation per learner; different learners never contend.
pub type RecordHandle = Arc<Mutex<PerformanceRecord>>;

/// Injectable record storage. The engine only ever talks to this trait, so a
/// host application can swap the in-memory store for a datastore-backed one.
pub trait PerformanceRepository: Send + Sync {
    /// Returns the existing handle or atomically creates a record with the
    /// configured defaults.
    fn get_or_create(&self, learner_id: &str) -> RecordHandle;

    /// Read-only lookup; never creates.
    fn get(&self, learner_id: &str) -> Option<RecordHandle>;

    /// Flush hook invoked after each completed turn. The in-memory store has
    /// nothing to do here; a persistent implementation would upsert.
    fn save(&self, record: &PerformanceRecord);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct InMemoryPerformanceStore {
    defaults: RecordDefaults,
    records: RwLock<HashMap<String, RecordHandle>>,
}

impl InMemoryPerformanceStore {
    pub fn new(defaults: RecordDefaults) -> Self {
        Self {
            defaults,
            records: RwLock::new(HashMap::new()),
        }
    }

    fn fresh_record(&self, learner_id: &str) -> PerformanceRecord {
        let mut record = PerformanceRecord::new(learner_id);
        record.current_difficulty = self.defaults.difficulty;
        record.motivation = self.defaults.motivation;
        record.attention_span_minutes = self.defaults.attention_span_minutes;
        record.preferred_style = self.defaults.style;
        record
    }
}

impl Default for InMemoryPerformanceStore {
    fn default() -> Self {
        Self::new(RecordDefaults::default())
    }
}

impl PerformanceRepository for InMemoryPerformanceStore {
    fn get_or_create(&self, learner_id: &str) -> RecordHandle {
        if let Some(handle) = self.records.read().get(learner_id) {
            return Arc::clone(handle);
        }

        let mut records = self.records.write();
        // Re-check under the write lock: two racing creators must converge
        // on the same record.
        if let Some(handle) = records.get(learner_id) {
            return Arc::clone(handle);
        }

        tracing::info!(learner_id, "creating performance record");
        let handle = Arc::new(Mutex::new(self.fresh_record(learner_id)));
        records.insert(learner_id.to_string(), Arc::clone(&handle));
        handle
    }

    fn get(&self, learner_id: &str) -> Option<RecordHandle> {
        self.records.read().get(learner_id).map(Arc::clone)
    }

    fn save(&self, _record: &PerformanceRecord) {
        // Mutation through the handle is the write.
    }

    fn len(&self) -> usize {
        self.records.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LearningStyle, MotivationLevel};

    #[tokio::test]
    async fn get_or_create_applies_defaults() {
        let store = InMemoryPerformanceStore::default();
        let handle = store.get_or_create("learner_1");
        let record = handle.lock().await;

        assert_eq!(record.learner_id, "learner_1");
        assert_eq!(record.current_difficulty, 5);
        assert_eq!(record.motivation, MotivationLevel::Medium);
        assert!((record.attention_span_minutes - 20.0).abs() < 1e-9);
        assert_eq!(record.preferred_style, LearningStyle::Mixed);
    }

    #[tokio::test]
    async fn repeated_calls_return_the_same_record() {
        let store = InMemoryPerformanceStore::default();
        let first = store.get_or_create("learner_1");
        first.lock().await.current_difficulty = 9;

        let second = store.get_or_create("learner_1");
        assert_eq!(second.lock().await.current_difficulty, 9);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn get_never_creates() {
        let store = InMemoryPerformanceStore::default();
        assert!(store.get("nobody").is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn concurrent_creation_converges_on_one_record() {
        let store = Arc::new(InMemoryPerformanceStore::default());

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.get_or_create("learner_race")
            }));
        }

        let mut handles = Vec::new();
        for task in tasks {
            handles.push(task.await.unwrap());
        }

        assert_eq!(store.len(), 1);
        for handle in &handles[1..] {
            assert!(Arc::ptr_eq(&handles[0], handle));
        }
    }

    #[tokio::test]
    async fn concurrent_counter_updates_are_not_lost() {
        let store = Arc::new(InMemoryPerformanceStore::default());
        store.get_or_create("learner_1");

        let mut tasks = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                let handle = store.get_or_create("learner_1");
                let mut record = handle.lock().await;
                record.total_questions += 1;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let handle = store.get("learner_1").unwrap();
        assert_eq!(handle.lock().await.total_questions, 50);
    }
}
