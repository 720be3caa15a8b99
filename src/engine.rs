use std::sync::Arc;

use crate::composer::ResponseComposer;
use crate::config::EngineConfig;
use crate::error::{validate_learner_id, EngineError};
use crate::insights::{self, LearnerInsights};
use crate::mutator::apply_adaptations;
use crate::rules::RuleSet;
use crate::store::{InMemoryPerformanceStore, PerformanceRepository};
use crate::types::{AdaptiveResponse, SessionContext};

/// Per-turn orchestrator: store → selector → mutator → composer, plus the
/// outcome recorder that closes the feedback loop. All work is in-memory and
/// CPU-bound; a turn never blocks on I/O and always runs to completion.
pub struct TutorEngine {
    config: EngineConfig,
    rules: RuleSet,
    composer: ResponseComposer,
    store: Arc<dyn PerformanceRepository>,
}

impl TutorEngine {
    pub fn new(config: EngineConfig, store: Arc<dyn PerformanceRepository>) -> Self {
        let rules = RuleSet::standard(&config);
        let composer = ResponseComposer::new(config.clone());
        Self {
            config,
            rules,
            composer,
            store,
        }
    }

    /// In-memory store, standard rule table.
    pub fn with_defaults() -> Self {
        let config = EngineConfig::default();
        let store = Arc::new(InMemoryPerformanceStore::new(config.defaults.clone()));
        Self::new(config, store)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn PerformanceRepository> {
        &self.store
    }

    /// Runs one tutoring turn. The per-learner lock is held from rule
    /// evaluation through composition, so concurrent turns for the same
    /// learner serialize while other learners proceed in parallel.
    pub async fn process_question(
        &self,
        learner_id: &str,
        question: &str,
        context: &SessionContext,
    ) -> Result<AdaptiveResponse, EngineError> {
        validate_learner_id(learner_id)?;

        let handle = self.store.get_or_create(learner_id);
        let mut record = handle.lock().await;

        let selected = self.rules.select(&record, context, &self.config);
        tracing::debug!(
            learner_id,
            topic = %context.current_topic,
            adaptations = selected.len(),
            "turn evaluated"
        );

        let applied = apply_adaptations(&mut record, context, &selected, &self.config);
        let response = self.composer.compose(&record, context, &applied, question);
        self.store.save(&record);

        Ok(response)
    }

    /// Closes the loop once the learner's answer has been graded. Creates the
    /// record with defaults if the learner has never been seen; never fails
    /// past id validation.
    pub async fn record_outcome(
        &self,
        learner_id: &str,
        topic: &str,
        is_correct: bool,
        response_time_ms: f64,
    ) -> Result<(), EngineError> {
        validate_learner_id(learner_id)?;

        let handle = self.store.get_or_create(learner_id);
        let mut record = handle.lock().await;

        record.total_questions += 1;
        if is_correct {
            record.total_correct += 1;
        }

        let n = record.total_questions as f64;
        record.average_response_time_ms =
            (record.average_response_time_ms * (n - 1.0) + response_time_ms) / n;

        if !topic.is_empty() {
            if is_correct {
                record.mark_mastered(topic);
            } else {
                record.mark_struggling(topic);
            }
        }

        record.touch();
        self.store.save(&record);

        tracing::debug!(
            learner_id,
            topic,
            is_correct,
            accuracy = record.cumulative_accuracy(),
            "outcome recorded"
        );
        Ok(())
    }

    /// Read-only summary for analytics consumers. Never creates a record.
    pub async fn learner_insights(
        &self,
        learner_id: &str,
    ) -> Result<LearnerInsights, EngineError> {
        validate_learner_id(learner_id)?;

        let handle = self
            .store
            .get(learner_id)
            .ok_or_else(|| EngineError::UnknownLearner(learner_id.to_string()))?;
        let record = handle.lock().await;
        Ok(insights::summarize(
            &record,
            self.config.history.insight_recent_events,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_learner_id_is_rejected_before_the_store() {
        let engine = TutorEngine::with_defaults();
        let context = SessionContext::new("fractions");

        let err = engine.process_question("", "q", &context).await.unwrap_err();
        assert_eq!(err, EngineError::EmptyLearnerId);
        assert!(engine.store().is_empty());

        let err = engine.record_outcome("  ", "fractions", true, 1000.0).await.unwrap_err();
        assert_eq!(err, EngineError::EmptyLearnerId);
        assert!(engine.store().is_empty());
    }

    #[tokio::test]
    async fn insights_for_unknown_learner_do_not_create() {
        let engine = TutorEngine::with_defaults();
        let err = engine.learner_insights("ghost").await.unwrap_err();
        assert_eq!(err, EngineError::UnknownLearner("ghost".to_string()));
        assert!(engine.store().is_empty());
    }

    #[tokio::test]
    async fn outcome_updates_running_average() {
        let engine = TutorEngine::with_defaults();
        engine.record_outcome("learner_1", "fractions", true, 1000.0).await.unwrap();
        engine.record_outcome("learner_1", "fractions", false, 3000.0).await.unwrap();

        let handle = engine.store().get("learner_1").unwrap();
        let record = handle.lock().await;
        assert_eq!(record.total_questions, 2);
        assert_eq!(record.total_correct, 1);
        assert!((record.average_response_time_ms - 2000.0).abs() < 1e-9);
    }
}
