use uuid::Uuid;

use crate::config::EngineConfig;
use crate::rules::Adaptation;
use crate::types::{
    ActionTag, AdaptationEvent, MotivationLevel, PerformanceRecord, SessionContext,
    MAX_DIFFICULTY, MIN_DIFFICULTY,
};

/// Applies selected adaptations to a learner's record and appends one audit
/// entry per adaptation. Returns the applied action tags in order for the
/// response composer. The caller holds the per-learner lock for the whole
/// turn, so the record mutates atomically with respect to concurrent turns.
pub fn apply_adaptations(
    record: &mut PerformanceRecord,
    context: &SessionContext,
    adaptations: &[Adaptation],
    config: &EngineConfig,
) -> Vec<ActionTag> {
    let mut applied = Vec::with_capacity(adaptations.len());

    for adaptation in adaptations {
        let previous = record.snapshot();

        match adaptation.action {
            ActionTag::DecreaseDifficulty => {
                record.current_difficulty =
                    (record.current_difficulty - 1).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
            }
            ActionTag::IncreaseDifficulty => {
                record.current_difficulty =
                    (record.current_difficulty + 1).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
            }
            ActionTag::ProvideEncouragement => {
                record.motivation = MotivationLevel::High;
            }
            // Rendering hints only; no persistent field changes.
            ActionTag::SuggestBreak
            | ActionTag::AddVisualElements
            | ActionTag::SuggestHandsOn
            | ActionTag::SimplifyContent => {}
        }

        let event = AdaptationEvent {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            trigger: adaptation.trigger,
            action: adaptation.action,
            previous,
            new: record.snapshot(),
            effectiveness: None,
        };
        tracing::debug!(
            learner_id = %record.learner_id,
            action = event.action.as_str(),
            trigger = event.trigger.as_str(),
            difficulty = record.current_difficulty,
            "adaptation applied"
        );
        record.adaptation_history.push(event);
        applied.push(adaptation.action);
    }

    // Retention cap: keep the newest max_events, dropping from the front.
    let max = config.history.max_events;
    if record.adaptation_history.len() > max {
        let excess = record.adaptation_history.len() - max;
        record.adaptation_history.drain(..excess);
    }

    record.last_session_minutes = context.elapsed_minutes;
    record.touch();
    applied
}
