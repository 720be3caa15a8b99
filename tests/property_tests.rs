//! Property tests for the state-mutation invariants: difficulty stays inside
//! [1,10] under any adaptation sequence, and a topic never sits in both the
//! mastered and struggling sets.

use proptest::prelude::*;

use adaptive_tutor::mutator::apply_adaptations;
use adaptive_tutor::rules::Adaptation;
use adaptive_tutor::{
    ActionTag, AdaptationTrigger, EngineConfig, PerformanceRecord, SessionContext,
    MAX_DIFFICULTY, MIN_DIFFICULTY,
};

fn action_strategy() -> impl Strategy<Value = ActionTag> {
    prop_oneof![
        Just(ActionTag::SuggestBreak),
        Just(ActionTag::DecreaseDifficulty),
        Just(ActionTag::ProvideEncouragement),
        Just(ActionTag::IncreaseDifficulty),
        Just(ActionTag::AddVisualElements),
        Just(ActionTag::SuggestHandsOn),
        Just(ActionTag::SimplifyContent),
    ]
}

proptest! {
    #[test]
    fn difficulty_never_leaves_bounds(
        start in MIN_DIFFICULTY..=MAX_DIFFICULTY,
        actions in prop::collection::vec(action_strategy(), 0..100),
    ) {
        let config = EngineConfig::default();
        let context = SessionContext::default();
        let mut record = PerformanceRecord::new("learner_pbt");
        record.current_difficulty = start;

        for action in actions {
            let adaptation = Adaptation {
                action,
                trigger: AdaptationTrigger::TopicMastery,
                priority: 5,
            };
            apply_adaptations(&mut record, &context, &[adaptation], &config);
            prop_assert!(record.current_difficulty >= MIN_DIFFICULTY);
            prop_assert!(record.current_difficulty <= MAX_DIFFICULTY);
            // Every snapshot written to the trail respects the bounds too.
            let event = record.adaptation_history.last().unwrap();
            prop_assert!(event.new.difficulty >= MIN_DIFFICULTY);
            prop_assert!(event.new.difficulty <= MAX_DIFFICULTY);
        }
    }

    #[test]
    fn history_never_exceeds_retention_cap(
        actions in prop::collection::vec(action_strategy(), 0..64),
    ) {
        let mut config = EngineConfig::default();
        config.history.max_events = 16;
        let context = SessionContext::default();
        let mut record = PerformanceRecord::new("learner_pbt");

        for action in actions {
            let adaptation = Adaptation {
                action,
                trigger: AdaptationTrigger::TopicMastery,
                priority: 5,
            };
            apply_adaptations(&mut record, &context, &[adaptation], &config);
            prop_assert!(record.adaptation_history.len() <= 16);
        }
    }

    #[test]
    fn topic_sets_stay_disjoint(
        outcomes in prop::collection::vec(("[a-e]", any::<bool>()), 0..80),
    ) {
        let mut record = PerformanceRecord::new("learner_pbt");

        for (topic, correct) in outcomes {
            if correct {
                record.mark_mastered(&topic);
            } else {
                record.mark_struggling(&topic);
            }
            let overlap: Vec<_> = record
                .mastered_topics
                .intersection(&record.struggling_topics)
                .collect();
            prop_assert!(overlap.is_empty(), "overlap: {:?}", overlap);
        }
    }
}
