use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::types::{
    ActionTag, AdaptationTrigger, EnergyLevel, LearningStyle, PerformanceRecord, SessionContext,
};

/// Data-driven rule condition. One tagged variant per predicate kind, so the
/// rule table stays serializable and the evaluator is a single interpreter
/// rather than a bag of closures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RuleCondition {
    /// Elapsed session minutes exceed the learner's attention span.
    SessionOverAttentionSpan,
    /// Cumulative accuracy strictly below the threshold.
    AccuracyBelow { threshold: f64 },
    /// Cumulative accuracy strictly above `accuracy` while difficulty is
    /// strictly below `difficulty`.
    AccuracyAboveWithDifficultyBelow { accuracy: f64, difficulty: i32 },
    /// Help requests this session strictly above the limit.
    HelpRequestsAbove { limit: u32 },
    /// Preferred style matches and the session has seen more than
    /// `min_questions` questions.
    StyleWithMinQuestions {
        style: LearningStyle,
        min_questions: u32,
    },
    /// Preferred style matches unconditionally.
    StyleIs { style: LearningStyle },
    /// Self-reported low energy, or the local hour falls in a configured
    /// general low-energy window.
    LowEnergyWindow,
}

impl RuleCondition {
    pub fn matches(
        &self,
        record: &PerformanceRecord,
        context: &SessionContext,
        config: &EngineConfig,
    ) -> bool {
        match self {
            Self::SessionOverAttentionSpan => {
                context.elapsed_minutes > record.attention_span_minutes
            }
            Self::AccuracyBelow { threshold } => record.cumulative_accuracy() < *threshold,
            Self::AccuracyAboveWithDifficultyBelow {
                accuracy,
                difficulty,
            } => {
                record.cumulative_accuracy() > *accuracy && record.current_difficulty < *difficulty
            }
            Self::HelpRequestsAbove { limit } => context.help_requests > *limit,
            Self::StyleWithMinQuestions {
                style,
                min_questions,
            } => record.preferred_style == *style && context.questions_asked > *min_questions,
            Self::StyleIs { style } => record.preferred_style == *style,
            Self::LowEnergyWindow => {
                context.energy == EnergyLevel::Low
                    || config.in_low_energy_window(context.hour_of_day)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationRule {
    pub condition: RuleCondition,
    pub action: ActionTag,
    pub priority: u8,
}

/// A matched rule, pending application by the state mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adaptation {
    pub action: ActionTag,
    pub trigger: AdaptationTrigger,
    pub priority: u8,
}

/// Prioritized rule table. Evaluation walks rules in descending priority;
/// ties keep declaration order (stable sort).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<AdaptationRule>,
}

impl RuleSet {
    pub fn new(mut rules: Vec<AdaptationRule>) -> Self {
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { rules }
    }

    /// The built-in rule table.
    pub fn standard(config: &EngineConfig) -> Self {
        let t = &config.thresholds;
        Self::new(vec![
            AdaptationRule {
                condition: RuleCondition::SessionOverAttentionSpan,
                action: ActionTag::SuggestBreak,
                priority: 10,
            },
            AdaptationRule {
                condition: RuleCondition::AccuracyBelow {
                    threshold: t.low_accuracy,
                },
                action: ActionTag::DecreaseDifficulty,
                priority: 9,
            },
            AdaptationRule {
                condition: RuleCondition::HelpRequestsAbove {
                    limit: t.help_request_limit,
                },
                action: ActionTag::ProvideEncouragement,
                priority: 8,
            },
            AdaptationRule {
                condition: RuleCondition::AccuracyAboveWithDifficultyBelow {
                    accuracy: t.high_accuracy,
                    difficulty: t.max_difficulty_for_increase,
                },
                action: ActionTag::IncreaseDifficulty,
                priority: 7,
            },
            AdaptationRule {
                condition: RuleCondition::StyleWithMinQuestions {
                    style: LearningStyle::Visual,
                    min_questions: t.visual_min_questions,
                },
                action: ActionTag::AddVisualElements,
                priority: 6,
            },
            AdaptationRule {
                condition: RuleCondition::StyleIs {
                    style: LearningStyle::Kinesthetic,
                },
                action: ActionTag::SuggestHandsOn,
                priority: 6,
            },
            AdaptationRule {
                condition: RuleCondition::LowEnergyWindow,
                action: ActionTag::SimplifyContent,
                priority: 5,
            },
        ])
    }

    pub fn rules(&self) -> &[AdaptationRule] {
        &self.rules
    }

    /// Evaluates the table against a state snapshot. Pure: the same
    /// (record, context) pair always yields the same output.
    ///
    /// Matched rules at or above the dominant priority stop evaluation, so a
    /// turn carries at most one dominant adaptation. Sub-dominant matches are
    /// additive.
    pub fn select(
        &self,
        record: &PerformanceRecord,
        context: &SessionContext,
        config: &EngineConfig,
    ) -> Vec<Adaptation> {
        let trigger = classify_trigger(record, context, config);
        let mut selected = Vec::new();

        for rule in &self.rules {
            if !rule.condition.matches(record, context, config) {
                continue;
            }
            selected.push(Adaptation {
                action: rule.action,
                trigger,
                priority: rule.priority,
            });
            if rule.priority >= config.thresholds.dominant_priority {
                tracing::debug!(
                    action = rule.action.as_str(),
                    priority = rule.priority,
                    "dominant rule fired, stopping evaluation"
                );
                break;
            }
        }

        selected
    }
}

/// Post-hoc trigger classification from the same snapshot the rules saw.
/// Checked in fixed order; independent of which rule actually fired.
pub fn classify_trigger(
    record: &PerformanceRecord,
    context: &SessionContext,
    config: &EngineConfig,
) -> AdaptationTrigger {
    let accuracy = record.cumulative_accuracy();
    if accuracy < config.thresholds.low_accuracy {
        AdaptationTrigger::PoorPerformance
    } else if accuracy > config.thresholds.high_accuracy {
        AdaptationTrigger::ExcellentPerformance
    } else if context.elapsed_minutes > record.attention_span_minutes {
        AdaptationTrigger::TimeBased
    } else if context.help_requests > config.thresholds.help_request_limit {
        AdaptationTrigger::EngagementDrop
    } else {
        AdaptationTrigger::TopicMastery
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (EngineConfig, RuleSet, PerformanceRecord, SessionContext) {
        let config = EngineConfig::default();
        let rules = RuleSet::standard(&config);
        let record = PerformanceRecord::new("learner_1");
        let mut context = SessionContext::new("fractions");
        // Keep wall-clock out of the low-energy window for deterministic tests.
        context.hour_of_day = 10;
        (config, rules, record, context)
    }

    #[test]
    fn sorted_descending_with_stable_ties() {
        let (_config, rules, _, _) = setup();
        let priorities: Vec<u8> = rules.rules().iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![10, 9, 8, 7, 6, 6, 5]);
        // The two priority-6 rules keep declaration order: visual before
        // kinesthetic.
        assert_eq!(rules.rules()[4].action, ActionTag::AddVisualElements);
        assert_eq!(rules.rules()[5].action, ActionTag::SuggestHandsOn);
    }

    #[test]
    fn fresh_record_fires_no_accuracy_rule() {
        let (config, rules, record, context) = setup();
        // 0/0 reads as neutral 0.5: neither below 0.4 nor above 0.8.
        let selected = rules.select(&record, &context, &config);
        assert!(selected.is_empty());
    }

    #[test]
    fn selector_is_pure_on_repeat() {
        let (config, rules, record, context) = setup();
        for _ in 0..5 {
            assert!(rules.select(&record, &context, &config).is_empty());
        }
    }

    #[test]
    fn low_accuracy_fires_decrease() {
        let (config, rules, mut record, context) = setup();
        record.total_questions = 10;
        record.total_correct = 2;

        let selected = rules.select(&record, &context, &config);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].action, ActionTag::DecreaseDifficulty);
        assert_eq!(selected[0].trigger, AdaptationTrigger::PoorPerformance);
    }

    #[test]
    fn dominant_rule_shadows_lower_priorities() {
        let (config, rules, mut record, mut context) = setup();
        // Accuracy 0.9 at difficulty 5 would fire increase_difficulty (7),
        // but >3 help requests fires provide_encouragement (8) first.
        record.total_questions = 10;
        record.total_correct = 9;
        context.help_requests = 5;

        let selected = rules.select(&record, &context, &config);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].action, ActionTag::ProvideEncouragement);
    }

    #[test]
    fn break_outranks_every_other_rule() {
        let (config, rules, mut record, mut context) = setup();
        record.total_questions = 10;
        record.total_correct = 2;
        context.elapsed_minutes = 25.0;
        context.help_requests = 5;

        let selected = rules.select(&record, &context, &config);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].action, ActionTag::SuggestBreak);
        // Classification still reads poor_performance off the snapshot.
        assert_eq!(selected[0].trigger, AdaptationTrigger::PoorPerformance);
    }

    #[test]
    fn sub_dominant_rules_are_additive() {
        let (config, rules, mut record, mut context) = setup();
        record.preferred_style = LearningStyle::Visual;
        context.questions_asked = 4;
        context.energy = EnergyLevel::Low;

        let selected = rules.select(&record, &context, &config);
        let actions: Vec<ActionTag> = selected.iter().map(|a| a.action).collect();
        assert_eq!(
            actions,
            vec![ActionTag::AddVisualElements, ActionTag::SimplifyContent]
        );
    }

    #[test]
    fn increase_requires_headroom() {
        let (config, rules, mut record, context) = setup();
        record.total_questions = 10;
        record.total_correct = 9;
        record.current_difficulty = 8;

        let selected = rules.select(&record, &context, &config);
        assert!(selected
            .iter()
            .all(|a| a.action != ActionTag::IncreaseDifficulty));

        record.current_difficulty = 7;
        let selected = rules.select(&record, &context, &config);
        assert_eq!(selected[0].action, ActionTag::IncreaseDifficulty);
        assert_eq!(selected[0].trigger, AdaptationTrigger::ExcellentPerformance);
    }

    #[test]
    fn kinesthetic_style_fires_without_question_minimum() {
        let (config, rules, mut record, context) = setup();
        record.preferred_style = LearningStyle::Kinesthetic;

        let selected = rules.select(&record, &context, &config);
        assert_eq!(selected[0].action, ActionTag::SuggestHandsOn);
    }

    #[test]
    fn low_energy_window_matches_hour_or_self_report() {
        let (config, rules, record, mut context) = setup();
        context.hour_of_day = 14;
        let selected = rules.select(&record, &context, &config);
        assert_eq!(selected[0].action, ActionTag::SimplifyContent);

        context.hour_of_day = 10;
        context.energy = EnergyLevel::Low;
        let selected = rules.select(&record, &context, &config);
        assert_eq!(selected[0].action, ActionTag::SimplifyContent);
    }

    #[test]
    fn trigger_classification_order() {
        let (config, _, mut record, mut context) = setup();

        record.total_questions = 10;
        record.total_correct = 2;
        context.elapsed_minutes = 30.0;
        assert_eq!(
            classify_trigger(&record, &context, &config),
            AdaptationTrigger::PoorPerformance
        );

        record.total_correct = 9;
        assert_eq!(
            classify_trigger(&record, &context, &config),
            AdaptationTrigger::ExcellentPerformance
        );

        record.total_correct = 6;
        assert_eq!(
            classify_trigger(&record, &context, &config),
            AdaptationTrigger::TimeBased
        );

        context.elapsed_minutes = 5.0;
        context.help_requests = 4;
        assert_eq!(
            classify_trigger(&record, &context, &config),
            AdaptationTrigger::EngagementDrop
        );

        context.help_requests = 0;
        assert_eq!(
            classify_trigger(&record, &context, &config),
            AdaptationTrigger::TopicMastery
        );
    }

    #[test]
    fn rule_table_round_trips_through_json() {
        let (_config, rules, _, _) = setup();
        let json = serde_json::to_string(&rules).unwrap();
        let restored: RuleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.rules(), rules.rules());
    }
}
