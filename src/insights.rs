use serde::{Deserialize, Serialize};

use crate::types::{AdaptationEvent, LearningStyle, MotivationLevel, PerformanceRecord};

/// Read-only learner summary for analytics consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerInsights {
    pub learner_id: String,
    pub overall_accuracy: f64,
    pub current_difficulty: i32,
    pub learning_style: LearningStyle,
    pub motivation: MotivationLevel,
    pub mastered_topics: Vec<String>,
    pub struggling_topics: Vec<String>,
    pub recent_adaptations: Vec<AdaptationEvent>,
    pub recommendations: Vec<String>,
}

/// Builds the summary from a record snapshot. Topic lists are sorted so the
/// output is stable; adaptations are the newest `recent` entries, newest last.
pub fn summarize(record: &PerformanceRecord, recent: usize) -> LearnerInsights {
    let mut mastered: Vec<String> = record.mastered_topics.iter().cloned().collect();
    mastered.sort();
    let mut struggling: Vec<String> = record.struggling_topics.iter().cloned().collect();
    struggling.sort();

    let skip = record.adaptation_history.len().saturating_sub(recent);
    let recent_adaptations = record.adaptation_history[skip..].to_vec();

    LearnerInsights {
        learner_id: record.learner_id.clone(),
        overall_accuracy: record.cumulative_accuracy(),
        current_difficulty: record.current_difficulty,
        learning_style: record.preferred_style,
        motivation: record.motivation,
        recommendations: recommendations(record),
        mastered_topics: mastered,
        struggling_topics: struggling,
        recent_adaptations,
    }
}

/// Fixed textual recommendations from simple thresholds.
fn recommendations(record: &PerformanceRecord) -> Vec<String> {
    let mut out = Vec::new();

    if record.struggling_topics.len() > 3 {
        out.push(
            "Several topics need reinforcement; narrow the focus to one or two before moving on."
                .to_string(),
        );
    }
    if record.cumulative_accuracy() > 0.9 {
        out.push(
            "Accuracy is consistently high; consider raising the challenge level.".to_string(),
        );
    }
    if record.last_session_minutes > record.attention_span_minutes * 1.5 {
        out.push(
            "Sessions are running well past the attention span; plan shorter, more frequent sessions."
                .to_string(),
        );
    }

    out
}
