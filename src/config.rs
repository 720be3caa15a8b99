use serde::{Deserialize, Serialize};

use crate::types::{LearningStyle, MotivationLevel};

/// Defaults stamped onto a record at first contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDefaults {
    pub difficulty: i32,
    pub motivation: MotivationLevel,
    pub attention_span_minutes: f64,
    pub style: LearningStyle,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            difficulty: 5,
            motivation: MotivationLevel::Medium,
            attention_span_minutes: 20.0,
            style: LearningStyle::Mixed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleThresholds {
    /// Below this cumulative accuracy the learner is considered struggling.
    pub low_accuracy: f64,
    /// Above this cumulative accuracy the learner is considered excelling.
    pub high_accuracy: f64,
    /// Help requests per session beyond this count signal an engagement drop.
    pub help_request_limit: u32,
    /// Difficulty must be below this for the increase rule to fire.
    pub max_difficulty_for_increase: i32,
    /// Session question count beyond which visual learners get visual aids.
    pub visual_min_questions: u32,
    /// Matched rules at or above this priority are dominant: evaluation stops
    /// after the first one.
    pub dominant_priority: u8,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            low_accuracy: 0.4,
            high_accuracy: 0.8,
            help_request_limit: 3,
            max_difficulty_for_increase: 8,
            visual_min_questions: 3,
            dominant_priority: 8,
        }
    }
}

/// Inclusive local-hour range in which content is simplified by default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourWindow {
    pub start: u8,
    pub end: u8,
}

impl HourWindow {
    pub fn contains(&self, hour: u8) -> bool {
        hour >= self.start && hour <= self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Retention cap for the per-learner audit trail; oldest entries are
    /// dropped past this. The trail is otherwise append-only.
    pub max_events: usize,
    /// Default number of audit entries surfaced by the insights summary.
    pub insight_recent_events: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_events: 256,
            insight_recent_events: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerConfig {
    /// Session minutes past which the interactive style kicks in.
    pub interactive_session_minutes: f64,
    pub max_follow_ups: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            interactive_session_minutes: 15.0,
            max_follow_ups: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub defaults: RecordDefaults,
    pub thresholds: RuleThresholds,
    pub history: HistoryConfig,
    pub composer: ComposerConfig,
    #[serde(default = "default_low_energy_windows")]
    pub low_energy_windows: Vec<HourWindow>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            defaults: RecordDefaults::default(),
            thresholds: RuleThresholds::default(),
            history: HistoryConfig::default(),
            composer: ComposerConfig::default(),
            low_energy_windows: default_low_energy_windows(),
        }
    }
}

fn default_low_energy_windows() -> Vec<HourWindow> {
    vec![
        HourWindow { start: 13, end: 15 },
        HourWindow { start: 21, end: 23 },
    ]
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TUTOR_HISTORY_MAX_EVENTS") {
            if let Ok(parsed) = val.parse() {
                config.history.max_events = parsed;
            }
        }
        if let Ok(val) = std::env::var("TUTOR_DOMINANT_PRIORITY") {
            if let Ok(parsed) = val.parse() {
                config.thresholds.dominant_priority = parsed;
            }
        }
        if let Ok(val) = std::env::var("TUTOR_DEFAULT_ATTENTION_SPAN_MINUTES") {
            if let Ok(parsed) = val.parse() {
                config.defaults.attention_span_minutes = parsed;
            }
        }

        config
    }

    pub fn in_low_energy_window(&self, hour: u8) -> bool {
        self.low_energy_windows.iter().any(|w| w.contains(hour))
    }
}
