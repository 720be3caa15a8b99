use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    Reading,
    #[default]
    Mixed,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::Reading => "reading",
            Self::Mixed => "mixed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "visual" => Self::Visual,
            "auditory" => Self::Auditory,
            "kinesthetic" => Self::Kinesthetic,
            "reading" => Self::Reading,
            _ => Self::Mixed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum DifficultyMode {
    Fixed,
    #[default]
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum MotivationLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl MotivationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum EnergyLevel {
    High,
    #[default]
    Normal,
    Low,
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Normal,
        }
    }
}

/// Content ladder selector. Unknown subject strings degrade to `General`
/// rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum SubjectArea {
    Math,
    Science,
    Language,
    #[default]
    General,
}

impl SubjectArea {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "math" | "mathematics" => Self::Math,
            "science" => Self::Science,
            "language" | "language_arts" | "english" => Self::Language,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::Science => "science",
            Self::Language => "language",
            Self::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTag {
    SuggestBreak,
    DecreaseDifficulty,
    ProvideEncouragement,
    IncreaseDifficulty,
    AddVisualElements,
    SuggestHandsOn,
    SimplifyContent,
}

impl ActionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuggestBreak => "suggest_break",
            Self::DecreaseDifficulty => "decrease_difficulty",
            Self::ProvideEncouragement => "provide_encouragement",
            Self::IncreaseDifficulty => "increase_difficulty",
            Self::AddVisualElements => "add_visual_elements",
            Self::SuggestHandsOn => "suggest_hands_on",
            Self::SimplifyContent => "simplify_content",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum AdaptationTrigger {
    PoorPerformance,
    ExcellentPerformance,
    TimeBased,
    EngagementDrop,
    #[default]
    TopicMastery,
}

impl AdaptationTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PoorPerformance => "poor_performance",
            Self::ExcellentPerformance => "excellent_performance",
            Self::TimeBased => "time_based",
            Self::EngagementDrop => "engagement_drop",
            Self::TopicMastery => "topic_mastery",
        }
    }
}

/// Outward-facing tone of a composed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ResponseStyle {
    Encouraging,
    Challenging,
    #[default]
    Explanatory,
    Interactive,
    Visual,
}

impl ResponseStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encouraging => "encouraging",
            Self::Challenging => "challenging",
            Self::Explanatory => "explanatory",
            Self::Interactive => "interactive",
            Self::Visual => "visual",
        }
    }
}

/// The difficulty/motivation/style fields an adaptation can touch, captured
/// before and after each applied event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub difficulty: i32,
    pub motivation: MotivationLevel,
    pub style: LearningStyle,
}

/// Append-only audit entry. Immutable once written; `effectiveness` is
/// reserved for a later feedback mechanism and stays `None` here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationEvent {
    pub id: Uuid,
    pub timestamp: i64,
    pub trigger: AdaptationTrigger,
    pub action: ActionTag,
    pub previous: StateSnapshot,
    pub new: StateSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effectiveness: Option<u8>,
}

pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 10;

/// Per-learner performance record. Owned by the store; mutated only by the
/// state mutator and the outcome recorder, always under the per-learner lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub learner_id: String,
    pub grade_level: String,
    pub subject: String,
    pub total_questions: u32,
    pub total_correct: u32,
    pub average_response_time_ms: f64,
    pub last_session_minutes: f64,
    pub attention_span_minutes: f64,
    pub preferred_style: LearningStyle,
    pub difficulty_mode: DifficultyMode,
    pub mastered_topics: HashSet<String>,
    pub struggling_topics: HashSet<String>,
    pub current_difficulty: i32,
    pub motivation: MotivationLevel,
    pub adaptation_history: Vec<AdaptationEvent>,
    pub last_updated: i64,
}

impl PerformanceRecord {
    pub fn new(learner_id: impl Into<String>) -> Self {
        Self {
            learner_id: learner_id.into(),
            grade_level: String::new(),
            subject: String::new(),
            total_questions: 0,
            total_correct: 0,
            average_response_time_ms: 0.0,
            last_session_minutes: 0.0,
            attention_span_minutes: 20.0,
            preferred_style: LearningStyle::default(),
            difficulty_mode: DifficultyMode::default(),
            mastered_topics: HashSet::new(),
            struggling_topics: HashSet::new(),
            current_difficulty: 5,
            motivation: MotivationLevel::default(),
            adaptation_history: Vec::new(),
            last_updated: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Lifetime correct/total ratio. A learner with no answers yet reads as
    /// neutral 0.5 so neither the low- nor high-accuracy rules fire on first
    /// contact.
    pub fn cumulative_accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            0.5
        } else {
            self.total_correct as f64 / self.total_questions as f64
        }
    }

    /// Accuracy over the last `window` scores of a session. Kept as a named
    /// alternative to [`Self::cumulative_accuracy`]; the rule set deliberately
    /// uses the cumulative form.
    pub fn recent_accuracy(&self, recent_scores: &[f64], window: usize) -> f64 {
        if recent_scores.is_empty() || window == 0 {
            return self.cumulative_accuracy();
        }
        let tail = &recent_scores[recent_scores.len().saturating_sub(window)..];
        tail.iter().sum::<f64>() / tail.len() as f64
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            difficulty: self.current_difficulty,
            motivation: self.motivation,
            style: self.preferred_style,
        }
    }

    /// Moves `topic` into the mastered set, evicting it from struggling.
    /// The two sets stay disjoint at all times.
    pub fn mark_mastered(&mut self, topic: &str) {
        self.struggling_topics.remove(topic);
        self.mastered_topics.insert(topic.to_string());
    }

    /// Moves `topic` into the struggling set, evicting it from mastered.
    pub fn mark_struggling(&mut self, topic: &str) {
        self.mastered_topics.remove(topic);
        self.struggling_topics.insert(topic.to_string());
    }

    pub fn touch(&mut self) {
        self.last_updated = chrono::Utc::now().timestamp_millis();
    }
}

/// Ephemeral per-turn context supplied by the caller. Discarded after the
/// response is composed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub current_topic: String,
    pub prior_topics: Vec<String>,
    pub elapsed_minutes: f64,
    pub questions_asked: u32,
    /// Last-N answer correctness, 1.0 correct / 0.0 incorrect.
    pub recent_scores: Vec<f64>,
    pub help_requests: u32,
    pub energy: EnergyLevel,
    /// Local wall-clock hour, used by the low-energy-window rule.
    pub hour_of_day: u8,
}

impl SessionContext {
    pub fn new(current_topic: impl Into<String>) -> Self {
        use chrono::Timelike;
        Self {
            current_topic: current_topic.into(),
            prior_topics: Vec::new(),
            elapsed_minutes: 0.0,
            questions_asked: 0,
            recent_scores: Vec::new(),
            help_requests: 0,
            energy: EnergyLevel::default(),
            hour_of_day: chrono::Local::now().hour() as u8,
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new("")
    }
}

/// Fully composed turn output. Always populated; there is no error path out
/// of composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveResponse {
    pub content: String,
    pub difficulty: i32,
    pub style: ResponseStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_topic: Option<String>,
    pub adaptation_reason: String,
    pub follow_up_questions: Vec<String>,
    pub estimated_time_seconds: f64,
    pub support_materials: Vec<String>,
}
