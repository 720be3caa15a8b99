use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::types::{
    ActionTag, AdaptiveResponse, LearningStyle, PerformanceRecord, ResponseStyle, SessionContext,
    SubjectArea,
};

/// Difficulty levels collapse into three bands for content, follow-up and
/// material selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    Foundational,
    Standard,
    Advanced,
}

impl DifficultyBand {
    pub fn from_level(level: i32) -> Self {
        match level {
            i32::MIN..=3 => Self::Foundational,
            4..=7 => Self::Standard,
            _ => Self::Advanced,
        }
    }
}

/// Appended verbatim when a break adaptation fired.
pub const BREAK_SUGGESTION: &str =
    "You've been working hard for a while now. How about a short break before we continue?";

/// Softer substitutions applied by simplify_content.
const SIMPLIFY_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("complex", "step-by-step"),
    ("advanced", "core"),
    ("challenging", "approachable"),
];

/// Builds the outward-facing response from the mutated record, the session
/// context and the adaptations applied this turn. Always succeeds; unknown
/// subjects fall back to the general content ladder.
pub struct ResponseComposer {
    config: EngineConfig,
}

impl ResponseComposer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn compose(
        &self,
        record: &PerformanceRecord,
        context: &SessionContext,
        applied: &[ActionTag],
        question: &str,
    ) -> AdaptiveResponse {
        let subject = SubjectArea::parse(&record.subject);
        let band = DifficultyBand::from_level(record.current_difficulty);
        let topic = if context.current_topic.is_empty() {
            question
        } else {
            context.current_topic.as_str()
        };

        let style = self.select_style(record, context, applied);
        let base = base_content(subject, band, topic);
        let content = self.rewrite(format!("{} {}", style_prefix(style), base), applied);

        let estimated_time_seconds =
            (content.len() as f64 / 10.0) * (record.current_difficulty as f64 / 5.0);

        AdaptiveResponse {
            difficulty: record.current_difficulty,
            style,
            next_topic: next_topic(record, context),
            adaptation_reason: adaptation_reason(applied),
            follow_up_questions: self.follow_ups(band, topic, context),
            estimated_time_seconds,
            support_materials: support_materials(record.preferred_style, band),
            content,
        }
    }

    /// Adaptation events map directly to a style; otherwise the style derives
    /// from accuracy and session length.
    fn select_style(
        &self,
        record: &PerformanceRecord,
        context: &SessionContext,
        applied: &[ActionTag],
    ) -> ResponseStyle {
        for action in applied {
            match action {
                ActionTag::ProvideEncouragement => return ResponseStyle::Encouraging,
                ActionTag::IncreaseDifficulty => return ResponseStyle::Challenging,
                ActionTag::AddVisualElements => return ResponseStyle::Visual,
                _ => {}
            }
        }

        let accuracy = record.cumulative_accuracy();
        if accuracy < self.config.thresholds.low_accuracy {
            ResponseStyle::Encouraging
        } else if accuracy > self.config.thresholds.high_accuracy {
            ResponseStyle::Challenging
        } else if context.elapsed_minutes > self.config.composer.interactive_session_minutes {
            ResponseStyle::Interactive
        } else {
            ResponseStyle::Explanatory
        }
    }

    /// Per-event content rewrites, applied in the order the events fired.
    fn rewrite(&self, mut content: String, applied: &[ActionTag]) -> String {
        for action in applied {
            match action {
                ActionTag::ProvideEncouragement => {
                    content = format!(
                        "You're doing great, keep it up! {} Remember, every attempt is progress.",
                        content
                    );
                }
                ActionTag::SuggestBreak => {
                    content = format!("{}\n\n{}", content, BREAK_SUGGESTION);
                }
                ActionTag::SimplifyContent => {
                    for (from, to) in SIMPLIFY_SUBSTITUTIONS {
                        content = content.replace(from, to);
                    }
                }
                ActionTag::AddVisualElements => {
                    content = format!(
                        "{}\n\nTry sketching a diagram of this as you go; seeing it often makes it click.",
                        content
                    );
                }
                ActionTag::SuggestHandsOn => {
                    content = format!(
                        "{}\n\nGrab something you can move around and act this out; it sticks better that way.",
                        content
                    );
                }
                ActionTag::DecreaseDifficulty | ActionTag::IncreaseDifficulty => {}
            }
        }
        content
    }

    /// 1–3 follow-ups from the band's pool, rotated by the session question
    /// count so consecutive turns vary without randomness.
    fn follow_ups(&self, band: DifficultyBand, topic: &str, context: &SessionContext) -> Vec<String> {
        let pool = follow_up_pool(band, topic);
        let max = self.config.composer.max_follow_ups.clamp(1, pool.len());
        let count = 1 + (context.questions_asked as usize % max);
        let start = context.questions_asked as usize % pool.len();

        (0..count)
            .map(|i| pool[(start + i) % pool.len()].clone())
            .collect()
    }
}

fn style_prefix(style: ResponseStyle) -> &'static str {
    match style {
        ResponseStyle::Encouraging => "Nice effort so far!",
        ResponseStyle::Challenging => "Ready to stretch a little further?",
        ResponseStyle::Explanatory => "Let's walk through this together.",
        ResponseStyle::Interactive => "Your turn: let's make this hands-on.",
        ResponseStyle::Visual => "Picture this as we go.",
    }
}

fn base_content(subject: SubjectArea, band: DifficultyBand, topic: &str) -> String {
    match (subject, band) {
        (SubjectArea::Math, DifficultyBand::Foundational) => format!(
            "We'll build {} up from the basics, one small step at a time, with plenty of worked examples.",
            topic
        ),
        (SubjectArea::Math, DifficultyBand::Standard) => format!(
            "Let's practice {} with a mix of routine problems and a couple that make you think twice.",
            topic
        ),
        (SubjectArea::Math, DifficultyBand::Advanced) => format!(
            "Time for some challenging multi-step problems in {}; watch for the pattern behind them.",
            topic
        ),
        (SubjectArea::Science, DifficultyBand::Foundational) => format!(
            "We'll explore {} through everyday observations before naming any of the ideas.",
            topic
        ),
        (SubjectArea::Science, DifficultyBand::Standard) => format!(
            "Let's connect {} to an experiment you could run, and predict what happens before checking.",
            topic
        ),
        (SubjectArea::Science, DifficultyBand::Advanced) => format!(
            "We'll dig into the advanced mechanisms behind {} and the evidence that supports them.",
            topic
        ),
        (SubjectArea::Language, DifficultyBand::Foundational) => format!(
            "We'll read a short passage about {} together and pick out the key words.",
            topic
        ),
        (SubjectArea::Language, DifficultyBand::Standard) => format!(
            "Let's work on {} by writing a few sentences of your own and comparing them to the examples.",
            topic
        ),
        (SubjectArea::Language, DifficultyBand::Advanced) => format!(
            "We'll analyze how {} is used across challenging texts and argue for your own reading.",
            topic
        ),
        (SubjectArea::General, DifficultyBand::Foundational) => format!(
            "Let's start with the essentials of {} and make sure each piece feels solid.",
            topic
        ),
        (SubjectArea::General, DifficultyBand::Standard) => {
            format!("Let's take a closer look at {} and try applying it yourself.", topic)
        }
        (SubjectArea::General, DifficultyBand::Advanced) => format!(
            "Let's push into the more complex side of {} and see how far you can take it.",
            topic
        ),
    }
}

fn follow_up_pool(band: DifficultyBand, topic: &str) -> Vec<String> {
    match band {
        DifficultyBand::Foundational => vec![
            format!("Can you say what {} means in your own words?", topic),
            format!("What's one example of {} you've seen before?", topic),
            format!("Which part of {} feels trickiest right now?", topic),
            format!("What would you try first on a simple {} problem?", topic),
        ],
        DifficultyBand::Standard => vec![
            format!("How would you explain {} to a classmate?", topic),
            format!("Where could {} show up outside of class?", topic),
            format!("What happens to {} if you change one of the conditions?", topic),
            format!("Can you solve a {} problem a second, different way?", topic),
        ],
        DifficultyBand::Advanced => vec![
            format!("What assumptions is {} built on, and when do they break?", topic),
            format!("How does {} connect to the other topics you've covered?", topic),
            format!("Can you construct a hard {} problem and solve it?", topic),
            format!("Where would an expert disagree about {}?", topic),
        ],
    }
}

fn adaptation_reason(applied: &[ActionTag]) -> String {
    if applied.is_empty() {
        return "Staying the course; your current pace is working.".to_string();
    }

    let phrases: Vec<&str> = applied
        .iter()
        .map(|action| match action {
            ActionTag::SuggestBreak => "Suggested a break because this session has run long",
            ActionTag::DecreaseDifficulty => "Eased the difficulty to rebuild confidence",
            ActionTag::ProvideEncouragement => "Added encouragement after several help requests",
            ActionTag::IncreaseDifficulty => "Raised the difficulty to match your strong accuracy",
            ActionTag::AddVisualElements => "Added visual elements to suit your learning style",
            ActionTag::SuggestHandsOn => "Suggested a hands-on activity to suit your learning style",
            ActionTag::SimplifyContent => "Simplified the wording for a low-energy stretch",
        })
        .collect();
    phrases.join(". ")
}

/// Reinforce a struggling topic before advancing. Sorted so the suggestion is
/// stable across calls.
fn next_topic(record: &PerformanceRecord, context: &SessionContext) -> Option<String> {
    if !record.struggling_topics.is_empty() {
        let mut topics: Vec<&String> = record.struggling_topics.iter().collect();
        topics.sort();
        return topics.first().map(|t| t.to_string());
    }
    if context.current_topic.is_empty() {
        None
    } else {
        Some(format!("next steps beyond {}", context.current_topic))
    }
}

fn support_materials(style: LearningStyle, band: DifficultyBand) -> Vec<String> {
    let mut materials: Vec<String> = match style {
        LearningStyle::Visual => vec![
            "annotated diagram set".to_string(),
            "short explainer video".to_string(),
        ],
        LearningStyle::Auditory => vec![
            "topic walkthrough audio".to_string(),
            "read-aloud summary".to_string(),
        ],
        LearningStyle::Kinesthetic => vec![
            "hands-on activity sheet".to_string(),
            "manipulative practice kit".to_string(),
        ],
        LearningStyle::Reading => vec![
            "guided reading passage".to_string(),
            "worked-example handout".to_string(),
        ],
        LearningStyle::Mixed => vec![
            "illustrated study guide".to_string(),
            "practice problem set".to_string(),
        ],
    };

    materials.push(
        match band {
            DifficultyBand::Foundational => "foundations refresher card",
            DifficultyBand::Standard => "core skills checklist",
            DifficultyBand::Advanced => "extension challenge pack",
        }
        .to_string(),
    );
    materials
}
