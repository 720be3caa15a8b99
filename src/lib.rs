//! Adaptive tutoring decision engine.
//!
//! Tracks a performance record per learner, evaluates a prioritized rule set
//! against live session context, mutates the difficulty/style/engagement
//! model, and composes the adapted outbound response. The outcome recorder
//! closes the loop once an answer is graded.
//!
//! Pure library boundary: no network protocol, file format, or CLI.

pub mod composer;
pub mod config;
pub mod engine;
pub mod error;
pub mod insights;
pub mod logging;
pub mod mutator;
pub mod rules;
pub mod store;
pub mod types;

pub use config::EngineConfig;
pub use engine::TutorEngine;
pub use error::EngineError;
pub use insights::LearnerInsights;
pub use rules::{Adaptation, AdaptationRule, RuleCondition, RuleSet};
pub use store::{InMemoryPerformanceStore, PerformanceRepository, RecordHandle};
pub use types::*;
