use thiserror::Error;

/// API-boundary errors. Everything past id validation is infallible:
/// lookups get-or-create, arithmetic clamps, ladder lookups default.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("learner id must not be empty")]
    EmptyLearnerId,
    #[error("no performance record for learner `{0}`")]
    UnknownLearner(String),
}

pub(crate) fn validate_learner_id(learner_id: &str) -> Result<(), EngineError> {
    if learner_id.trim().is_empty() {
        return Err(EngineError::EmptyLearnerId);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!(validate_learner_id(""), Err(EngineError::EmptyLearnerId));
        assert_eq!(validate_learner_id("   "), Err(EngineError::EmptyLearnerId));
        assert!(validate_learner_id("learner_1").is_ok());
    }
}
