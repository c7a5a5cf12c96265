use async_trait::async_trait;
use thiserror::Error;

/// Result of one knowledge-source lookup.
///
/// Ordinary "I know nothing about this term" is a value, not an error;
/// [`SourceError`] is reserved for genuine failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// A usable, non-empty explanation.
    Found(String),
    /// The source answered but has nothing for the term.
    NotFound,
}

/// Errors emitted by knowledge sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be reached or failed mid-request.
    #[error("source transport failure: {0}")]
    Transport(String),
    /// The source answered, but the payload was unusable.
    #[error("malformed source payload: {0}")]
    Malformed(String),
}

/// A pluggable external lookup producing a human-readable explanation
/// for a term.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Stable identifier used in telemetry and provenance.
    fn name(&self) -> &'static str;

    /// Looks the term up.
    async fn lookup(&self, term: &str) -> Result<LookupOutcome, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_distinguishes_found_from_not_found() {
        let found = LookupOutcome::Found("A process plants use.".into());
        assert_ne!(found, LookupOutcome::NotFound);
    }

    #[test]
    fn errors_carry_their_cause() {
        let err = SourceError::Transport("dns failure".into());
        assert!(err.to_string().contains("dns failure"));
    }
}
