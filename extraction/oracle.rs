use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A raw candidate term emitted by a single oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Surface form exactly as the oracle produced it.
    pub text: String,
    /// Native relevance score, when the oracle has one.
    pub score: Option<f32>,
}

impl Candidate {
    /// Creates a candidate without a native score.
    #[must_use]
    pub fn unscored(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: None,
        }
    }

    /// Creates a candidate carrying the oracle's native score.
    #[must_use]
    pub fn scored(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score: Some(score),
        }
    }
}

/// Errors emitted by scoring oracles.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The backing model or service failed or could not be reached.
    #[error("oracle backend error: {0}")]
    Backend(String),
    /// The oracle answered, but the payload was unusable.
    #[error("malformed oracle output: {0}")]
    Malformed(String),
}

/// A pluggable extractor producing candidate terms from text.
///
/// Implementations must not mutate state observable by other oracles;
/// the aggregator may invoke any number of them concurrently over the
/// same passage.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    /// Stable identifier used in telemetry and term provenance.
    fn name(&self) -> &'static str;

    /// Extracts candidate terms from the full input text, in the
    /// oracle's own preference order.
    async fn candidates(&self, text: &str) -> Result<Vec<Candidate>, OracleError>;
}
