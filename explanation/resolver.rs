use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;

use crate::source::{KnowledgeSource, LookupOutcome};
use crate::telemetry::ExplanationTelemetry;

/// Where an explanation came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Name of the knowledge source that produced the text.
    Source(String),
    /// Every source was exhausted; the text is the deterministic fallback.
    Fallback,
}

/// Explanation returned to callers. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Human-readable explanation text.
    pub text: String,
    /// Which source produced it.
    pub provenance: Provenance,
}

/// Tries knowledge sources strictly in priority order.
///
/// Sources are consulted one at a time; the first usable summary
/// short-circuits the chain and no later source is called. Source
/// failures and empty answers both mean "try the next one";
/// exhaustion degrades to a fallback message, never an error.
pub struct ExplanationResolver {
    sources: Vec<Arc<dyn KnowledgeSource>>,
    telemetry: ExplanationTelemetry,
}

impl fmt::Debug for ExplanationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|source| source.name()).collect();
        f.debug_struct("ExplanationResolver")
            .field("sources", &names)
            .finish()
    }
}

impl ExplanationResolver {
    /// Creates a resolver over the given sources, highest priority first.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn KnowledgeSource>>) -> Self {
        Self {
            sources,
            telemetry: ExplanationTelemetry::new(),
        }
    }

    /// Attaches telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: ExplanationTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// The deterministic text returned when every source is exhausted.
    #[must_use]
    pub fn fallback_text(term: &str) -> String {
        format!("No explanation found for \"{}\".", term.trim())
    }

    /// Resolves an explanation for `term`.
    ///
    /// The caller is responsible for rejecting empty terms before this
    /// point. This method never fails: exhaustion yields the fallback.
    pub async fn explain(&self, term: &str) -> Explanation {
        for source in &self.sources {
            match source.lookup(term).await {
                Ok(LookupOutcome::Found(text)) => {
                    self.telemetry.resolved(term, source.name()).await;
                    return Explanation {
                        text,
                        provenance: Provenance::Source(source.name().to_string()),
                    };
                }
                Ok(LookupOutcome::NotFound) => {
                    self.telemetry.log(
                        LogLevel::Debug,
                        "source had nothing for term",
                        json!({ "source": source.name(), "term": term }),
                    );
                }
                Err(err) => {
                    self.telemetry
                        .source_failed(source.name(), &err.to_string())
                        .await;
                }
            }
        }

        self.telemetry.resolved(term, "fallback").await;
        Explanation {
            text: Self::fallback_text(term),
            provenance: Provenance::Fallback,
        }
    }
}
