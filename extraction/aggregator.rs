use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;

use crate::oracle::{OracleError, ScoringOracle};
use crate::telemetry::ExtractionTelemetry;

/// A candidate annotated with the oracle that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcedCandidate {
    /// Normalized surface form: trimmed, internal whitespace collapsed,
    /// original casing preserved.
    pub text: String,
    /// Name of the originating oracle.
    pub source: String,
    /// The oracle's native score, if any.
    pub score: Option<f32>,
}

/// Ordered candidates collected from one aggregation pass.
/// Request-scoped; never persisted.
pub type CandidateSet = Vec<SourcedCandidate>;

/// Fans the input text out across every configured oracle and collects
/// all candidates.
///
/// Oracles run concurrently so total latency is bounded by the slowest
/// one, but results are collected in registration order, keeping the
/// output deterministic. A failing oracle (error, panic, malformed
/// output) contributes zero candidates; partial results from the rest
/// are always returned.
pub struct CandidateAggregator {
    oracles: Vec<Arc<dyn ScoringOracle>>,
    telemetry: ExtractionTelemetry,
}

impl fmt::Debug for CandidateAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.oracles.iter().map(|oracle| oracle.name()).collect();
        f.debug_struct("CandidateAggregator")
            .field("oracles", &names)
            .finish()
    }
}

impl CandidateAggregator {
    /// Creates an aggregator over the given oracles, in priority order.
    #[must_use]
    pub fn new(oracles: Vec<Arc<dyn ScoringOracle>>) -> Self {
        Self {
            oracles,
            telemetry: ExtractionTelemetry::new(),
        }
    }

    /// Attaches telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: ExtractionTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Runs every oracle over `text` and returns all usable candidates.
    ///
    /// The caller is responsible for rejecting empty input before this
    /// point; an empty text simply produces an empty set here.
    pub async fn aggregate(&self, text: &str) -> CandidateSet {
        let mut handles = Vec::with_capacity(self.oracles.len());
        for oracle in &self.oracles {
            let name = oracle.name();
            let oracle = Arc::clone(oracle);
            let text = text.to_string();
            handles.push((
                name,
                tokio::spawn(async move { oracle.candidates(&text).await }),
            ));
        }

        let mut set = CandidateSet::new();
        for (name, handle) in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                // A panicking oracle is treated like any other failed one.
                Err(err) => Err(OracleError::Backend(format!("oracle task aborted: {err}"))),
            };
            match outcome {
                Ok(candidates) => {
                    let mut kept = 0usize;
                    for candidate in candidates {
                        if let Some(normalized) = normalize_surface(&candidate.text) {
                            set.push(SourcedCandidate {
                                text: normalized,
                                source: name.to_string(),
                                score: candidate.score,
                            });
                            kept += 1;
                        }
                    }
                    self.telemetry.log(
                        LogLevel::Debug,
                        "oracle contributed candidates",
                        json!({ "oracle": name, "candidates": kept }),
                    );
                }
                Err(err) => {
                    self.telemetry.oracle_failed(name, &err.to_string()).await;
                }
            }
        }

        self.telemetry
            .event(
                "extraction.aggregate.complete",
                json!({ "candidates": set.len() }),
            )
            .await;
        set
    }
}

/// Collapses internal whitespace and trims; `None` when nothing remains.
fn normalize_surface(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
