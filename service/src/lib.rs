#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Core-facing boundary of the lexilens text-analysis stack.
//!
//! The transport layer (HTTP routing, CORS, process startup) lives
//! elsewhere; it extracts `text` / `term` fields from a request and
//! calls [`AnalysisService::aggregate_and_rank`] or
//! [`AnalysisService::resolve_explanation`], forwarding the result.

/// Configuration types and loader.
pub mod config;

use std::sync::Arc;

use thiserror::Error;

use lexilens_explanation::{
    CompletionClient, EncyclopediaSource, ExplanationResolver, ExplanationTelemetry,
    HttpCompletionClient, KnowledgeSource, LlmSource, LoopbackCompletionClient,
};
use lexilens_extraction::{
    rank, CandidateAggregator, ExtractionTelemetry, FrequencyOracle, KeyphraseModelOracle,
    ProperNounOracle, ScoringOracle,
};
use shared_event_bus::{EventPublisher, JsonlEventPublisher};
use shared_logging::JsonLogger;

pub use config::{LlmConfig, OracleConfig, ServiceConfig, SourceConfig, SourceKind, TelemetryConfig};
pub use lexilens_explanation::{Explanation, Provenance};
pub use lexilens_extraction::{RankingPolicy, Term};

/// Errors crossing the service boundary.
///
/// Expected degradations (an oracle down, a knowledge source empty) are
/// absorbed inside the core and never appear here; only caller input
/// errors and genuine contract violations do.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// `text` was missing or blank. Caller error, never retried.
    #[error("text must be non-empty")]
    EmptyText,
    /// `term` was missing or blank. Caller error, never retried.
    #[error("term must be non-empty")]
    EmptyTerm,
    /// Contract violation inside the core; the only 5xx-class outcome.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// The analysis core: one aggregator, one ranking policy, one resolver.
///
/// Built once at process start; immutable afterwards. Requests share
/// nothing mutable, so a single instance serves any number of
/// concurrent callers.
#[derive(Debug)]
pub struct AnalysisService {
    aggregator: CandidateAggregator,
    policy: RankingPolicy,
    resolver: ExplanationResolver,
}

impl AnalysisService {
    /// Builds the component graph from configuration.
    pub fn bootstrap(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let logger = match &config.telemetry.log_path {
            Some(path) => Some(Arc::new(JsonLogger::create(path)?)),
            None => None,
        };
        let publisher: Option<Arc<dyn EventPublisher>> = match &config.telemetry.event_log_path {
            Some(path) => Some(Arc::new(JsonlEventPublisher::new(path)?)),
            None => None,
        };

        let mut extraction_telemetry = ExtractionTelemetry::new();
        let mut explanation_telemetry = ExplanationTelemetry::new();
        if let Some(logger) = &logger {
            extraction_telemetry = extraction_telemetry.with_logger(Arc::clone(logger));
            explanation_telemetry = explanation_telemetry.with_logger(Arc::clone(logger));
        }
        if let Some(publisher) = &publisher {
            extraction_telemetry = extraction_telemetry.with_publisher(Arc::clone(publisher));
            explanation_telemetry = explanation_telemetry.with_publisher(Arc::clone(publisher));
        }

        let mut oracles: Vec<Arc<dyn ScoringOracle>> = Vec::new();
        if config.oracles.frequency {
            oracles.push(Arc::new(FrequencyOracle::new(
                config.oracles.frequency_max_terms,
            )));
        }
        if config.oracles.proper_nouns {
            oracles.push(Arc::new(ProperNounOracle::new()));
        }
        if let Some(endpoint) = &config.oracles.keyphrase_model_endpoint {
            oracles.push(Arc::new(KeyphraseModelOracle::new(endpoint.as_str())));
        }

        let mut sources: Vec<Arc<dyn KnowledgeSource>> = Vec::new();
        for kind in &config.sources.order {
            match kind {
                SourceKind::Encyclopedia => {
                    let mut source = EncyclopediaSource::new();
                    if let Some(base) = &config.sources.encyclopedia_base_url {
                        source = source.with_base_url(base.as_str());
                    }
                    sources.push(Arc::new(source));
                }
                SourceKind::Llm => {
                    let client: Arc<dyn CompletionClient> = match &config.sources.llm.base_url {
                        Some(base) => Arc::new(HttpCompletionClient::new(
                            base.as_str(),
                            config.sources.llm.api_key.as_str(),
                            config.sources.llm.model.as_str(),
                        )),
                        None => Arc::new(LoopbackCompletionClient),
                    };
                    sources.push(Arc::new(LlmSource::new(client)));
                }
            }
        }

        Ok(Self {
            aggregator: CandidateAggregator::new(oracles).with_telemetry(extraction_telemetry),
            policy: config.ranking,
            resolver: ExplanationResolver::new(sources).with_telemetry(explanation_telemetry),
        })
    }

    /// Assembles a service from pre-built components (tests, custom stacks).
    #[must_use]
    pub fn from_parts(
        aggregator: CandidateAggregator,
        policy: RankingPolicy,
        resolver: ExplanationResolver,
    ) -> Self {
        Self {
            aggregator,
            policy,
            resolver,
        }
    }

    /// Identifies the deduplicated, ranked salient terms of `text`.
    ///
    /// An empty result is a valid outcome, not an error — it is what
    /// every oracle failing (or finding nothing) produces.
    pub async fn identify_terms(&self, text: &str) -> Result<Vec<Term>, ServiceError> {
        if text.trim().is_empty() {
            return Err(ServiceError::EmptyText);
        }
        let candidates = self.aggregator.aggregate(text).await;
        Ok(rank(&candidates, self.policy))
    }

    /// String-only variant of [`Self::identify_terms`]: the ordered
    /// unique term texts.
    pub async fn aggregate_and_rank(&self, text: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .identify_terms(text)
            .await?
            .into_iter()
            .map(|term| term.text)
            .collect())
    }

    /// Resolves a short explanation for `term`.
    ///
    /// Always yields an explanation: source exhaustion degrades to a
    /// deterministic fallback naming the term.
    pub async fn resolve_explanation(&self, term: &str) -> Result<Explanation, ServiceError> {
        if term.trim().is_empty() {
            return Err(ServiceError::EmptyTerm);
        }
        Ok(self.resolver.explain(term).await)
    }
}
