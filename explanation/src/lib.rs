#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Explanation resolution for salient terms.
//!
//! A prioritized chain of [`KnowledgeSource`] adapters is tried
//! strictly in order; the first usable summary wins, and exhaustion
//! degrades to a deterministic fallback instead of an error.

/// Knowledge-source trait and outcome types.
#[path = "../source.rs"]
pub mod source;

/// Public encyclopedia summary source.
#[path = "../encyclopedia.rs"]
pub mod encyclopedia;

/// LLM completion source and client boundary.
#[path = "../llm.rs"]
pub mod llm;

/// The sequential resolution chain.
#[path = "../resolver.rs"]
pub mod resolver;

/// Telemetry helpers for explanation resolution.
#[path = "../telemetry.rs"]
pub mod telemetry;

pub use encyclopedia::EncyclopediaSource;
pub use llm::{CompletionClient, HttpCompletionClient, LlmSource, LoopbackCompletionClient};
pub use resolver::{Explanation, ExplanationResolver, Provenance};
pub use source::{KnowledgeSource, LookupOutcome, SourceError};
pub use telemetry::ExplanationTelemetry;
