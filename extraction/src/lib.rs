#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Multi-signal salient-term identification.
//!
//! A set of pluggable [`ScoringOracle`] implementations each extract
//! candidate terms from the same passage; the [`CandidateAggregator`]
//! fans out across them and absorbs individual failures; the ranker
//! merges the aggregate into a deduplicated, ordered term list.

/// Oracle trait and candidate types.
#[path = "../oracle.rs"]
pub mod oracle;

/// Shared English stopword list.
#[path = "../stopwords.rs"]
pub mod stopwords;

/// Frequency-count oracle.
#[path = "../frequency.rs"]
pub mod frequency;

/// Proper-noun run oracle.
#[path = "../tagger.rs"]
pub mod tagger;

/// HTTP keyphrase-model oracle.
#[path = "../remote.rs"]
pub mod remote;

/// Concurrent oracle fan-out with failure absorption.
#[path = "../aggregator.rs"]
pub mod aggregator;

/// Deduplication and ranking of aggregated candidates.
#[path = "../ranker.rs"]
pub mod ranker;

/// Telemetry helpers for the extraction pipeline.
#[path = "../telemetry.rs"]
pub mod telemetry;

pub use aggregator::{CandidateAggregator, CandidateSet, SourcedCandidate};
pub use frequency::FrequencyOracle;
pub use oracle::{Candidate, OracleError, ScoringOracle};
pub use ranker::{rank, RankingPolicy, Term};
pub use remote::KeyphraseModelOracle;
pub use tagger::ProperNounOracle;
pub use telemetry::ExtractionTelemetry;
