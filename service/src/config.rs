use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use lexilens_extraction::RankingPolicy;
use serde::{Deserialize, Serialize};

/// Which built-in oracles feed the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Enable the frequency-count oracle.
    pub frequency: bool,
    /// Maximum candidates emitted by the frequency oracle.
    pub frequency_max_terms: usize,
    /// Enable the proper-noun oracle.
    pub proper_nouns: bool,
    /// Endpoint of the external keyphrase model service; the oracle is
    /// disabled when absent.
    pub keyphrase_model_endpoint: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            frequency: true,
            frequency_max_terms: 10,
            proper_nouns: true,
            keyphrase_model_endpoint: None,
        }
    }
}

/// One entry of the knowledge-source priority chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Public encyclopedia summary endpoint.
    Encyclopedia,
    /// Language-model completion.
    Llm,
}

/// LLM completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat-completions base URL; the offline loopback client is used
    /// when absent.
    pub base_url: Option<String>,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Knowledge-source chain configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Priority order of the chain; earlier entries are tried first.
    pub order: Vec<SourceKind>,
    /// Encyclopedia endpoint base override (tests, mirrors).
    pub encyclopedia_base_url: Option<String>,
    /// LLM settings.
    pub llm: LlmConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            order: vec![SourceKind::Encyclopedia, SourceKind::Llm],
            encyclopedia_base_url: None,
            llm: LlmConfig::default(),
        }
    }
}

/// Telemetry sink paths. Both sinks are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// JSONL structured log file.
    pub log_path: Option<PathBuf>,
    /// JSONL operational event file.
    pub event_log_path: Option<PathBuf>,
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Oracle selection.
    pub oracles: OracleConfig,
    /// Knowledge-source chain.
    pub sources: SourceConfig,
    /// Term ordering policy.
    pub ranking: RankingPolicy,
    /// Telemetry sinks.
    pub telemetry: TelemetryConfig,
}

impl ServiceConfig {
    /// Loads configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
