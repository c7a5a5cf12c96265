use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::source::{KnowledgeSource, LookupOutcome, SourceError};

const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const DEFAULT_MAX_CHARS: usize = 600;

/// Subset of the REST summary payload this source consumes.
#[derive(Debug, Deserialize)]
struct SummaryPayload {
    #[serde(rename = "type")]
    kind: Option<String>,
    extract: Option<String>,
}

/// Public encyclopedia summary endpoint (Wikipedia REST `page/summary`).
///
/// A missing page (HTTP 404), a disambiguation page, or an empty
/// extract are all `NotFound` — only genuine transport or decode
/// failures become errors.
#[derive(Debug, Clone)]
pub struct EncyclopediaSource {
    client: reqwest::Client,
    base_url: String,
    max_chars: usize,
}

impl EncyclopediaSource {
    /// Creates a source against the public endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Points the source at a different endpoint base (tests, mirrors).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reuses a caller-configured HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Caps the summary length (character count, word-agnostic).
    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    fn summary_url(&self, term: &str) -> String {
        let title = term.trim().replace(' ', "_");
        format!("{}/{}", self.base_url.trim_end_matches('/'), title)
    }
}

impl Default for EncyclopediaSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeSource for EncyclopediaSource {
    fn name(&self) -> &'static str {
        "encyclopedia"
    }

    async fn lookup(&self, term: &str) -> Result<LookupOutcome, SourceError> {
        let response = self
            .client
            .get(self.summary_url(term))
            .send()
            .await
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(LookupOutcome::NotFound);
        }
        if !status.is_success() {
            return Err(SourceError::Transport(format!(
                "summary endpoint returned {status}"
            )));
        }

        let payload: SummaryPayload = response
            .json()
            .await
            .map_err(|err| SourceError::Malformed(err.to_string()))?;

        if payload.kind.as_deref() == Some("disambiguation") {
            return Ok(LookupOutcome::NotFound);
        }
        match payload.extract {
            Some(extract) if !extract.trim().is_empty() => {
                let extract = extract.trim();
                let summary = if extract.chars().count() > self.max_chars {
                    extract.chars().take(self.max_chars).collect()
                } else {
                    extract.to_string()
                };
                Ok(LookupOutcome::Found(summary))
            }
            _ => Ok(LookupOutcome::NotFound),
        }
    }
}
