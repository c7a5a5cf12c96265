use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::oracle::{Candidate, OracleError, ScoringOracle};

/// Request body accepted by the keyphrase model service.
#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    text: &'a str,
}

/// One keyword entry. The service emits either plain strings or
/// `[text, score]` pairs, depending on the model behind it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeywordEntry {
    Plain(String),
    Scored(String, f32),
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    keywords: Vec<KeywordEntry>,
}

/// Oracle backed by an external keyphrase-extraction service
/// (an embedding or transformer model consumed as an opaque scorer).
///
/// Speaks a minimal wire contract: `POST { "text": ... }` to the
/// configured endpoint, expecting `{ "keywords": [...] }` back.
#[derive(Debug, Clone)]
pub struct KeyphraseModelOracle {
    client: reqwest::Client,
    endpoint: String,
}

impl KeyphraseModelOracle {
    /// Creates an oracle posting to `endpoint` with a default client.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Creates an oracle reusing a caller-configured client
    /// (timeouts and connection pooling belong to the client).
    #[must_use]
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ScoringOracle for KeyphraseModelOracle {
    fn name(&self) -> &'static str {
        "keyphrase-model"
    }

    async fn candidates(&self, text: &str) -> Result<Vec<Candidate>, OracleError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ExtractRequest { text })
            .send()
            .await
            .map_err(|err| OracleError::Backend(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Backend(format!(
                "keyphrase service returned {status}"
            )));
        }

        let parsed: ExtractResponse = response
            .json()
            .await
            .map_err(|err| OracleError::Malformed(err.to_string()))?;

        Ok(parsed
            .keywords
            .into_iter()
            .map(|entry| match entry {
                KeywordEntry::Plain(text) => Candidate::unscored(text),
                KeywordEntry::Scored(text, score) => Candidate::scored(text, score),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_keyword_arrays() {
        let parsed: ExtractResponse =
            serde_json::from_str(r#"{ "keywords": ["genome", "gene editing"] }"#).unwrap();
        assert_eq!(parsed.keywords.len(), 2);
        assert!(matches!(&parsed.keywords[0], KeywordEntry::Plain(text) if text == "genome"));
    }

    #[test]
    fn parses_scored_keyword_pairs() {
        let parsed: ExtractResponse =
            serde_json::from_str(r#"{ "keywords": [["genome", 0.71], ["crispr", 0.64]] }"#)
                .unwrap();
        assert!(
            matches!(&parsed.keywords[1], KeywordEntry::Scored(text, score) if text == "crispr" && (*score - 0.64).abs() < 1e-6)
        );
    }

    #[test]
    fn rejects_payload_without_keywords_field() {
        let parsed: Result<ExtractResponse, _> = serde_json::from_str(r#"{ "terms": [] }"#);
        assert!(parsed.is_err());
    }
}
