use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::time::{sleep, Duration};

use crate::source::{KnowledgeSource, LookupOutcome, SourceError};

/// Abstract completion backend for the LLM source.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the model's free-text completion for the prompt.
    async fn complete(&self, prompt: &str) -> Result<String, SourceError>;
}

/// Offline client for tests and air-gapped runs.
#[derive(Debug, Default)]
pub struct LoopbackCompletionClient;

#[async_trait]
impl CompletionClient for LoopbackCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, SourceError> {
        sleep(Duration::from_millis(5)).await;
        Ok(format!("Loopback completion for: {prompt}"))
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// HTTP client speaking the chat-completions wire shape.
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpCompletionClient {
    /// Creates a client against `base_url` (the path `/chat/completions`
    /// is appended per request).
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Reuses a caller-configured HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, SourceError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Transport(format!(
                "completion endpoint returned {status}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| SourceError::Malformed(err.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SourceError::Malformed("response carried no completion".into()))
    }
}

/// Knowledge source that asks a language model for a short definition.
#[derive(Clone)]
pub struct LlmSource {
    client: Arc<dyn CompletionClient>,
}

impl fmt::Debug for LlmSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSource").finish()
    }
}

impl LlmSource {
    /// Creates a source over the given completion backend.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    fn prompt(term: &str) -> String {
        format!("Explain the term \"{term}\" in one or two plain sentences.")
    }
}

#[async_trait]
impl KnowledgeSource for LlmSource {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn lookup(&self, term: &str) -> Result<LookupOutcome, SourceError> {
        let completion = self.client.complete(&Self::prompt(term)).await?;
        let trimmed = completion.trim();
        if trimmed.is_empty() {
            Ok(LookupOutcome::NotFound)
        } else {
            Ok(LookupOutcome::Found(trimmed.to_string()))
        }
    }
}
