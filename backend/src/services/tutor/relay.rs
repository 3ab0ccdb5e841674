//! Relay client for the text-generation backend
//!
//! One request in, one backend call out. No retries and no internal timeout;
//! dropping the returned future aborts the outbound call.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::TutorError;
use crate::config::GenerationConfig;

/// Longest slice of a backend error body kept in the error message
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Successful relay result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub text: String,
}

/// A text-completion service the tutor can forward prompts to
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Model identifier, for logs and health reporting
    fn model(&self) -> &str;

    /// Where prompts are sent, for logs and health reporting
    fn endpoint(&self) -> &str;

    /// Send one prompt and wait for the complete reply
    async fn generate(&self, prompt: &str) -> Result<RelayReply, TutorError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Client for an Ollama-compatible `/api/generate` endpoint
pub struct OllamaClient {
    http_client: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &GenerationConfig) -> Self {
        let http_client = Client::builder()
            .user_agent(concat!("kwanqa-tutor/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self::with_client(http_client, config)
    }

    pub fn with_client(http_client: Client, config: &GenerationConfig) -> Self {
        Self { http_client, endpoint: config.endpoint.clone(), model: config.model.clone() }
    }
}

#[async_trait]
impl GenerationBackend for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn generate(&self, prompt: &str) -> Result<RelayReply, TutorError> {
        let body = GenerateRequest { model: &self.model, prompt, stream: false };

        tracing::debug!(
            "Sending prompt ({} chars) to {} with model {}",
            prompt.len(),
            self.endpoint,
            self.model
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach generation backend: {}", e);
                TutorError::BackendUnavailable(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!("Failed to read generation backend response: {}", e);
            TutorError::BackendUnavailable(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            let detail = truncate_chars(text.trim(), MAX_ERROR_BODY_CHARS);
            tracing::error!("Generation backend returned {}: {}", status, detail);
            return Err(TutorError::BackendUnavailable(format!("HTTP {}: {}", status, detail)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Generation backend sent an unreadable body: {}", e);
            TutorError::Unexpected(format!("Failed to parse backend response: {}", e))
        })?;

        // A success without text is an empty reply, not a failure
        let text = parsed.response.unwrap_or_default();
        if text.is_empty() {
            tracing::warn!("Generation backend returned no response text");
        }

        Ok(RelayReply { text })
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}... (truncated)", &text[..cut]),
        None => text.to_string(),
    }
}
