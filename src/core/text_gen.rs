//! Text Generation Client
//!
//! Thin client for a KoboldCpp-style completion endpoint. Posts
//! `{ "prompt", "history" }` and pulls the reply text out of whichever of
//! the common response shapes the server uses.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::config::TextGenConfig;

/// Errors from the text-generation endpoint.
#[derive(Debug, Error)]
pub enum TextGenError {
    /// Transport failure or unreadable body.
    #[error("Text generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered outside the 2xx range.
    #[error("Text generation request failed with status {status}")]
    Status { status: StatusCode },
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    history: &'a str,
}

/// Client for one endpoint.
#[derive(Debug, Clone)]
pub struct TextGenClient {
    client: Client,
    endpoint: String,
}

impl TextGenClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &TextGenConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a prompt with its conversation history.
    ///
    /// A blank prompt returns an empty string without contacting the server.
    #[instrument(skip(self, history), fields(endpoint = %self.endpoint))]
    pub async fn generate(&self, prompt: &str, history: &str) -> Result<String, TextGenError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(String::new());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest { prompt, history })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Text generation endpoint returned an error");
            return Err(TextGenError::Status { status });
        }

        let data: Value = response.json().await?;
        Ok(extract_response_text(&data))
    }
}

/// Reply text from the first matching shape, or `""`.
pub fn extract_response_text(data: &Value) -> String {
    if let Some(text) = data.as_str() {
        return text.to_string();
    }

    let candidates = [
        data.get("response"),
        data.get("text"),
        data.get("content"),
        data.pointer("/results/0/text"),
        data.pointer("/choices/0/text"),
        data.pointer("/choices/0/message/content"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
