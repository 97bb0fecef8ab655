//! Client for the external text-generation service.
//!
//! The classification engine only needs `generate(prompt) -> text | fails`
//! plus a cheap reachability probe, expressed here as the [`Generator`]
//! trait. [`OllamaClient`] is the production implementation against an
//! Ollama-compatible `/api/generate` endpoint; tests substitute fakes.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Default endpoint of a local Ollama server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "mistral:latest";
/// Request timeout. Generation is not retried; on expiry the caller falls
/// back to rule-based classification.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const TEMPERATURE: f64 = 0.3;
const NUM_PREDICT: u32 = 512;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("server returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Invalid(String),
    #[error("empty response from model")]
    Empty,
}

impl From<reqwest::Error> for GenerateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerateError::Timeout
        } else if err.is_connect() {
            GenerateError::Connection(err.to_string())
        } else if err.is_decode() {
            GenerateError::Invalid(err.to_string())
        } else {
            GenerateError::Connection(err.to_string())
        }
    }
}

/// A request/response text-generation endpoint.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`. One attempt, bounded timeout.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;

    /// Cheap reachability probe. Callers skip the generate attempt entirely
    /// when this returns false.
    async fn healthy(&self) -> bool;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// HTTP client for an Ollama-compatible generate endpoint.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a client for the given base URL (no trailing slash) and model id.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_timeout(base_url, model, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                num_predict: NUM_PREDICT,
            },
        };

        info!(url = %url, model = %self.model, "calling generate endpoint");
        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text = parsed.response.trim().to_string();
        if text.is_empty() {
            return Err(GenerateError::Empty);
        }

        debug!(chars = text.len(), "model response received");
        Ok(text)
    }

    async fn healthy(&self) -> bool {
        let reachable = self
            .client
            .get(&self.base_url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .is_ok_and(|r| r.status().is_success());
        if !reachable {
            debug!(base_url = %self.base_url, "model service not reachable");
        }
        reachable
    }
}
