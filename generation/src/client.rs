//! HTTP client for the Ollama generate-completion endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::GenerationError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1:8b";

/// One synchronous generate-completion request.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    /// "json" forces JSON-mode decoding; omitted for plain-text calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'a str>,
    pub options: DecodingOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecodingOptions {
    pub num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    /// Either a JSON-encoded string or an already-decoded value, depending
    /// on endpoint behavior.
    response: Option<Value>,
}

/// Client for a local Ollama-compatible endpoint.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    /// A hung endpoint stalls the whole pipeline, so the client always
    /// carries an explicit request timeout; timeouts surface as retryable
    /// transport errors.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Issue one generate call and return the raw `response` value.
    pub async fn generate(&self, request: &GenerateRequest<'_>) -> Result<Value, GenerationError> {
        debug!(
            model = request.model,
            prompt_chars = request.prompt.len(),
            json_mode = request.format.is_some(),
            ">>> POST /api/generate"
        );

        let resp = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            error!(status, "<<< LLM endpoint error: {}", body);
            return Err(GenerationError::Endpoint { status, body });
        }

        let body: GenerateResponse = resp.json().await?;
        body.response.ok_or(GenerationError::MissingResponseField)
    }
}
