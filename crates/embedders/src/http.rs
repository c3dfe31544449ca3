//! OpenAI-compatible HTTP embedder.
//!
//! Works with: OpenAI, Ollama, vLLM, Together AI, and any endpoint that
//! exposes `/embeddings` in the OpenAI shape. One request per text; the
//! client enforces the configured timeout so a stuck API can never wedge
//! an append.

use async_trait::async_trait;
use mnemon_core::error::EmbedderError;
use mnemon_core::Embedder;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// An embedder backed by an OpenAI-compatible `/embeddings` endpoint.
pub struct HttpEmbedder {
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
    client: reqwest::Client,
}

impl HttpEmbedder {
    /// Create a new HTTP embedder.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            dimensions,
            client,
        }
    }

    /// Create an Ollama embedder (convenience constructor).
    pub fn ollama(model: impl Into<String>, dimensions: usize) -> Self {
        Self::new(
            "http://localhost:11434/v1",
            "ollama", // Ollama doesn't need a real key
            model,
            dimensions,
            Duration::from_secs(30),
        )
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn name(&self) -> &str {
        "http"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbedderError> {
        let url = format!("{}/embeddings", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "input": [text],
            "encoding_format": "float",
        });

        debug!(model = %self.model, "Sending embedding request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbedderError::Timeout(e.to_string())
                } else {
                    EmbedderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(EmbedderError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if status == 401 || status == 403 {
            return Err(EmbedderError::AuthenticationFailed(
                "Invalid API key".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(EmbedderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: EmbeddingApiResponse = response.json().await.map_err(|e| {
            EmbedderError::InvalidResponse(format!("Failed to parse embedding response: {e}"))
        })?;

        debug!(
            model = %api_resp.model,
            total_tokens = api_resp.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0),
            "Embedding response received"
        );

        let vector = api_resp
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                EmbedderError::InvalidResponse("response contained no embeddings".into())
            })?;

        if vector.len() != self.dimensions {
            return Err(EmbedderError::InvalidResponse(format!(
                "expected {} dimensions, API returned {}",
                self.dimensions,
                vector.len()
            )));
        }

        Ok(vector)
    }
}

// --- Embedding API types ---

#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingData>,
    model: String,
    usage: Option<EmbeddingApiUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingApiUsage {
    total_tokens: u32,
}
