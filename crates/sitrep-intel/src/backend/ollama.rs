//! Local Ollama server: `/api/generate` for text, `/api/embeddings` for vectors.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{checked_body, http_client, Embedder, TextGenerator};
use crate::error::IntelError;

const BACKEND: &str = "Ollama";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Non-streaming text generation against a local Ollama instance.
pub struct OllamaGenerator {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaGenerator {
    /// `url` is the full generate endpoint, e.g. `http://localhost:11434/api/generate`.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError::Http`] if the HTTP client cannot be built.
    pub fn new(url: &str, model: &str, timeout: Duration) -> Result<Self, IntelError> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.to_owned(),
            model: model.to_owned(),
        })
    }

    /// Generate once, surfacing failures as typed errors.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError`] on network failure, non-2xx status, or a body
    /// without a `response` field.
    pub async fn try_generate(&self, prompt: &str) -> Result<String, IntelError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let response = self.client.post(&self.url).json(&request).send().await?;
        let body = checked_body(BACKEND, response).await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|source| IntelError::Deserialize {
                context: "ollama generate response".to_owned(),
                source,
            })?;
        Ok(parsed.response)
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn backend_name(&self) -> &str {
        BACKEND
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(model = %self.model, error = %e, "Ollama generation failed");
                format!("Ollama error: {e}")
            }
        }
    }
}

/// Single-text embeddings from a local Ollama instance.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaEmbedder {
    /// `url` is the full embeddings endpoint, e.g. `http://localhost:11434/api/embeddings`.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError::Http`] if the HTTP client cannot be built.
    pub fn new(url: &str, model: &str, timeout: Duration) -> Result<Self, IntelError> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.to_owned(),
            model: model.to_owned(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IntelError> {
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };
        let response = self.client.post(&self.url).json(&request).send().await?;
        let body = checked_body(BACKEND, response).await?;
        let parsed: EmbeddingResponse =
            serde_json::from_str(&body).map_err(|source| IntelError::Deserialize {
                context: "ollama embeddings response".to_owned(),
                source,
            })?;
        if parsed.embedding.is_empty() {
            return Err(IntelError::EmptyResponse {
                backend: BACKEND.to_owned(),
                what: "embedding".to_owned(),
            });
        }
        Ok(parsed.embedding)
    }
}
