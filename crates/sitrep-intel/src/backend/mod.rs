//! Text-generation and embedding backends.
//!
//! The pipeline only sees the [`TextGenerator`] and [`Embedder`] traits.
//! Generation never fails at the type level: a backend that cannot produce
//! text returns an error string instead, so a report always renders.

mod gemini;
mod ollama;
pub mod retry;

use std::time::Duration;

use async_trait::async_trait;
use sitrep_core::{AppConfig, Backend};

use crate::error::IntelError;

pub use gemini::GeminiGenerator;
pub use ollama::{OllamaEmbedder, OllamaGenerator};
pub use retry::RetryPolicy;

/// A prompt-in, text-out generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend label used in the report attribution (`Ollama`, `Gemini`).
    fn backend_name(&self) -> &str;

    fn model_name(&self) -> &str;

    /// Generate a completion for `prompt`.
    ///
    /// Failures come back as backend-prefixed error text, never as an empty string.
    async fn generate(&self, prompt: &str) -> String;
}

/// A text-to-vector embedding backend.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError`] on network, status, or payload failures. Callers
    /// treat this as a per-item skip.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IntelError>;
}

/// Attribution line rendered under the report title.
#[must_use]
pub fn attribution(generator: &dyn TextGenerator) -> String {
    format!(
        "Agent: {} Intelligence | Model: {}",
        generator.backend_name(),
        generator.model_name()
    )
}

/// Build the configured generation backend.
///
/// # Errors
///
/// Returns [`IntelError::Http`] if the HTTP client cannot be constructed.
pub fn generator_from_config(config: &AppConfig) -> Result<Box<dyn TextGenerator>, IntelError> {
    let timeout = Duration::from_secs(config.generate_timeout_secs);
    match config.backend {
        Backend::Ollama => Ok(Box::new(OllamaGenerator::new(
            &config.ollama_url,
            &config.ollama_model,
            timeout,
        )?)),
        Backend::Gemini => {
            let policy = RetryPolicy::new(
                config.gemini_max_attempts,
                Duration::from_secs(config.gemini_backoff_min_secs),
                Duration::from_secs(config.gemini_backoff_max_secs),
            );
            Ok(Box::new(GeminiGenerator::new(
                &config.gemini_base_url,
                &config.gemini_model,
                config.gemini_api_key.as_deref(),
                timeout,
                policy,
            )?))
        }
    }
}

/// Build the embedding backend (always Ollama).
///
/// # Errors
///
/// Returns [`IntelError::Http`] if the HTTP client cannot be constructed.
pub fn embedder_from_config(config: &AppConfig) -> Result<OllamaEmbedder, IntelError> {
    OllamaEmbedder::new(
        &config.ollama_embed_url,
        &config.ollama_embed_model,
        Duration::from_secs(config.embed_timeout_secs),
    )
}

/// Build a `reqwest` client with the given total request timeout.
fn http_client(timeout: Duration) -> Result<reqwest::Client, IntelError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}

/// Read a response body, mapping non-2xx statuses to typed errors.
async fn checked_body(backend: &str, response: reqwest::Response) -> Result<String, IntelError> {
    let status = response.status();
    let body = response.text().await?;
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(IntelError::RateLimited {
            backend: backend.to_owned(),
            message: body,
        });
    }
    if !status.is_success() {
        return Err(IntelError::UnexpectedStatus {
            backend: backend.to_owned(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
