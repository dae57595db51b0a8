//! Hosted Gemini `generateContent` client with quota-aware retry.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::retry::RetryPolicy;
use super::{checked_body, http_client, TextGenerator};
use crate::error::IntelError;

const BACKEND: &str = "Gemini";

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GeminiGenerator {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    policy: RetryPolicy,
}

impl GeminiGenerator {
    /// `base_url` is the API origin, e.g. `https://generativelanguage.googleapis.com`.
    ///
    /// A missing `api_key` is not an error here; every `generate` call then
    /// returns an explanatory error string instead of calling out.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<&str>,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self, IntelError> {
        Ok(Self {
            client: http_client(timeout)?,
            url: format!(
                "{}/v1beta/models/{model}:generateContent",
                base_url.trim_end_matches('/')
            ),
            model: model.to_owned(),
            api_key: api_key.map(str::to_owned),
            policy,
        })
    }

    /// One request, no retry.
    async fn generate_once(&self, api_key: &str, prompt: &str) -> Result<String, IntelError> {
        let request = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;
        let body = checked_body(BACKEND, response).await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|source| IntelError::Deserialize {
                context: "gemini generateContent response".to_owned(),
                source,
            })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(IntelError::EmptyResponse {
                backend: BACKEND.to_owned(),
                what: "candidate".to_owned(),
            });
        }
        Ok(text)
    }

    /// Generate with back-off on rate-limit errors.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError::NotConfigured`] without an API key, otherwise
    /// the first non-rate-limit error or the last error after the policy's
    /// attempt ceiling.
    pub async fn try_generate(&self, prompt: &str) -> Result<String, IntelError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| IntelError::NotConfigured("GEMINI_API_KEY not set".to_owned()))?;
        self.policy
            .run(IntelError::is_rate_limited, || {
                self.generate_once(api_key, prompt)
            })
            .await
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn backend_name(&self) -> &str {
        BACKEND
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(text) => text,
            Err(IntelError::NotConfigured(what)) => format!("Error: {what}"),
            Err(e) => {
                tracing::warn!(model = %self.model, error = %e, "Gemini generation failed");
                format!("Gemini error: {e}")
            }
        }
    }
}
