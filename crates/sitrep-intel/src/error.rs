use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 or a `RESOURCE_EXHAUSTED` payload from a quota-limited backend.
    #[error("rate limited by {backend}: {message}")]
    RateLimited { backend: String, message: String },

    #[error("unexpected HTTP status {status} from {backend}: {body}")]
    UnexpectedStatus {
        backend: String,
        status: u16,
        body: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{backend} returned an empty {what}")]
    EmptyResponse { backend: String, what: String },

    #[error("backend not configured: {0}")]
    NotConfigured(String),
}

impl IntelError {
    /// Whether the error belongs to the rate-limit class that warrants a back-off retry.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        match self {
            IntelError::RateLimited { .. } => true,
            IntelError::UnexpectedStatus { status, body, .. } => {
                *status == 429 || body.contains("RESOURCE_EXHAUSTED")
            }
            _ => false,
        }
    }
}
