/// Text-generation backend used for classification and synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Hosted, quota-limited Gemini API.
    Gemini,
    /// Local Ollama server.
    Ollama,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Gemini => write!(f, "gemini"),
            Backend::Ollama => write!(f, "ollama"),
        }
    }
}

/// Classification strategy for the report pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    /// Numbered-list batches sent to the text generator.
    #[default]
    Generative,
    /// Cosine similarity against embedded category anchors.
    Embedding,
}

impl std::fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifierKind::Generative => write!(f, "generative"),
            ClassifierKind::Embedding => write!(f, "embedding"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub backend: Backend,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_max_attempts: u32,
    pub gemini_backoff_min_secs: u64,
    pub gemini_backoff_max_secs: u64,
    pub ollama_url: String,
    pub ollama_model: String,
    pub ollama_embed_url: String,
    pub ollama_embed_model: String,
    pub top_per_category: usize,
    pub classifier: ClassifierKind,
    pub intel_limit: usize,
    pub section_concurrency: usize,
    pub generate_timeout_secs: u64,
    pub embed_timeout_secs: u64,
    pub log_level: String,
}

impl AppConfig {
    /// Model name of the configured generation backend.
    #[must_use]
    pub fn generation_model(&self) -> &str {
        match self.backend {
            Backend::Gemini => &self.gemini_model,
            Backend::Ollama => &self.ollama_model,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("backend", &self.backend)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_max_attempts", &self.gemini_max_attempts)
            .field("gemini_backoff_min_secs", &self.gemini_backoff_min_secs)
            .field("gemini_backoff_max_secs", &self.gemini_backoff_max_secs)
            .field("ollama_url", &self.ollama_url)
            .field("ollama_model", &self.ollama_model)
            .field("ollama_embed_url", &self.ollama_embed_url)
            .field("ollama_embed_model", &self.ollama_embed_model)
            .field("top_per_category", &self.top_per_category)
            .field("classifier", &self.classifier)
            .field("intel_limit", &self.intel_limit)
            .field("section_concurrency", &self.section_concurrency)
            .field("generate_timeout_secs", &self.generate_timeout_secs)
            .field("embed_timeout_secs", &self.embed_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}
