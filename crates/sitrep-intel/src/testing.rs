//! In-memory backends for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sitrep_core::Category;

use crate::backend::{Embedder, TextGenerator};
use crate::error::IntelError;

type Reply = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Generator whose reply is a function of the prompt. Counts calls.
pub(crate) struct ScriptedGenerator {
    reply: Reply,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub(crate) fn always(reply: &str) -> Self {
        let reply = reply.to_owned();
        Self::with(move |_| reply.clone())
    }

    pub(crate) fn with(reply: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn backend_name(&self) -> &str {
        "Scripted"
    }

    fn model_name(&self) -> &str {
        "test-model"
    }

    async fn generate(&self, prompt: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)(prompt)
    }
}

/// One-hot embedder: anchors map to their own axis, other texts to the axis
/// of the first keyword they contain, or to the zero vector.
pub(crate) struct KeywordEmbedder {
    fail_on: Option<String>,
}

const KEYWORDS: [(Category, &[&str]); 6] = [
    (Category::GeopoliticsSecurity, &["missile", "border", "war"]),
    (Category::EconomicsMarkets, &["stock", "market", "gdp"]),
    (Category::AiTechnology, &["model", "software"]),
    (Category::HealthScience, &["vaccine", "clinical"]),
    (Category::SportsPerformance, &["goal", "match"]),
    (Category::SocietyCulture, &["film", "festival"]),
];

impl KeywordEmbedder {
    pub(crate) fn new() -> Self {
        Self { fail_on: None }
    }

    /// Fail every text containing `needle`; an empty needle fails everything.
    pub(crate) fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_owned());
        self
    }
}

fn one_hot(index: usize) -> Vec<f32> {
    let mut v = vec![0.0; Category::ALL.len()];
    v[index] = 1.0;
    v
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IntelError> {
        if self.fail_on.as_deref().is_some_and(|n| text.contains(n)) {
            return Err(IntelError::EmptyResponse {
                backend: "Keyword".to_owned(),
                what: "embedding".to_owned(),
            });
        }

        if let Some(i) = Category::ALL.iter().position(|c| c.anchor() == text) {
            return Ok(one_hot(i));
        }

        let lower = text.to_lowercase();
        let hit = KEYWORDS
            .iter()
            .position(|(_, words)| words.iter().any(|w| lower.contains(w)));
        Ok(hit.map_or_else(|| vec![0.0; Category::ALL.len()], one_hot))
    }
}
