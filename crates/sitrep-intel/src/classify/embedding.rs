//! Category assignment by cosine similarity to per-category anchor embeddings.

use sitrep_core::{Category, Post};

use crate::backend::Embedder;

const PROGRESS_EVERY: usize = 100;

/// Posts annotated by [`classify_posts`] and how many received a category.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingOutcome {
    pub posts: Vec<Post>,
    pub classified: usize,
}

/// Cosine similarity of two vectors.
///
/// Returns `0.0` when the lengths differ or either norm is below `1e-10`.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();
    if norm_a < 1e-10 || norm_b < 1e-10 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Embed every category anchor, in taxonomy order.
///
/// Anchors that fail to embed are logged and left out.
pub async fn embed_anchors(embedder: &dyn Embedder) -> Vec<(Category, Vec<f32>)> {
    let mut anchors = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        match embedder.embed(category.anchor()).await {
            Ok(vector) => anchors.push((category, vector)),
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "failed to embed category anchor");
            }
        }
    }
    anchors
}

/// Highest-similarity anchor; the earlier category wins ties.
fn best_category(vector: &[f32], anchors: &[(Category, Vec<f32>)]) -> Option<Category> {
    let mut best: Option<(Category, f32)> = None;
    for (category, anchor) in anchors {
        let score = cosine_similarity(vector, anchor);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((*category, score)),
        }
    }
    best.map(|(category, _)| category)
}

/// Classify posts against the embedded anchors.
///
/// Posts with blank text, or whose embedding call fails, keep their current
/// category. With no anchors at all nothing is classified.
pub async fn classify_posts(posts: Vec<Post>, embedder: &dyn Embedder) -> EmbeddingOutcome {
    let anchors = embed_anchors(embedder).await;
    if anchors.is_empty() {
        tracing::error!("no category anchors could be embedded; skipping classification");
        return EmbeddingOutcome {
            posts,
            classified: 0,
        };
    }

    let total = posts.len();
    let mut classified = 0usize;
    let mut out = Vec::with_capacity(total);

    for (i, post) in posts.into_iter().enumerate() {
        if i > 0 && i % PROGRESS_EVERY == 0 {
            tracing::info!(done = i, total, classified, "embedding classification progress");
        }

        let text = post.text.trim();
        if text.is_empty() {
            out.push(post);
            continue;
        }

        match embedder.embed(text).await {
            Ok(vector) => {
                let category = best_category(&vector, &anchors);
                if category.is_some() {
                    classified += 1;
                }
                out.push(post.with_category(category));
            }
            Err(e) => {
                tracing::warn!(post_id = %post.id, error = %e, "embedding failed, skipping post");
                out.push(post);
            }
        }
    }

    tracing::info!(classified, total, "embedding classification complete");
    EmbeddingOutcome {
        posts: out,
        classified,
    }
}
