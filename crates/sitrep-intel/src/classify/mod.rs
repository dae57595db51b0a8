//! Post classification strategies.
//!
//! Both strategies return annotated copies of their input, in input order.
//! Posts that could not be placed keep `category = None`.

pub mod embedding;
pub mod generative;

pub use embedding::{classify_posts, cosine_similarity, embed_anchors, EmbeddingOutcome};
pub use generative::{classify_all, classify_batch, classify_one, match_category, BATCH_SIZE};
