use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use sitrep_core::Post;

/// Render the posts in a JSON file as a digest stamped with the current time.
pub(crate) fn run(posts: &Path) -> anyhow::Result<String> {
    let raw = crate::read_file(posts)?;
    let posts: Vec<Post> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of posts", posts.display()))?;
    tracing::info!(posts = posts.len(), "rendering digest");
    Ok(sitrep_intel::render_digest(&posts, Utc::now()))
}
