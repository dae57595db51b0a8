//! `sitrep classify`: print the digest's posts with their categories.

use std::path::Path;

use sitrep_core::{AppConfig, ClassifierKind};
use sitrep_intel::{embedder_from_config, extract_posts, generator_from_config};

/// # Errors
///
/// Returns an error if the digest cannot be read, a backend client cannot be
/// built, or the posts cannot be serialized.
pub(crate) async fn run(
    config: &AppConfig,
    digest: &Path,
    classifier: Option<ClassifierKind>,
) -> anyhow::Result<String> {
    let digest = crate::read_file(digest)?;
    let kind = classifier.unwrap_or(config.classifier);
    let generator = generator_from_config(config)?;
    let embedder = embedder_from_config(config)?;

    let posts = extract_posts(&digest);
    tracing::info!(posts = posts.len(), classifier = %kind, "classifying digest");
    let posts = sitrep_intel::classify(posts, kind, generator.as_ref(), &embedder).await;

    Ok(serde_json::to_string_pretty(&posts)?)
}
