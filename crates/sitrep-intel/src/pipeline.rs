//! End-to-end report orchestration.
//!
//! Stages run in sequence: truncate, parse, classify, select, map, reduce,
//! assemble. Only the map stage fans out.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use sitrep_core::{AppConfig, ClassifierKind, Post};

use crate::backend::{attribution, Embedder, TextGenerator};
use crate::classify::{classify_all, classify_posts};
use crate::digest::{extract_posts, truncate_digest};
use crate::report::{
    assemble_report, generate_direct_report, generate_executive_summary, generate_sections,
};
use crate::select::select_top_per_category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Classify, select, one call per section, then a summary call.
    #[default]
    MapReduce,
    /// One call over the whole digest.
    Direct,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub classifier: ClassifierKind,
    pub top_per_category: usize,
    pub section_concurrency: usize,
    pub mode: ReportMode,
    /// Max posts taken from the digest; `0` keeps all.
    pub intel_limit: usize,
    /// Date shown in the report title.
    pub date: NaiveDate,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::default(),
            top_per_category: 10,
            section_concurrency: 1,
            mode: ReportMode::default(),
            intel_limit: 0,
            date: Utc::now().date_naive(),
        }
    }
}

impl ReportOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            classifier: config.classifier,
            top_per_category: config.top_per_category,
            section_concurrency: config.section_concurrency,
            intel_limit: config.intel_limit,
            ..Self::default()
        }
    }
}

/// Run the selected classification strategy over `posts`.
pub async fn classify(
    posts: Vec<Post>,
    kind: ClassifierKind,
    generator: &dyn TextGenerator,
    embedder: &dyn Embedder,
) -> Vec<Post> {
    match kind {
        ClassifierKind::Generative => classify_all(posts, generator).await,
        ClassifierKind::Embedding => classify_posts(posts, embedder).await.posts,
    }
}

/// Produce a situation report from a digest document.
///
/// Backend failures never abort the run; they surface as text inside the
/// report.
pub async fn run_report(
    digest: &str,
    options: &ReportOptions,
    generator: &dyn TextGenerator,
    embedder: &dyn Embedder,
) -> String {
    let digest = truncate_digest(digest, options.intel_limit);
    let attribution = attribution(generator);

    if options.mode == ReportMode::Direct {
        return generate_direct_report(&digest, generator, options.date, &attribution).await;
    }

    let posts = extract_posts(&digest);
    tracing::info!(posts = posts.len(), classifier = %options.classifier, "classifying posts");

    let posts = classify(posts, options.classifier, generator, embedder).await;
    let classified = posts.iter().filter(|p| p.category.is_some()).count();
    tracing::info!(classified, total = posts.len(), "classification finished");

    let selection = select_top_per_category(posts, options.top_per_category);
    let distribution: BTreeMap<String, usize> = selection
        .iter()
        .map(|(category, posts)| (category.to_string(), posts.len()))
        .collect();
    tracing::info!(?distribution, "category distribution");

    let sections = generate_sections(&selection, generator, options.section_concurrency).await;
    let summary = generate_executive_summary(&sections, generator).await;
    assemble_report(options.date, &attribution, &summary, &sections)
}
