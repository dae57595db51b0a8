//! Category assignment by prompting a text generator.
//!
//! Replies are free text, so matching is a fixed two-pass rule:
//! 1. the first category (taxonomy order) whose full name appears in the reply;
//! 2. else the first category with any name keyword (ignoring `&`/`and`)
//!    appearing in the reply.

use std::sync::LazyLock;

use regex::Regex;
use sitrep_core::{Category, Post};

use crate::backend::TextGenerator;

/// Maximum posts per batched classification call.
pub const BATCH_SIZE: usize = 10;

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.)]\s*(.*)").expect("valid numbered-line regex"));

fn category_bullets() -> String {
    Category::ALL
        .iter()
        .map(|c| format!("- {}", c.name()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking for a single category name.
#[must_use]
pub fn single_prompt(text: &str) -> String {
    format!(
        "Classify the following social media post into exactly ONE of these categories:\n\
         {}\n\n\
         Reply with ONLY the category name, nothing else.\n\n\
         POST:\n{text}",
        category_bullets()
    )
}

/// Prompt asking for a numbered list, one category per input post.
#[must_use]
pub fn batch_prompt(texts: &[&str]) -> String {
    let numbered = texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}. {text}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Classify the following {} social media posts into exactly ONE of these categories:\n\
         {}\n\n\
         Respond with a simple numbered list in the format:\n\
         1. [Category Name]\n\
         2. [Category Name]\n\
         ... (up to {BATCH_SIZE})\n\n\
         POSTS:\n{numbered}",
        texts.len(),
        category_bullets()
    )
}

/// Match a raw generator reply against the taxonomy.
#[must_use]
pub fn match_category(reply: &str) -> Option<Category> {
    let reply = reply.to_lowercase();

    if let Some(cat) = Category::ALL
        .into_iter()
        .find(|c| reply.contains(&c.name().to_lowercase()))
    {
        return Some(cat);
    }

    Category::ALL.into_iter().find(|c| {
        c.name()
            .to_lowercase()
            .split_whitespace()
            .filter(|w| *w != "&" && *w != "and")
            .any(|w| reply.contains(w))
    })
}

/// Classify one post with one generator call.
pub async fn classify_one(text: &str, generator: &dyn TextGenerator) -> Option<Category> {
    let reply = generator.generate(&single_prompt(text)).await;
    match_category(reply.trim())
}

/// Classify up to [`BATCH_SIZE`] posts with one generator call.
///
/// The result has one slot per input, in input order. Slots stay `None` when
/// the reply omits the index, numbers out of range, or names no category. A
/// generator that reorders its list misassigns silently; that is accepted.
pub async fn classify_batch(
    texts: &[&str],
    generator: &dyn TextGenerator,
) -> Vec<Option<Category>> {
    if texts.is_empty() {
        return Vec::new();
    }

    let reply = generator.generate(&batch_prompt(texts)).await;
    parse_batch_reply(&reply, texts.len())
}

/// Parse a numbered-list reply into `len` category slots.
#[must_use]
pub fn parse_batch_reply(reply: &str, len: usize) -> Vec<Option<Category>> {
    let mut results = vec![None; len];
    for line in reply.lines() {
        let Some(caps) = NUMBERED_LINE.captures(line.trim()) else {
            continue;
        };
        let Ok(index) = caps[1].parse::<usize>() else {
            continue;
        };
        if index == 0 || index > len {
            tracing::debug!(index, len, "batch reply index out of range");
            continue;
        }
        results[index - 1] = match_category(caps[2].trim());
    }
    results
}

/// Classify every post in batches of [`BATCH_SIZE`], returning annotated copies.
///
/// Posts the generator could not place keep `category = None`.
pub async fn classify_all(posts: Vec<Post>, generator: &dyn TextGenerator) -> Vec<Post> {
    let total_batches = posts.len().div_ceil(BATCH_SIZE);
    let mut classified = Vec::with_capacity(posts.len());
    let mut remaining = posts.into_iter().peekable();
    let mut batch_no = 0usize;

    while remaining.peek().is_some() {
        batch_no += 1;
        let batch: Vec<Post> = remaining.by_ref().take(BATCH_SIZE).collect();
        let texts: Vec<&str> = batch.iter().map(|p| p.text.as_str()).collect();

        tracing::info!(batch = batch_no, total_batches, "classifying batch");
        let categories = classify_batch(&texts, generator).await;

        classified.extend(
            batch
                .into_iter()
                .zip(categories)
                .map(|(post, category)| post.with_category(category)),
        );
    }

    classified
}
