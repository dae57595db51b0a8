//! Per-category prose sections (the map stage).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use sitrep_core::{Category, Post};

use crate::backend::TextGenerator;

/// Body used for a category with no posts.
pub const NO_DEVELOPMENTS: &str = "No significant developments identified.";

/// Ends before `)` or `]`; the surrounding markdown is cleaned up afterwards.
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)\]]+").expect("valid url regex"));

/// A markdown link whose target is gone; the label is kept.
static EMPTY_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(\s*\)").expect("valid empty-link regex"));

static EMPTY_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)").expect("valid empty-parens regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub category: Category,
    pub body: String,
}

impl fmt::Display for Section {
    /// `**{category}**\n{body}\n`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "**{}**", self.category)?;
        writeln!(f, "{}", self.body)
    }
}

fn section_prompt(category: Category, posts: &[Post]) -> String {
    let formatted = posts
        .iter()
        .map(|p| format!("- [{}] {}", p.author_username, p.text))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a strategic intelligence analyst. Write a short thematic section for a \
         Global Situation Report using ONLY the posts below. Use bullet points. Be concise \
         and professional.\n\n\
         CRITICAL RULES:\n\
         1. ONLY use information explicitly stated in the provided posts.\n\
         2. DO NOT hallucinate, guess, infer, or extrapolate.\n\
         3. DO NOT speculate on potential impacts, repercussions, or global consequences.\n\
         4. If a post's relation to the topic is weak, just state the facts of the post \
         without padding.\n\n\
         Section topic: {category}\n\n\
         Posts:\n{formatted}\n\n\
         Write the section now:"
    )
}

/// Write one section from a category's selected posts.
///
/// An empty post list yields the placeholder body without calling the
/// generator.
pub async fn generate_section(
    category: Category,
    posts: &[Post],
    generator: &dyn TextGenerator,
) -> Section {
    if posts.is_empty() {
        return Section {
            category,
            body: NO_DEVELOPMENTS.to_owned(),
        };
    }

    tracing::info!(category = %category, posts = posts.len(), "generating section");
    let reply = generator.generate(&section_prompt(category, posts)).await;
    Section {
        category,
        body: sanitize_section_body(category, &reply),
    }
}

/// Scrub a generated section body.
///
/// Drops a repeated category heading on the first line, then strips URLs and
/// the empty links or parentheses they leave behind.
#[must_use]
pub fn sanitize_section_body(category: Category, reply: &str) -> String {
    let mut text = reply.trim();

    let first_line = text.lines().next().unwrap_or_default();
    if first_line
        .to_lowercase()
        .contains(&category.name().to_lowercase())
    {
        text = text
            .split_once('\n')
            .map_or("", |(_, rest)| rest)
            .trim();
    }

    let text = URL.replace_all(text, "");
    let text = EMPTY_LINK.replace_all(&text, "${1}");
    let text = EMPTY_PARENS.replace_all(&text, "");

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    #[tokio::test]
    async fn empty_posts_use_placeholder_without_calling() {
        let generator = ScriptedGenerator::always("should not be used");
        let section = generate_section(Category::HealthScience, &[], &generator).await;
        assert_eq!(section.body, NO_DEVELOPMENTS);
        assert_eq!(generator.calls(), 0);
        assert_eq!(
            section.to_string(),
            "**Health & Science**\nNo significant developments identified.\n"
        );
    }

    #[tokio::test]
    async fn prompt_lists_posts_with_authors() {
        let generator = ScriptedGenerator::with(|prompt| {
            assert!(prompt.contains("Section topic: Economics & Markets"));
            assert!(prompt.contains("- [alice] rates are up"));
            "- Rates rose.".to_owned()
        });
        let posts = vec![Post::new("1", "alice", "rates are up", 1, 0, 0)];
        let section = generate_section(Category::EconomicsMarkets, &posts, &generator).await;
        assert_eq!(section.body, "- Rates rose.");
        assert_eq!(generator.calls(), 1);
    }

    #[test]
    fn drops_repeated_heading() {
        let body = sanitize_section_body(
            Category::AiTechnology,
            "**AI & Technology**\n- A model shipped.",
        );
        assert_eq!(body, "- A model shipped.");
    }

    #[test]
    fn keeps_first_line_without_heading() {
        let body = sanitize_section_body(Category::AiTechnology, "- A model shipped.\n- Another.");
        assert_eq!(body, "- A model shipped.\n- Another.");
    }

    #[test]
    fn strips_urls_and_leftovers() {
        let body = sanitize_section_body(
            Category::AiTechnology,
            "- Talks resumed (https://example.com/a)\n\
             - See [source](https://x.com/a/status/1)\n\
             - Source: https://x.com/a/status/1",
        );
        assert_eq!(body, "- Talks resumed\n- See source\n- Source:");
    }

    #[test]
    fn strips_padded_parens_and_bare_link_labels() {
        let body = sanitize_section_body(
            Category::GeopoliticsSecurity,
            "- Talks resumed ( https://example.com/a )\n\
             - Read [https://t.co/x](https://t.co/x) now",
        );
        assert_eq!(body, "- Talks resumed\n- Read  now");
    }

    #[test]
    fn heading_only_reply_becomes_empty() {
        assert_eq!(
            sanitize_section_body(Category::SocietyCulture, "Society & Culture"),
            ""
        );
    }
}
