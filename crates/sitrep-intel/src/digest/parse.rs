//! Digest → `Post` extraction.
//!
//! The scanner is line-oriented and tolerant: anything that is not an author
//! header or a quoted post line resets the current block, so stray prose
//! between posts never leaks into post text.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use sha2::{Digest, Sha256};
use sitrep_core::Post;

pub(crate) static AUTHOR_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## (?:\[([^\]]*)\] )?@(\S+)(?: — (.+))?").expect("valid author header regex")
});

static ENGAGEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"❤\x{FE0F}?\s*([0-9][0-9,]*)").expect("valid engagement regex"));

static REPOSTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"🔁\s*([0-9][0-9,]*)").expect("valid repost count regex"));

static REPLIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"💬\s*([0-9][0-9,]*)").expect("valid reply count regex"));

static VIEW_POST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[View post\]\(([^)\s]*)\)").expect("valid view-post regex"));

#[derive(Default)]
struct Author {
    username: String,
    name: String,
    platform: String,
}

/// Extract posts from a digest document, in encounter order.
///
/// Text is the quoted lines of one block joined by single spaces. A block
/// closes on the line carrying the `❤` engagement count; blocks with no
/// current author or no text are dropped.
#[must_use]
pub fn extract_posts(digest: &str) -> Vec<Post> {
    let mut posts = Vec::new();
    let mut author = Author::default();
    let mut block: Vec<String> = Vec::new();

    for line in digest.lines() {
        if let Some(caps) = AUTHOR_HEADER.captures(line) {
            author = author_from(&caps);
            block.clear();
            continue;
        }

        if !(line.starts_with("> ") || line == ">") {
            block.clear();
            continue;
        }

        block.push(line.trim_start_matches(['>', ' ']).trim().to_owned());

        let Some(eng) = ENGAGEMENT.captures(line) else {
            continue;
        };
        if let Some(post) = close_block(&block, &author, line, &eng) {
            posts.push(post);
        }
        block.clear();
    }

    tracing::debug!(posts = posts.len(), "extracted posts from digest");
    posts
}

fn author_from(caps: &Captures<'_>) -> Author {
    let username = caps[2].to_owned();
    Author {
        name: caps
            .get(3)
            .map_or_else(|| username.clone(), |m| m.as_str().trim().to_owned()),
        platform: caps
            .get(1)
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default(),
        username,
    }
}

fn close_block(
    block: &[String],
    author: &Author,
    stats_line: &str,
    eng: &Captures<'_>,
) -> Option<Post> {
    if author.username.is_empty() {
        return None;
    }

    let body = &block[..block.len().saturating_sub(1)];
    let text = body
        .iter()
        .filter(|l| !l.is_empty() && !l.starts_with('❤'))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_owned();
    if text.is_empty() {
        return None;
    }

    let engagement = parse_count(&eng[1]);
    let reposts = REPOSTS
        .captures(stats_line)
        .map_or(0, |c| parse_count(&c[1]));
    let replies = REPLIES
        .captures(stats_line)
        .map_or(0, |c| parse_count(&c[1]));
    let url = VIEW_POST
        .captures(stats_line)
        .map(|c| c[1].to_owned())
        .unwrap_or_default();

    let mut post = Post::new(
        post_id(&url, &author.username, &text),
        author.username.clone(),
        text,
        engagement,
        reposts,
        replies,
    );
    // The digest already ranked by this number; keep it rather than rescoring.
    post.engagement_score = engagement;
    post.author_name.clone_from(&author.name);
    post.platform.clone_from(&author.platform);
    post.url = url;
    Some(post)
}

/// Parse a count like `1,234`. No digits reads as zero; overflowing values
/// saturate.
fn parse_count(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// First 16 hex chars of SHA-256 over the url, or over `username\ntext` when
/// the digest carries no link.
fn post_id(url: &str, username: &str, text: &str) -> String {
    let hash = if url.is_empty() {
        Sha256::digest(format!("{username}\n{text}").as_bytes())
    } else {
        Sha256::digest(url.as_bytes())
    };
    hash[..8].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# 🐦 Daily Summary — Monday, March 02 2026

> Generated at **08:00 UTC** · **3 posts** from the past 24 hours

---

## [x] @newsdesk — The News Desk

> We are making great progress on trade.
>
> ❤️ 8,554  🔁 1,200  💬 300 🔥  ·  🕐 07:10 UTC  ·  [View post](https://x.com/newsdesk/status/1)

> Second post
> continues here.
>
> ❤️ 12  🔁 0  💬 1  ·  🕐 06:00 UTC  ·  [View post](https://x.com/newsdesk/status/2)

---

## @launchpad

> Rockets are cool
> ❤️ 3,000
";

    #[test]
    fn extracts_all_posts_in_order() {
        let posts = extract_posts(SAMPLE);
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].author_username, "newsdesk");
        assert_eq!(posts[0].text, "We are making great progress on trade.");
        assert_eq!(posts[1].text, "Second post continues here.");
        assert_eq!(posts[2].author_username, "launchpad");
        assert_eq!(posts[2].text, "Rockets are cool");
    }

    #[test]
    fn engagement_count_is_kept_verbatim() {
        let posts = extract_posts(SAMPLE);
        assert_eq!(posts[0].engagement_score, 8554);
        assert_eq!(posts[0].likes, 8554);
        assert_eq!(posts[2].engagement_score, 3000);
    }

    #[test]
    fn recovers_header_and_stats_details() {
        let posts = extract_posts(SAMPLE);
        let first = &posts[0];
        assert_eq!(first.platform, "x");
        assert_eq!(first.author_name, "The News Desk");
        assert_eq!(first.reposts, 1200);
        assert_eq!(first.replies, 300);
        assert_eq!(first.url, "https://x.com/newsdesk/status/1");

        let bare = &posts[2];
        assert_eq!(bare.platform, "");
        assert_eq!(bare.author_name, "launchpad");
        assert_eq!(bare.reposts, 0);
        assert!(bare.url.is_empty());
    }

    #[test]
    fn ids_are_stable_and_distinct() {
        let a = extract_posts(SAMPLE);
        let b = extract_posts(SAMPLE);
        assert_eq!(a[0].id, b[0].id);
        assert_eq!(a[0].id.len(), 16);
        assert_ne!(a[0].id, a[1].id);
        assert_ne!(a[1].id, a[2].id);
    }

    #[test]
    fn headers_without_blocks_yield_nothing() {
        let digest = "## @alice — Alice\n\n## @bob\nsome prose\n";
        assert!(extract_posts(digest).is_empty());
    }

    #[test]
    fn block_without_author_is_dropped() {
        let digest = "> orphan text\n> ❤️ 10\n";
        assert!(extract_posts(digest).is_empty());
    }

    #[test]
    fn interstitial_prose_resets_block() {
        let digest = "## @alice\n> leaked line\nnot quoted\n> real text\n> ❤️ 5\n";
        let posts = extract_posts(digest);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].text, "real text");
    }

    #[test]
    fn block_with_only_stats_is_dropped() {
        let digest = "## @alice\n>\n> ❤️ 5  🔁 1\n";
        assert!(extract_posts(digest).is_empty());
    }

    #[test]
    fn heart_without_variation_selector_matches() {
        let digest = "## @alice\n> plain heart\n> ❤ 42\n";
        let posts = extract_posts(digest);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].engagement_score, 42);
    }

    #[test]
    fn heart_without_digits_is_not_a_stats_line() {
        assert!(extract_posts("## @alice\n> loved it\n> ❤️ , thanks\n").is_empty());

        let digest = "## @alice\n> loved it\n> ❤️ , thanks\n> ❤️ 7\n";
        let posts = extract_posts(digest);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].text, "loved it");
        assert_eq!(posts[0].engagement_score, 7);
    }

    #[test]
    fn non_ascii_digits_are_not_counts() {
        let posts = extract_posts("## @alice\n> hello\n> ❤️ ٣  🔁 ٤\n> ❤️ 9  🔁 ٤\n");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].engagement_score, 9);
        assert_eq!(posts[0].reposts, 0);
    }

    #[test]
    fn counts_parse_with_separators_and_saturate() {
        assert_eq!(parse_count("1,234"), 1234);
        assert_eq!(parse_count(","), 0);
        assert_eq!(parse_count("99,999,999,999,999,999,999,999"), u64::MAX);
    }
}
