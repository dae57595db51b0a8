//! `Post` list → digest document.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use sitrep_core::Post;

/// Likes needed to earn the fire marker.
pub const FIRE_THRESHOLD: u64 = 100;

/// Render posts as a daily digest grouped by author.
///
/// Authors are ordered by summed engagement (descending), and each author's
/// posts by their own engagement. Ties keep first-seen order.
#[must_use]
pub fn render_digest(posts: &[Post], generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# 🐦 Daily Summary — {}\n",
        generated_at.format("%A, %B %d %Y")
    );
    let _ = writeln!(
        out,
        "> Generated at **{}** · **{} posts** from the past 24 hours\n",
        generated_at.format("%H:%M UTC"),
        posts.len()
    );
    out.push_str("---\n\n");

    if posts.is_empty() {
        out.push_str("_No posts found in the past 24 hours._");
        return out;
    }

    let authors = group_by_author(posts);

    out.push_str("## 📋 Authors in This Summary\n\n");
    for group in &authors {
        let first = group[0];
        let count = group.len();
        let top_likes = group.iter().map(|p| p.likes).max().unwrap_or(0);
        let _ = writeln!(
            out,
            "- **{}** (@{}){} — {count} post{}",
            first.author_name,
            first.author_username,
            fire(top_likes),
            if count > 1 { "s" } else { "" }
        );
    }
    out.push_str("\n---\n\n");

    for group in &authors {
        render_author_section(&mut out, group);
    }

    out.trim_end_matches('\n').to_owned()
}

fn group_by_author(posts: &[Post]) -> Vec<Vec<&Post>> {
    let mut groups: Vec<Vec<&Post>> = Vec::new();
    for post in posts {
        match groups
            .iter_mut()
            .find(|g| g[0].author_username == post.author_username)
        {
            Some(group) => group.push(post),
            None => groups.push(vec![post]),
        }
    }
    groups.sort_by_key(|g| {
        std::cmp::Reverse(
            g.iter()
                .fold(0u64, |acc, p| acc.saturating_add(p.engagement_score)),
        )
    });
    groups
}

fn render_author_section(out: &mut String, group: &[&Post]) {
    let first = group[0];
    let platform = if first.platform.is_empty() {
        String::new()
    } else {
        format!("[{}] ", first.platform)
    };
    let _ = writeln!(
        out,
        "## {platform}@{} — {}\n",
        first.author_username, first.author_name
    );

    let mut sorted = group.to_vec();
    sorted.sort_by_key(|p| std::cmp::Reverse(p.engagement_score));

    for post in sorted {
        let quoted = post.text.lines().collect::<Vec<_>>().join("\n> ");
        let time = post
            .created_at
            .map_or_else(|| "--:-- UTC".to_owned(), |t| t.format("%H:%M UTC").to_string());
        let _ = writeln!(out, "> {quoted}");
        out.push_str(">\n");
        let _ = writeln!(
            out,
            "> ❤️ {}  🔁 {}  💬 {}{}  ·  🕐 {time}  ·  [View post]({})\n",
            thousands(post.likes),
            thousands(post.reposts),
            thousands(post.replies),
            fire(post.likes),
            post.url
        );
    }

    out.push_str("---\n\n");
}

fn fire(likes: u64) -> &'static str {
    if likes >= FIRE_THRESHOLD {
        " 🔥"
    } else {
        ""
    }
}

/// `1234567` → `1,234,567`.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
