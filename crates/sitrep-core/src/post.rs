use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::engagement_score;
use crate::taxonomy::{self, Category};

/// A single ranked social-media post.
///
/// This is also the JSON record exchanged with fetchers and storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    /// Source platform tag: `x`, `bluesky`, `mastodon`, or empty when unknown.
    #[serde(default)]
    pub platform: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author_name: String,
    pub author_username: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub reposts: u64,
    #[serde(default)]
    pub replies: u64,
    pub engagement_score: u64,
    /// Z-score of `engagement_score` within the batch it was normalized with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_score: Option<f64>,
    /// Assigned by a classifier. Unknown labels on input become `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "taxonomy::deserialize_lenient"
    )]
    pub category: Option<Category>,
    #[serde(default)]
    pub url: String,
}

impl Post {
    /// Build a post from raw counts, deriving its engagement score.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        author_username: impl Into<String>,
        text: impl Into<String>,
        likes: u64,
        reposts: u64,
        replies: u64,
    ) -> Self {
        let author_username = author_username.into();
        Self {
            id: id.into(),
            platform: String::new(),
            text: text.into(),
            created_at: None,
            author_name: author_username.clone(),
            author_username,
            likes,
            reposts,
            replies,
            engagement_score: engagement_score(likes, reposts, replies),
            normalized_score: None,
            category: None,
            url: String::new(),
        }
    }

    /// Return a copy of this post carrying `category`.
    #[must_use]
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }
}
