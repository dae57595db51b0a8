use std::collections::BTreeMap;

use sitrep_core::{Category, Post};

/// Posts grouped by category, iterated in taxonomy order.
///
/// Every group is non-empty and sorted by descending engagement.
pub type CategorySelection = BTreeMap<Category, Vec<Post>>;

/// Group categorized posts and keep the `n` most engaging of each group.
///
/// Uncategorized posts are dropped. Equal scores keep their input order.
#[must_use]
pub fn select_top_per_category(posts: Vec<Post>, n: usize) -> CategorySelection {
    let mut selection = CategorySelection::new();
    if n == 0 {
        return selection;
    }

    for post in posts {
        if let Some(category) = post.category {
            selection.entry(category).or_default().push(post);
        }
    }

    for group in selection.values_mut() {
        group.sort_by_key(|p| std::cmp::Reverse(p.engagement_score));
        group.truncate(n);
    }

    selection
}
