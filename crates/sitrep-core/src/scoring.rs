//! Engagement scoring shared by every platform.

use crate::post::Post;

/// Cross-platform engagement: `likes * 2 + reposts * 3 + replies`.
///
/// Reshares weigh more than likes, likes more than replies. Changing the
/// weights changes the ranking of every stored post.
#[must_use]
pub fn engagement_score(likes: u64, reposts: u64, replies: u64) -> u64 {
    likes
        .saturating_mul(2)
        .saturating_add(reposts.saturating_mul(3))
        .saturating_add(replies)
}

/// Population z-score of each post's `engagement_score`, in input order.
///
/// Returns `0.0` for every post when the standard deviation is zero, which
/// covers empty, single-post and constant-score inputs.
#[must_use]
pub fn z_scores(posts: &[Post]) -> Vec<f64> {
    if posts.is_empty() {
        return Vec::new();
    }

    #[allow(clippy::cast_precision_loss)]
    let scores: Vec<f64> = posts.iter().map(|p| p.engagement_score as f64).collect();
    #[allow(clippy::cast_precision_loss)]
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return vec![0.0; scores.len()];
    }
    scores.iter().map(|s| (s - mean) / std_dev).collect()
}

/// Annotate posts with their `normalized_score`.
#[must_use]
pub fn with_z_scores(mut posts: Vec<Post>) -> Vec<Post> {
    let normalized = z_scores(&posts);
    for (post, z) in posts.iter_mut().zip(normalized) {
        post.normalized_score = Some(z);
    }
    posts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_score(score: u64) -> Post {
        let mut post = Post::new(score.to_string(), "user", "text", 0, 0, 0);
        post.engagement_score = score;
        post
    }

    #[test]
    fn weights_likes_reposts_replies() {
        assert_eq!(engagement_score(10, 5, 3), 38);
        assert_eq!(engagement_score(1, 0, 0), 2);
        assert_eq!(engagement_score(0, 1, 0), 3);
        assert_eq!(engagement_score(0, 0, 1), 1);
    }

    #[test]
    fn zero_counts_score_zero() {
        assert_eq!(engagement_score(0, 0, 0), 0);
    }

    #[test]
    fn score_saturates_instead_of_overflowing() {
        assert_eq!(engagement_score(u64::MAX, 1, 1), u64::MAX);
    }

    #[test]
    fn z_scores_have_zero_mean() {
        let posts: Vec<Post> = [10, 20, 30, 100].into_iter().map(post_with_score).collect();
        let z = z_scores(&posts);
        let mean: f64 = z.iter().sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-9, "mean was {mean}");
        assert!(z[3] > 0.0 && z[0] < 0.0);
    }

    #[test]
    fn z_scores_have_unit_population_std_dev() {
        let posts: Vec<Post> = [2, 4, 4, 4, 5, 5, 7, 9].into_iter().map(post_with_score).collect();
        let z = z_scores(&posts);
        // mean 5, population std dev 2
        assert!((z[0] + 1.5).abs() < 1e-9);
        assert!((z[7] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn constant_scores_normalize_to_exact_zero() {
        let posts: Vec<Post> = [7, 7, 7].into_iter().map(post_with_score).collect();
        assert_eq!(z_scores(&posts), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn single_post_normalizes_to_zero() {
        assert_eq!(z_scores(&[post_with_score(500)]), vec![0.0]);
    }

    #[test]
    fn empty_set_is_a_no_op() {
        assert!(z_scores(&[]).is_empty());
        assert!(with_z_scores(Vec::new()).is_empty());
    }

    #[test]
    fn with_z_scores_annotates_every_post() {
        let posts = with_z_scores(vec![post_with_score(1), post_with_score(3)]);
        assert_eq!(posts[0].normalized_score, Some(-1.0));
        assert_eq!(posts[1].normalized_score, Some(1.0));
    }
}
