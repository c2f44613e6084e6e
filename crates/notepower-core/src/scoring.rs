//! Engagement-efficiency scoring.
//!
//! All three scores share one denominator rule: when the creator has zero
//! followers the numerator is used unchanged, so a score is always defined.

use crate::types::Scores;

/// Weight applied to comments in [`Scores::engagement_rate`].
pub const COMMENT_WEIGHT: f64 = 3.0;

/// Computes power score, engagement rate, and virality score.
///
/// - `power_score = likes / F`
/// - `engagement_rate = (likes + 3 × comments) / F`
/// - `virality_score = likes^1.5 / F^0.5`
///
/// With `F = 0` each denominator degrades to `1`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_scores(likes: u64, comments: u64, followers: u64) -> Scores {
    let likes = likes as f64;
    let comments = comments as f64;
    let engagement = likes + COMMENT_WEIGHT * comments;
    let viral = likes.powf(1.5);

    if followers == 0 {
        return Scores {
            power_score: likes,
            engagement_rate: engagement,
            virality_score: viral,
        };
    }

    let followers = followers as f64;
    Scores {
        power_score: likes / followers,
        engagement_rate: engagement / followers,
        virality_score: viral / followers.sqrt(),
    }
}
