//! Descriptive statistics over the raw record store.

use std::collections::{BTreeMap, HashSet};

use notepower_core::ArticleRecord;
use serde::{Deserialize, Serialize};

/// Creators listed in [`DatasetStats::top_users`].
pub const TOP_USERS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; zero for a single value.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
}

impl Summary {
    /// Summarises `values`, or `None` when empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let std = if sorted.len() > 1 {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };

        Some(Self {
            mean,
            median: quantile(&sorted, 0.5),
            std,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q25: quantile(&sorted, 0.25),
            q75: quantile(&sorted, 0.75),
        })
    }
}

/// Linearly interpolated quantile of a non-empty sorted slice.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScore {
    pub user_id: String,
    pub mean_power_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_records: usize,
    pub unique_users: usize,
    pub power_score: Option<Summary>,
    pub likes: Option<Summary>,
    pub followers: Option<Summary>,
    pub title_length: Option<Summary>,
    /// Creators with the highest mean power score, best first.
    pub top_users: Vec<UserScore>,
}

impl DatasetStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of(records: &[ArticleRecord]) -> Self {
        let power: Vec<f64> = records.iter().map(|r| r.scores.power_score).collect();
        let likes: Vec<f64> = records.iter().map(|r| r.like_count as f64).collect();
        let followers: Vec<f64> = records.iter().map(|r| r.follower_count as f64).collect();
        let lengths: Vec<f64> = records
            .iter()
            .map(|r| r.title.chars().count() as f64)
            .collect();
        let unique_users = records
            .iter()
            .map(|r| r.user_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_records: records.len(),
            unique_users,
            power_score: Summary::of(&power),
            likes: Summary::of(&likes),
            followers: Summary::of(&followers),
            title_length: Summary::of(&lengths),
            top_users: top_users(records, TOP_USERS),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn top_users(records: &[ArticleRecord], limit: usize) -> Vec<UserScore> {
    let mut by_user: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in records {
        let entry = by_user.entry(r.user_id.as_str()).or_default();
        entry.0 += r.scores.power_score;
        entry.1 += 1;
    }
    let mut ranked: Vec<UserScore> = by_user
        .into_iter()
        .map(|(user_id, (sum, n))| UserScore {
            user_id: user_id.to_string(),
            mean_power_score: sum / n as f64,
        })
        .collect();
    ranked.sort_by(|a, b| b.mean_power_score.total_cmp(&a.mean_power_score));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use notepower_core::Scores;

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn summary_of_empty_is_none() {
        assert!(Summary::of(&[]).is_none());
    }

    #[test]
    fn summary_uses_linear_quantiles_and_sample_std() {
        let s = Summary::of(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!(approx(s.mean, 2.5));
        assert!(approx(s.median, 2.5));
        assert!(approx(s.q25, 1.75));
        assert!(approx(s.q75, 3.25));
        assert!(approx(s.min, 1.0));
        assert!(approx(s.max, 4.0));
        // Sample variance of 1..=4 is 5/3.
        assert!(approx(s.std, (5.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn single_value_has_zero_spread() {
        let s = Summary::of(&[7.0]).unwrap();
        assert!(approx(s.std, 0.0));
        assert!(approx(s.q25, 7.0));
    }

    fn record(user: &str, title: &str, power: f64) -> ArticleRecord {
        ArticleRecord {
            note_id: title.to_string(),
            key: title.to_string(),
            title: title.to_string(),
            body_preview: String::new(),
            user_id: user.to_string(),
            user_nickname: String::new(),
            follower_count: 100,
            like_count: 50,
            comment_count: 0,
            price: 0,
            is_paid: false,
            published_at: String::new(),
            url: String::new(),
            category: String::new(),
            keyword: String::new(),
            scores: Scores {
                power_score: power,
                ..Scores::default()
            },
        }
    }

    #[test]
    fn dataset_stats_rank_users_by_mean_power() {
        let records = vec![
            record("a", "あいう", 1.0),
            record("a", "えお", 3.0),
            record("b", "かきくけこ", 5.0),
        ];
        let stats = DatasetStats::of(&records);
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.unique_users, 2);
        assert_eq!(stats.top_users[0].user_id, "b");
        assert!(approx(stats.top_users[1].mean_power_score, 2.0));
        let lengths = stats.title_length.unwrap();
        assert!(approx(lengths.min, 2.0));
        assert!(approx(lengths.max, 5.0));
    }
}
