//! Immutable stage configuration built once from [`AppConfig`].

use std::time::Duration;

use crate::app_config::AppConfig;
use crate::types::Scores;

/// Inclusive follower-count band a creator must fall in to qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowerBand {
    pub min: u64,
    pub max: u64,
}

impl FollowerBand {
    #[must_use]
    pub fn contains(&self, followers: u64) -> bool {
        (self.min..=self.max).contains(&followers)
    }
}

/// Score thresholds an article must clear to be stored.
///
/// `min_power_score` always applies; `min_virality_score` is an additional
/// bar used by stricter pipeline variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreGate {
    pub min_power_score: f64,
    pub min_virality_score: Option<f64>,
}

impl ScoreGate {
    #[must_use]
    pub fn admits(&self, scores: &Scores) -> bool {
        if scores.power_score < self.min_power_score {
            return false;
        }
        self.min_virality_score
            .is_none_or(|bar| scores.virality_score >= bar)
    }
}

/// Settings shared by discovery, qualification, and collection.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Global cap on creators collected across runs.
    pub max_creators: usize,
    pub followers: FollowerBand,
    pub min_likes: u64,
    pub gate: ScoreGate,
    pub search_pages: u32,
    pub search_page_size: u32,
    pub search_sort: String,
    pub article_pages: u32,
    pub articles_per_creator: usize,
    pub paid_only: bool,
    /// Fixed pause honoured before every request, independent of retry backoff.
    pub request_delay: Duration,
}

impl CollectConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_creators: config.max_creators,
            followers: FollowerBand {
                min: config.min_followers,
                max: config.max_followers,
            },
            min_likes: config.min_likes,
            gate: ScoreGate {
                min_power_score: config.power_threshold,
                min_virality_score: config.min_virality,
            },
            search_pages: config.search_pages,
            search_page_size: config.search_page_size,
            search_sort: "like_count".to_string(),
            article_pages: config.article_pages,
            articles_per_creator: config.articles_per_creator,
            paid_only: config.paid_only,
            request_delay: Duration::from_millis(config.request_delay_ms),
        }
    }
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            max_creators: 300,
            followers: FollowerBand { min: 0, max: 2000 },
            min_likes: 30,
            gate: ScoreGate {
                min_power_score: 0.8,
                min_virality_score: None,
            },
            search_pages: 5,
            search_page_size: 20,
            search_sort: "like_count".to_string(),
            article_pages: 5,
            articles_per_creator: 50,
            paid_only: false,
            request_delay: Duration::from_millis(1500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(power: f64, virality: f64) -> Scores {
        Scores {
            power_score: power,
            engagement_rate: power,
            virality_score: virality,
        }
    }

    #[test]
    fn follower_band_is_inclusive() {
        let band = FollowerBand { min: 10, max: 1000 };
        assert!(band.contains(10));
        assert!(band.contains(1000));
        assert!(!band.contains(9));
        assert!(!band.contains(1001));
    }

    #[test]
    fn gate_rejects_below_power_threshold() {
        let gate = ScoreGate {
            min_power_score: 0.8,
            min_virality_score: None,
        };
        assert!(!gate.admits(&scores(0.79, 1000.0)));
        assert!(gate.admits(&scores(0.8, 0.0)));
    }

    #[test]
    fn gate_applies_optional_virality_bar() {
        let gate = ScoreGate {
            min_power_score: 0.5,
            min_virality_score: Some(50.0),
        };
        assert!(!gate.admits(&scores(1.0, 49.9)));
        assert!(gate.admits(&scores(1.0, 50.0)));
    }
}
