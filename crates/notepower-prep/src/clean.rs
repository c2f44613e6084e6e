//! Raw record cleaning and per-title analysis.

use std::collections::HashSet;

use notepower_core::ArticleRecord;
use regex::RegexSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::PrepError;
use crate::features::{
    classify_difficulty, extract_features, quality_score, Difficulty, TitleFeatures,
};
use crate::patterns::{detect_hooks, detect_patterns, Hook, TitlePattern};

/// Boilerplate titles excluded before anything else: sitemaps, magazine
/// pages, fixed recurring columns, bare numbers, bracket-only titles, and
/// serial numbering.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    r"(?i)^サイトマップ$",
    r"(?i)^マガジン",
    r"(?i)^おはよう朝ふみ",
    r"^\d+$",
    r"^【.*】$",
    r"^第\d+話",
    r"^#\d+",
];

/// Maximum outlier titles kept in the report.
pub const OUTLIER_SAMPLES: usize = 5;

#[derive(Debug, Clone)]
pub struct CleanConfig {
    exclude: RegexSet,
    pub min_likes: u64,
    pub success_threshold: f64,
    pub outlier_threshold: f64,
}

impl CleanConfig {
    /// # Errors
    ///
    /// Returns [`PrepError::InvalidPattern`] if any exclusion pattern does not
    /// compile.
    pub fn new(
        exclude_patterns: &[&str],
        min_likes: u64,
        success_threshold: f64,
        outlier_threshold: f64,
    ) -> Result<Self, PrepError> {
        let exclude =
            RegexSet::new(exclude_patterns).map_err(|source| PrepError::InvalidPattern {
                patterns: exclude_patterns.join(" | "),
                source,
            })?;
        Ok(Self {
            exclude,
            min_likes,
            success_threshold,
            outlier_threshold,
        })
    }

    /// Default exclusion patterns with the given thresholds.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in patterns; the `Result` mirrors [`Self::new`].
    pub fn with_thresholds(
        min_likes: u64,
        success_threshold: f64,
        outlier_threshold: f64,
    ) -> Result<Self, PrepError> {
        Self::new(
            DEFAULT_EXCLUDE_PATTERNS,
            min_likes,
            success_threshold,
            outlier_threshold,
        )
    }

    #[must_use]
    pub fn is_excluded(&self, title: &str) -> bool {
        self.exclude.is_match(title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalStep {
    pub step: String,
    pub removed: usize,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub threshold: f64,
    pub count: usize,
    pub samples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanReport {
    pub original: usize,
    pub steps: Vec<RemovalStep>,
    pub outliers: Option<OutlierReport>,
    #[serde(rename = "final")]
    pub final_count: usize,
    pub removed_total: usize,
    /// Percentage of input records kept.
    pub retention_rate: f64,
}

fn keep_where<F>(
    records: Vec<ArticleRecord>,
    step: &str,
    steps: &mut Vec<RemovalStep>,
    keep: F,
) -> Vec<ArticleRecord>
where
    F: FnMut(&ArticleRecord) -> bool,
{
    let before = records.len();
    let kept: Vec<ArticleRecord> = records.into_iter().filter(keep).collect();
    steps.push(RemovalStep {
        step: step.to_string(),
        removed: before - kept.len(),
        remaining: kept.len(),
    });
    kept
}

/// Applies the cleaning steps in order: exclusion patterns, like floor,
/// duplicate titles (first occurrence wins). Outliers above the configured
/// power score are reported, not removed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn clean(
    records: Vec<ArticleRecord>,
    config: &CleanConfig,
) -> (Vec<ArticleRecord>, CleanReport) {
    let original = records.len();
    let mut steps = Vec::with_capacity(3);

    let records = keep_where(records, "exclude_patterns", &mut steps, |r| {
        !config.is_excluded(&r.title)
    });
    let records = keep_where(records, "min_likes", &mut steps, |r| {
        r.like_count >= config.min_likes
    });
    let mut seen = HashSet::new();
    let records = keep_where(records, "duplicate_titles", &mut steps, |r| {
        seen.insert(r.title.clone())
    });

    let outlier_titles: Vec<&str> = records
        .iter()
        .filter(|r| r.scores.power_score > config.outlier_threshold)
        .map(|r| r.title.as_str())
        .collect();
    let outliers = (!outlier_titles.is_empty()).then(|| OutlierReport {
        threshold: config.outlier_threshold,
        count: outlier_titles.len(),
        samples: outlier_titles
            .iter()
            .take(OUTLIER_SAMPLES)
            .map(|t| (*t).to_string())
            .collect(),
    });

    let final_count = records.len();
    let retention_rate = if original == 0 {
        0.0
    } else {
        final_count as f64 / original as f64 * 100.0
    };

    tracing::info!(original, kept = final_count, "records cleaned");

    let report = CleanReport {
        original,
        steps,
        outliers,
        final_count,
        removed_total: original - final_count,
        retention_rate,
    };
    (records, report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Success,
    Normal,
}

/// A raw record that survived cleaning, with its title analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub id: String,
    pub title: String,
    pub category: String,
    pub keyword: String,
    pub user_id: String,
    pub user_nickname: String,
    pub power_score: f64,
    pub engagement_rate: f64,
    pub virality_score: f64,
    pub likes: u64,
    pub followers: u64,
    pub label: Label,
    pub features: TitleFeatures,
    pub patterns: Vec<TitlePattern>,
    pub hooks: Vec<Hook>,
    pub difficulty: Difficulty,
    pub quality_score: f64,
}

impl CleanedRecord {
    #[must_use]
    pub fn from_record(record: &ArticleRecord, success_threshold: f64) -> Self {
        let title = record.title.as_str();
        let features = extract_features(title);
        let patterns = detect_patterns(title);
        let hooks = detect_hooks(title);
        let quality = quality_score(&features, &patterns, &hooks);
        let power_score = record.scores.power_score;
        let difficulty = classify_difficulty(patterns.len(), features.length, power_score);
        let label = if power_score >= success_threshold {
            Label::Success
        } else {
            Label::Normal
        };

        Self {
            id: record_id(&record.user_id, title),
            title: title.to_string(),
            category: record.category.clone(),
            keyword: record.keyword.clone(),
            user_id: record.user_id.clone(),
            user_nickname: record.user_nickname.clone(),
            power_score,
            engagement_rate: record.scores.engagement_rate,
            virality_score: record.scores.virality_score,
            likes: record.like_count,
            followers: record.follower_count,
            label,
            features,
            patterns,
            hooks,
            difficulty,
            quality_score: quality,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.label == Label::Success
    }
}

const RECORD_ID_CHARS: usize = 16;

/// Stable id: first 16 hex digits of SHA-256 over creator id and title.
#[must_use]
pub fn record_id(user_id: &str, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(title.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(RECORD_ID_CHARS);
    hex
}

#[cfg(test)]
#[path = "clean_test.rs"]
mod tests;
