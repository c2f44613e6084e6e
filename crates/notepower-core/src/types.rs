use serde::{Deserialize, Serialize};

/// Base URL for canonical article links.
pub const ARTICLE_URL_BASE: &str = "https://note.com";

/// Number of body characters kept on each stored record.
pub const BODY_PREVIEW_CHARS: usize = 500;

/// A creator profile as seen during one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Opaque handle (`urlname`) used in every creator endpoint.
    pub id: String,
    pub nickname: String,
    pub follower_count: u64,
    pub note_count: u64,
}

/// Engagement-efficiency scores derived from like/comment counts and the
/// creator's follower count at fetch time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    pub power_score: f64,
    pub engagement_rate: f64,
    pub virality_score: f64,
}

/// One line of the raw record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub note_id: String,
    /// Stable per-article key; also the last segment of the canonical URL.
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub body_preview: String,
    pub user_id: String,
    #[serde(default)]
    pub user_nickname: String,
    pub follower_count: u64,
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(flatten)]
    pub scores: Scores,
}

impl ArticleRecord {
    /// Key used to deduplicate records across runs: the article key when
    /// present, otherwise the numeric id.
    #[must_use]
    pub fn dedup_key(&self) -> &str {
        if self.key.is_empty() {
            &self.note_id
        } else {
            &self.key
        }
    }
}

/// Builds the canonical article URL for `creator_id` and `key`.
#[must_use]
pub fn article_url(creator_id: &str, key: &str) -> String {
    format!("{ARTICLE_URL_BASE}/{creator_id}/n/{key}")
}

/// Truncates `body` to at most [`BODY_PREVIEW_CHARS`] characters.
#[must_use]
pub fn body_preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
