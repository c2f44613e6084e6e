use std::path::PathBuf;

/// Process-wide settings read from `NOTEPOWER_*` environment variables.
///
/// Stages never read this directly; it is converted into immutable
/// per-stage values (see [`crate::CollectConfig`]) at construction time.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub data_dir: PathBuf,
    pub keywords_path: PathBuf,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub request_delay_ms: u64,
    pub max_retries: u32,
    pub rate_limit_backoff_secs: u64,
    pub forbidden_backoff_secs: u64,
    pub error_backoff_secs: u64,
    pub max_creators: usize,
    pub min_followers: u64,
    pub max_followers: u64,
    pub min_likes: u64,
    pub power_threshold: f64,
    pub min_virality: Option<f64>,
    pub search_pages: u32,
    pub search_page_size: u32,
    pub article_pages: u32,
    pub articles_per_creator: usize,
    pub paid_only: bool,
    pub clean_min_likes: u64,
    pub success_threshold: f64,
    pub outlier_threshold: f64,
}

impl AppConfig {
    /// Path of the persisted progress checkpoint.
    #[must_use]
    pub fn progress_path(&self) -> PathBuf {
        self.data_dir.join("progress.json")
    }

    /// Path of the append-only raw article store.
    #[must_use]
    pub fn raw_store_path(&self) -> PathBuf {
        self.data_dir.join("raw_notes.jsonl")
    }

    /// Path of the qualified-creator snapshot.
    #[must_use]
    pub fn qualified_path(&self) -> PathBuf {
        self.data_dir.join("qualified_creators.json")
    }

    #[must_use]
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    #[must_use]
    pub fn augmented_dir(&self) -> PathBuf {
        self.data_dir.join("augmented")
    }
}
