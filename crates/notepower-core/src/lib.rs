//! Shared domain types, scoring, and configuration for the notepower pipeline.

pub mod app_config;
pub mod config;
pub mod keywords;
pub mod policy;
pub mod scoring;
pub mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use keywords::{load_keywords, KeywordCatalog, KeywordCategory, KeywordEntry};
pub use policy::{CollectConfig, FollowerBand, ScoreGate};
pub use scoring::compute_scores;
pub use types::{ArticleRecord, Creator, Scores};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read keywords file {path}: {source}")]
    KeywordsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse keywords file: {0}")]
    KeywordsFileParse(#[from] serde_yaml::Error),

    #[error("keyword catalogue validation failed: {0}")]
    Validation(String),
}
