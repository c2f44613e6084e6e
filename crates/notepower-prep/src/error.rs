use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("invalid exclusion pattern set [{patterns}]: {source}")]
    InvalidPattern {
        patterns: String,
        #[source]
        source: regex::Error,
    },
}
