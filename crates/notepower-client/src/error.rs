use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {url}")]
    RateLimited { url: String },

    #[error("forbidden: {url}")]
    Forbidden { url: String },

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// How a caller should treat a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No data available right now; the unit may succeed on a later run.
    Transient,
    /// The identifier does not exist; skip it.
    NotFound,
}

impl ClientError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::NotFound { .. } => FailureKind::NotFound,
            ClientError::Http(_)
            | ClientError::Deserialize { .. }
            | ClientError::RateLimited { .. }
            | ClientError::Forbidden { .. }
            | ClientError::UnexpectedStatus { .. }
            | ClientError::InvalidBaseUrl { .. } => FailureKind::Transient,
        }
    }
}
