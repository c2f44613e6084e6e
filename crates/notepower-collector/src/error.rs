use thiserror::Error;

/// Failures that abort a collection run.
///
/// Per-item fetch failures never surface here; they are logged and the item
/// is skipped. Only persistence failures stop the run.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("store error: {0}")]
    Store(#[from] notepower_store::StoreError),
}
