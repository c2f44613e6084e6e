//! Discovery, qualification, and collection stages plus the resumable run
//! that drives them.
//!
//! Requests are issued one at a time. Every request is preceded by the fixed
//! delay from [`CollectConfig::request_delay`], independent of any retry
//! backoff inside the client.

pub mod collect;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod qualify;

use notepower_core::CollectConfig;

pub use collect::{collect_creator, evaluate_note, CollectStats, Provenance, SkipReason};
pub use discovery::{discover, Discovery};
pub use error::CollectError;
pub use pipeline::{Collector, RunSummary};
pub use qualify::{qualify, Qualification, RejectReason};

pub(crate) async fn pace(config: &CollectConfig) {
    if !config.request_delay.is_zero() {
        tokio::time::sleep(config.request_delay).await;
    }
}
