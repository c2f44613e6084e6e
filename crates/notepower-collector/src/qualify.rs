//! Creator profile fetch and follower-band filter.

use notepower_client::{FailureKind, NoteClient};
use notepower_core::{CollectConfig, Creator, FollowerBand};

use crate::pace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualification {
    Accepted(Creator),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    FetchFailed(FailureKind),
    BelowBand { followers: u64 },
    AboveBand { followers: u64 },
}

/// Applies the follower band to an already fetched creator.
#[must_use]
pub fn check_band(band: FollowerBand, creator: Creator) -> Qualification {
    let followers = creator.follower_count;
    if followers < band.min {
        Qualification::Rejected(RejectReason::BelowBand { followers })
    } else if followers > band.max {
        Qualification::Rejected(RejectReason::AboveBand { followers })
    } else {
        Qualification::Accepted(creator)
    }
}

/// Fetches `creator_id`'s profile and checks it against the follower band.
pub async fn qualify(
    client: &NoteClient,
    config: &CollectConfig,
    creator_id: &str,
) -> Qualification {
    pace(config).await;
    let creator = match client.get_creator(creator_id).await {
        Ok(profile) => profile.into_creator(creator_id),
        Err(e) => {
            tracing::warn!(
                creator = %creator_id,
                kind = ?e.kind(),
                error = %e,
                "creator profile fetch failed"
            );
            return Qualification::Rejected(RejectReason::FetchFailed(e.kind()));
        }
    };

    let outcome = check_band(config.followers, creator);
    if let Qualification::Rejected(reason) = &outcome {
        tracing::debug!(creator = %creator_id, ?reason, "creator outside follower band");
    }
    outcome
}
