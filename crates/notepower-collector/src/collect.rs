//! Per-creator article collection.

use notepower_client::{NoteClient, NoteContent};
use notepower_core::types::{article_url, body_preview};
use notepower_core::{compute_scores, ArticleRecord, CollectConfig, Creator};
use notepower_store::RecordStore;

use crate::error::CollectError;
use crate::pace;

/// Why an article was not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither a key nor an id to dedup or link by.
    Unidentified,
    Duplicate,
    LowLikes,
    Unpaid,
    BelowThreshold,
}

/// Counters for one creator, or summed over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub stored: u64,
    pub unidentified: u64,
    pub duplicate: u64,
    pub low_likes: u64,
    pub unpaid: u64,
    pub below_threshold: u64,
    pub pages_fetched: u64,
    pub failed_pages: u64,
}

impl CollectStats {
    pub fn skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Unidentified => self.unidentified += 1,
            SkipReason::Duplicate => self.duplicate += 1,
            SkipReason::LowLikes => self.low_likes += 1,
            SkipReason::Unpaid => self.unpaid += 1,
            SkipReason::BelowThreshold => self.below_threshold += 1,
        }
    }

    pub fn add(&mut self, other: &Self) {
        self.stored += other.stored;
        self.unidentified += other.unidentified;
        self.duplicate += other.duplicate;
        self.low_likes += other.low_likes;
        self.unpaid += other.unpaid;
        self.below_threshold += other.below_threshold;
        self.pages_fetched += other.pages_fetched;
        self.failed_pages += other.failed_pages;
    }
}

/// Category/keyword that led to a creator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub category: String,
    pub keyword: String,
}

/// Scores one listed note and builds the record to store, or says why not.
///
/// A note with neither key nor id is rejected first; `already_stored` is
/// consulted next so known articles cost nothing.
///
/// # Errors
///
/// Returns the [`SkipReason`] for a note that fails a filter.
pub fn evaluate_note<F>(
    note: &NoteContent,
    creator: &Creator,
    config: &CollectConfig,
    provenance: &Provenance,
    already_stored: F,
) -> Result<ArticleRecord, SkipReason>
where
    F: Fn(&str) -> bool,
{
    let dedup_key = if note.key.is_empty() {
        note.id.as_str()
    } else {
        note.key.as_str()
    };
    if dedup_key.is_empty() {
        return Err(SkipReason::Unidentified);
    }
    if already_stored(dedup_key) {
        return Err(SkipReason::Duplicate);
    }
    if note.like_count < config.min_likes {
        return Err(SkipReason::LowLikes);
    }
    let price = note.price_yen();
    if config.paid_only && price == 0 {
        return Err(SkipReason::Unpaid);
    }

    let scores = compute_scores(note.like_count, note.comment_count, creator.follower_count);
    if !config.gate.admits(&scores) {
        return Err(SkipReason::BelowThreshold);
    }

    Ok(ArticleRecord {
        note_id: note.id.clone(),
        key: note.key.clone(),
        title: note.name.clone(),
        body_preview: note.body.as_deref().map(body_preview).unwrap_or_default(),
        user_id: creator.id.clone(),
        user_nickname: creator.nickname.clone(),
        follower_count: creator.follower_count,
        like_count: note.like_count,
        comment_count: note.comment_count,
        price,
        is_paid: price > 0,
        published_at: note.publish_at.clone().unwrap_or_default(),
        url: article_url(&creator.id, &note.key),
        category: provenance.category.clone(),
        keyword: provenance.keyword.clone(),
        scores,
    })
}

/// Pages through `creator`'s notes and appends every qualifying article to
/// `records` as soon as it is scored.
///
/// Stops at the page ceiling, an empty page, the last-page flag, the
/// per-creator cap, or a page fetch failure.
///
/// # Errors
///
/// Returns [`CollectError::Store`] if appending to the record store fails.
pub async fn collect_creator(
    client: &NoteClient,
    config: &CollectConfig,
    records: &mut RecordStore,
    creator: &Creator,
    provenance: &Provenance,
) -> Result<CollectStats, CollectError> {
    let mut stats = CollectStats::default();

    'pages: for page in 1..=config.article_pages {
        pace(config).await;
        let listing = match client.get_creator_contents(&creator.id, page).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(
                    creator = %creator.id,
                    page,
                    kind = ?e.kind(),
                    error = %e,
                    "contents page fetch failed; moving on"
                );
                stats.failed_pages += 1;
                break;
            }
        };
        stats.pages_fetched += 1;

        if listing.contents.is_empty() {
            break;
        }

        for note in &listing.contents {
            match evaluate_note(note, creator, config, provenance, |k| records.contains(k)) {
                Ok(record) => {
                    if records.append(&record)? {
                        stats.stored += 1;
                        tracing::debug!(
                            creator = %creator.id,
                            key = %record.key,
                            power_score = record.scores.power_score,
                            "article stored"
                        );
                    } else {
                        stats.skip(SkipReason::Duplicate);
                    }
                }
                Err(reason) => {
                    tracing::debug!(
                        creator = %creator.id,
                        key = %note.key,
                        ?reason,
                        "article skipped"
                    );
                    stats.skip(reason);
                }
            }

            if usize::try_from(stats.stored).unwrap_or(usize::MAX) >= config.articles_per_creator {
                break 'pages;
            }
        }

        if listing.is_last_page {
            break;
        }
    }

    tracing::info!(
        creator = %creator.id,
        followers = creator.follower_count,
        stored = stats.stored,
        pages = stats.pages_fetched,
        "creator collected"
    );
    Ok(stats)
}
