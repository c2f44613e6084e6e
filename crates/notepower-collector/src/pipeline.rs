//! Resumable two-phase collection run.
//!
//! Phase one searches every keyword not yet marked complete and records the
//! creators it finds. Phase two qualifies and collects every discovered
//! creator not yet marked collected, until the creator cap is reached. The
//! progress checkpoint is saved after each keyword and each creator.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use notepower_client::NoteClient;
use notepower_core::{CollectConfig, Creator, KeywordEntry};
use notepower_store::{read_qualified, write_qualified, ProgressState, ProgressStore, RecordStore};

use crate::collect::{collect_creator, CollectStats, Provenance};
use crate::discovery::discover;
use crate::error::CollectError;
use crate::qualify::{qualify, Qualification};

/// What one run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub keywords_searched: usize,
    pub keywords_skipped: usize,
    pub keywords_incomplete: usize,
    pub creators_discovered: usize,
    pub creators_qualified: usize,
    pub creators_rejected: usize,
    pub creators_collected: usize,
    pub articles: CollectStats,
    pub cap_reached: bool,
    pub interrupted: bool,
}

/// Everything a run reads from and writes to.
pub struct Collector<'a> {
    client: &'a NoteClient,
    config: &'a CollectConfig,
    progress: &'a ProgressStore,
    records: &'a mut RecordStore,
    qualified_path: PathBuf,
    cancel: Arc<AtomicBool>,
}

impl<'a> Collector<'a> {
    #[must_use]
    pub fn new(
        client: &'a NoteClient,
        config: &'a CollectConfig,
        progress: &'a ProgressStore,
        records: &'a mut RecordStore,
        qualified_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            config,
            progress,
            records,
            qualified_path: qualified_path.into(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares a flag that stops the run at the next keyword or creator
    /// boundary once set.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Runs discovery over `keywords` and then collection over every pending
    /// creator.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Store`] if the checkpoint or record store
    /// cannot be read or written. Network failures never abort the run.
    pub async fn run(&mut self, keywords: &[KeywordEntry]) -> Result<RunSummary, CollectError> {
        let mut state = self.progress.load(Utc::now())?;
        let mut summary = RunSummary::default();

        tracing::info!(
            keywords = keywords.len(),
            completed_keywords = state.completed_keywords.len(),
            discovered = state.discovered_users.len(),
            collected = state.collected_users.len(),
            "collection run starting"
        );

        self.discover_all(keywords, &mut state, &mut summary).await?;
        if !summary.interrupted {
            self.collect_pending(&mut state, &mut summary).await?;
        }

        tracing::info!(
            searched = summary.keywords_searched,
            new_creators = summary.creators_discovered,
            collected = summary.creators_collected,
            rejected = summary.creators_rejected,
            stored = summary.articles.stored,
            total_notes = state.total_notes,
            interrupted = summary.interrupted,
            "collection run finished"
        );
        Ok(summary)
    }

    async fn discover_all(
        &self,
        keywords: &[KeywordEntry],
        state: &mut ProgressState,
        summary: &mut RunSummary,
    ) -> Result<(), CollectError> {
        for entry in keywords {
            let label = entry.label();
            if state.is_keyword_done(&label) {
                summary.keywords_skipped += 1;
                continue;
            }
            if self.cancelled() {
                summary.interrupted = true;
                tracing::warn!("interrupted during discovery; progress saved");
                return Ok(());
            }

            let found = discover(self.client, self.config, entry).await;
            summary.keywords_searched += 1;
            for creator_id in &found.creators {
                if state.record_discovery(creator_id, &label) {
                    summary.creators_discovered += 1;
                }
            }
            if found.incomplete {
                summary.keywords_incomplete += 1;
            } else {
                state.mark_keyword_done(&label);
            }
            self.progress.save(state, Utc::now())?;
        }
        Ok(())
    }

    async fn collect_pending(
        &mut self,
        state: &mut ProgressState,
        summary: &mut RunSummary,
    ) -> Result<(), CollectError> {
        let mut qualified = read_qualified(&self.qualified_path)?;

        for creator_id in state.pending_creators() {
            if self.cancelled() {
                summary.interrupted = true;
                tracing::warn!("interrupted during collection; progress saved");
                break;
            }
            if state.collected_users.len() >= self.config.max_creators {
                summary.cap_reached = true;
                tracing::info!(
                    max_creators = self.config.max_creators,
                    "creator cap reached"
                );
                break;
            }

            let creator = match qualify(self.client, self.config, &creator_id).await {
                Qualification::Accepted(creator) => creator,
                Qualification::Rejected(_) => {
                    summary.creators_rejected += 1;
                    continue;
                }
            };
            summary.creators_qualified += 1;
            remember_qualified(&mut qualified, &creator);
            write_qualified(&self.qualified_path, &qualified)?;

            let (category, keyword) = state.provenance(&creator_id);
            let provenance = Provenance { category, keyword };
            let stats = collect_creator(
                self.client,
                self.config,
                self.records,
                &creator,
                &provenance,
            )
            .await?;
            summary.articles.add(&stats);
            summary.creators_collected += 1;

            state.mark_collected(&creator_id, stats.stored);
            self.progress.save(state, Utc::now())?;
        }
        Ok(())
    }
}

fn remember_qualified(qualified: &mut Vec<Creator>, creator: &Creator) {
    match qualified.iter_mut().find(|c| c.id == creator.id) {
        Some(existing) => *existing = creator.clone(),
        None => qualified.push(creator.clone()),
    }
}
