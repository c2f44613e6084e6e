//! Resumable checkpoint for the collection pipeline.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::atomic::{read_json, write_json_atomic};
use crate::error::StoreError;

/// Persisted discovery/collection state.
///
/// `collected_users` is always a subset of `discovered_users`; the mutators
/// below maintain that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub completed_keywords: BTreeSet<String>,
    #[serde(default)]
    pub discovered_users: BTreeSet<String>,
    #[serde(default)]
    pub collected_users: BTreeSet<String>,
    #[serde(default)]
    pub total_notes: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// First `category:keyword` label that surfaced each creator.
    #[serde(default)]
    pub discovered_via: BTreeMap<String, String>,
}

impl ProgressState {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            started_at: Some(now),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_keyword_done(&self, label: &str) -> bool {
        self.completed_keywords.contains(label)
    }

    pub fn mark_keyword_done(&mut self, label: &str) {
        self.completed_keywords.insert(label.to_string());
    }

    /// Records that `creator_id` was found via `label`. Returns `true` if the
    /// creator was not known before.
    pub fn record_discovery(&mut self, creator_id: &str, label: &str) -> bool {
        self.discovered_via
            .entry(creator_id.to_string())
            .or_insert_with(|| label.to_string());
        self.discovered_users.insert(creator_id.to_string())
    }

    #[must_use]
    pub fn is_collected(&self, creator_id: &str) -> bool {
        self.collected_users.contains(creator_id)
    }

    /// Discovered creators not yet collected, in stable order.
    #[must_use]
    pub fn pending_creators(&self) -> Vec<String> {
        self.discovered_users
            .difference(&self.collected_users)
            .cloned()
            .collect()
    }

    /// Marks `creator_id` collected and adds `notes` to the running total.
    pub fn mark_collected(&mut self, creator_id: &str, notes: u64) {
        self.discovered_users.insert(creator_id.to_string());
        self.collected_users.insert(creator_id.to_string());
        self.total_notes += notes;
        self.total_users = self.collected_users.len() as u64;
    }

    /// The label recorded for `creator_id`, split into category and keyword.
    #[must_use]
    pub fn provenance(&self, creator_id: &str) -> (String, String) {
        self.discovered_via
            .get(creator_id)
            .and_then(|label| label.split_once(':'))
            .map(|(c, k)| (c.to_string(), k.to_string()))
            .unwrap_or_default()
    }
}

/// File-backed [`ProgressState`] with atomic save.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved state, or a fresh one stamped `now` if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    /// A corrupt checkpoint is not silently discarded.
    pub fn load(&self, now: DateTime<Utc>) -> Result<ProgressState, StoreError> {
        if !self.path.exists() {
            return Ok(ProgressState::new(now));
        }
        let mut state: ProgressState = read_json(&self.path)?;
        if state.started_at.is_none() {
            state.started_at = Some(now);
        }
        Ok(state)
    }

    /// Stamps `last_updated` and writes the state atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on any serialization or file failure.
    pub fn save(&self, state: &mut ProgressState, now: DateTime<Utc>) -> Result<(), StoreError> {
        state.last_updated = Some(now);
        write_json_atomic(&self.path, state)?;
        tracing::debug!(
            path = %self.path.display(),
            completed_keywords = state.completed_keywords.len(),
            discovered = state.discovered_users.len(),
            collected = state.collected_users.len(),
            "progress saved"
        );
        Ok(())
    }

    /// Deletes the saved state so the next run starts from zero.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be removed.
    pub fn reset(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}
