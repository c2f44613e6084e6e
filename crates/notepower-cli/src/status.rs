//! `status` command: reports progress and store contents without touching the
//! network.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use notepower_core::{AppConfig, ArticleRecord};
use notepower_store::{read_qualified, read_records, ProgressState, ProgressStore};

/// Counts derived from the raw record store.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct StoreCounts {
    pub records: usize,
    pub creators: usize,
    pub paid: usize,
    pub by_category: BTreeMap<String, usize>,
}

pub(crate) fn store_counts(records: &[ArticleRecord]) -> StoreCounts {
    let mut by_category = BTreeMap::new();
    for r in records {
        let category = if r.category.is_empty() {
            "(none)".to_string()
        } else {
            r.category.clone()
        };
        *by_category.entry(category).or_insert(0) += 1;
    }
    StoreCounts {
        records: records.len(),
        creators: records
            .iter()
            .map(|r| r.user_id.as_str())
            .collect::<HashSet<_>>()
            .len(),
        paid: records.iter().filter(|r| r.is_paid).count(),
        by_category,
    }
}

/// Prints the checkpoint and store summary.
///
/// # Errors
///
/// Returns an error if an existing checkpoint, record store, or qualified
/// snapshot cannot be read.
pub(crate) fn run_status(config: &AppConfig) -> anyhow::Result<()> {
    let progress = ProgressStore::new(config.progress_path());
    let has_checkpoint = progress.path().exists();
    let state = progress.load(Utc::now())?;

    let raw_path = config.raw_store_path();
    let records = if raw_path.exists() {
        read_records(&raw_path)?
    } else {
        Vec::new()
    };
    let qualified = read_qualified(&config.qualified_path())?;

    if has_checkpoint {
        print_progress(&state);
    } else {
        println!("no checkpoint at {}", progress.path().display());
    }

    let counts = store_counts(&records);
    println!(
        "record store {}: {} records from {} creators ({} paid)",
        raw_path.display(),
        counts.records,
        counts.creators,
        counts.paid
    );
    for (category, n) in &counts.by_category {
        println!("  {category}: {n}");
    }
    println!("qualified creators snapshot: {}", qualified.len());
    Ok(())
}

fn print_progress(state: &ProgressState) {
    let fmt_time = |t: Option<chrono::DateTime<Utc>>| {
        t.map_or_else(|| "-".to_string(), |t| t.to_rfc3339())
    };
    println!("started:      {}", fmt_time(state.started_at));
    println!("last updated: {}", fmt_time(state.last_updated));
    println!("keywords done: {}", state.completed_keywords.len());
    println!(
        "creators: {} discovered, {} collected, {} pending",
        state.discovered_users.len(),
        state.collected_users.len(),
        state.pending_creators().len()
    );
    println!("articles stored by collected creators: {}", state.total_notes);
}
