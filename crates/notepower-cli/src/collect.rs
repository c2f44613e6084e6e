//! `collect` command: keyword discovery, creator qualification, and article
//! collection with resume and interrupt support.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use notepower_client::{NoteClient, RetryPolicy};
use notepower_collector::{Collector, RunSummary};
use notepower_core::{load_keywords, AppConfig, CollectConfig, KeywordEntry};
use notepower_store::{ProgressState, ProgressStore, RecordStore};

/// Exit status used when a second interrupt aborts the process.
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Default)]
pub(crate) struct CollectOptions {
    pub fresh: bool,
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub max_creators: Option<usize>,
    pub max_pages: Option<u32>,
    pub dry_run: bool,
}

/// Applies command-line overrides on top of the configured collection policy.
pub(crate) fn collect_config(config: &AppConfig, options: &CollectOptions) -> CollectConfig {
    let mut collect = CollectConfig::from_app_config(config);
    if let Some(max) = options.max_creators {
        collect.max_creators = max;
    }
    if let Some(pages) = options.max_pages {
        collect.search_pages = pages;
    }
    collect
}

pub(crate) fn retry_policy(config: &AppConfig) -> RetryPolicy {
    RetryPolicy::from_secs(
        config.max_retries,
        config.rate_limit_backoff_secs,
        config.forbidden_backoff_secs,
        config.error_backoff_secs,
    )
}

/// Resolves the keyword filters against the catalogue.
///
/// # Errors
///
/// Returns an error if the catalogue cannot be loaded or the filters match
/// nothing.
pub(crate) fn select_keywords(
    config: &AppConfig,
    options: &CollectOptions,
) -> anyhow::Result<Vec<KeywordEntry>> {
    let catalog = load_keywords(&config.keywords_path)?;
    let entries = catalog.entries(options.category.as_deref(), options.keyword.as_deref());
    if entries.is_empty() {
        anyhow::bail!(
            "no keywords match category={} keyword={}",
            options.category.as_deref().unwrap_or("*"),
            options.keyword.as_deref().unwrap_or("*")
        );
    }
    Ok(entries)
}

/// Sets the returned flag on the first Ctrl-C so the run stops at the next
/// keyword or creator boundary. A second Ctrl-C exits immediately.
fn install_interrupt_handler() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("interrupt received; finishing the current unit (Ctrl-C again to abort)");
        flag.store(true, Ordering::SeqCst);
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("second interrupt; aborting");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });
    cancel
}

/// Runs (or previews) a collection pass.
///
/// # Errors
///
/// Returns an error if configuration, the keyword catalogue, the progress
/// checkpoint, or the record store cannot be read or written. Per-keyword and
/// per-creator network failures are logged and skipped.
pub(crate) async fn run_collect(
    config: &AppConfig,
    options: &CollectOptions,
) -> anyhow::Result<()> {
    let keywords = select_keywords(config, options)?;
    let collect = collect_config(config, options);
    let progress = ProgressStore::new(config.progress_path());

    if options.fresh && !options.dry_run {
        progress.reset()?;
        println!("progress reset; discovery starts over (stored records are kept)");
    }

    if options.dry_run {
        let state = if options.fresh {
            ProgressState::new(Utc::now())
        } else {
            progress.load(Utc::now())?
        };
        print_dry_run(&keywords, &state, &collect);
        return Ok(());
    }

    let client = NoteClient::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
        retry_policy(config),
    )?;
    let mut records = RecordStore::open(config.raw_store_path())?;
    let cancel = install_interrupt_handler();

    let summary = Collector::new(
        &client,
        &collect,
        &progress,
        &mut records,
        config.qualified_path(),
    )
    .with_cancel_flag(cancel)
    .run(&keywords)
    .await?;

    print_summary(&summary, records.len());
    Ok(())
}

fn print_dry_run(keywords: &[KeywordEntry], state: &ProgressState, collect: &CollectConfig) {
    let pending: Vec<String> = keywords
        .iter()
        .map(KeywordEntry::label)
        .filter(|label| !state.is_keyword_done(label))
        .collect();
    let remaining_slots = collect
        .max_creators
        .saturating_sub(state.collected_users.len());

    println!(
        "dry-run: would search {} of {} keywords ({} pages each): [{}]",
        pending.len(),
        keywords.len(),
        collect.search_pages,
        pending.join(", ")
    );
    println!(
        "dry-run: {} creators already discovered and pending; {} of {} creator slots left",
        state.pending_creators().len(),
        remaining_slots,
        collect.max_creators
    );
    println!(
        "dry-run: followers {}..={}, min likes {}, power >= {}",
        collect.followers.min,
        collect.followers.max,
        collect.min_likes,
        collect.gate.min_power_score
    );
}

fn print_summary(summary: &RunSummary, stored_total: usize) {
    let articles = &summary.articles;
    println!(
        "keywords: {} searched, {} already done, {} incomplete",
        summary.keywords_searched, summary.keywords_skipped, summary.keywords_incomplete
    );
    println!(
        "creators: {} new, {} qualified, {} rejected, {} collected",
        summary.creators_discovered,
        summary.creators_qualified,
        summary.creators_rejected,
        summary.creators_collected
    );
    println!(
        "articles: {} stored ({} pages, {} failed pages)",
        articles.stored, articles.pages_fetched, articles.failed_pages
    );
    println!(
        "skipped: {} duplicate, {} low likes, {} unpaid, {} below threshold, {} unidentified",
        articles.duplicate,
        articles.low_likes,
        articles.unpaid,
        articles.below_threshold,
        articles.unidentified
    );
    println!("record store: {stored_total} records");
    if summary.cap_reached {
        println!("creator cap reached");
    }
    if summary.interrupted {
        println!("interrupted; rerun the same command to resume");
    }
}
