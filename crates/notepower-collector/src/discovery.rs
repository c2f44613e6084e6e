//! Keyword search → creator handles.

use std::collections::BTreeSet;

use notepower_client::NoteClient;
use notepower_core::{CollectConfig, KeywordEntry};

use crate::pace;

/// Creators found by searching one keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub creators: BTreeSet<String>,
    pub pages_fetched: u32,
    /// A search request failed after retries. The keyword should be searched
    /// again on a later run.
    pub incomplete: bool,
}

/// Searches `entry` for up to `config.search_pages` pages, stopping at the
/// first empty page, and returns every creator handle referenced.
pub async fn discover(
    client: &NoteClient,
    config: &CollectConfig,
    entry: &KeywordEntry,
) -> Discovery {
    let mut found = Discovery::default();

    for page in 1..=config.search_pages {
        pace(config).await;
        let notes = match client
            .search_notes(
                &entry.keyword,
                page,
                config.search_page_size,
                &config.search_sort,
            )
            .await
        {
            Ok(notes) => notes,
            Err(e) => {
                tracing::warn!(
                    keyword = %entry.label(),
                    page,
                    kind = ?e.kind(),
                    error = %e,
                    "search failed; keyword left for a later run"
                );
                found.incomplete = true;
                break;
            }
        };
        found.pages_fetched = page;

        if notes.is_empty() {
            break;
        }

        found.creators.extend(
            notes
                .into_iter()
                .filter_map(|n| n.user)
                .map(|u| u.urlname)
                .filter(|id| !id.is_empty()),
        );
    }

    tracing::info!(
        keyword = %entry.label(),
        pages = found.pages_fetched,
        creators = found.creators.len(),
        "keyword searched"
    );
    found
}
