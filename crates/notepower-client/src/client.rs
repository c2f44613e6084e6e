use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::{parse_notes, ContentsPage, CreatorProfile, NoteContent};

/// HTTP client for the note content platform's JSON API.
///
/// Maps 429, 403, and 404 to typed errors and retries the first two (plus
/// network failures and other non-2xx statuses) according to its
/// [`RetryPolicy`]. Responses are unwrapped from their `data` envelope.
pub struct NoteClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl NoteClient {
    /// Creates a client rooted at `base_url` (e.g. `https://note.com/api`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidBaseUrl`] if `base_url` does not parse or cannot
    ///   carry path segments.
    /// - [`ClientError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        retry: RetryPolicy,
    ) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be a base".to_owned(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ja,en-US;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static("https://note.com/"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://note.com"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
            retry,
        })
    }

    /// Fetches a creator profile by handle.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if the creator does not exist (not retried).
    /// - Any transient error left after retries are exhausted.
    pub async fn get_creator(&self, creator_id: &str) -> Result<CreatorProfile, ClientError> {
        let url = self.endpoint(&["v2", "creators", creator_id], &[])?;
        self.fetch_json(url, &format!("creator {creator_id}")).await
    }

    /// Fetches one page (1-based) of a creator's published notes.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_creator`].
    pub async fn get_creator_contents(
        &self,
        creator_id: &str,
        page: u32,
    ) -> Result<ContentsPage, ClientError> {
        let page_str = page.to_string();
        let url = self.endpoint(
            &["v2", "creators", creator_id, "contents"],
            &[("kind", "note"), ("page", &page_str)],
        )?;
        self.fetch_json(url, &format!("contents page {page} of {creator_id}"))
            .await
    }

    /// Searches notes by keyword, returning one page (1-based) of results.
    ///
    /// A payload without a `notes.contents` list yields an empty page rather
    /// than an error. Entries that do not parse are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_creator`].
    pub async fn search_notes(
        &self,
        keyword: &str,
        page: u32,
        size: u32,
        sort: &str,
    ) -> Result<Vec<NoteContent>, ClientError> {
        let url = Self::search_url(&self.base_url, keyword, page, size, sort)?;
        let context = format!("search \"{keyword}\" page {page}");
        let data: Value = self.fetch_json(url, &context).await?;

        let Some(contents) = data
            .get("notes")
            .filter(|notes| notes.is_object())
            .and_then(|notes| notes.get("contents"))
        else {
            return Ok(Vec::new());
        };

        let entries: Vec<Value> = serde_json::from_value(contents.clone())
            .map_err(|source| ClientError::Deserialize {
                context: context.clone(),
                source,
            })?;
        Ok(parse_notes(entries, &context))
    }

    pub(crate) fn search_url(
        base: &Url,
        keyword: &str,
        page: u32,
        size: u32,
        sort: &str,
    ) -> Result<Url, ClientError> {
        let start = page.saturating_sub(1).saturating_mul(size).to_string();
        let size = size.to_string();
        build_url(
            base,
            &["v3", "searches"],
            &[
                ("context", "note"),
                ("q", keyword),
                ("size", &size),
                ("start", &start),
                ("sort", sort),
            ],
        )
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ClientError> {
        build_url(&self.base_url, segments, query)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ClientError> {
        let body = retry_with_backoff(&self.retry, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                let url = url.to_string();

                let err = match status {
                    StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited { url },
                    StatusCode::FORBIDDEN => ClientError::Forbidden { url },
                    StatusCode::NOT_FOUND => ClientError::NotFound { url },
                    s if !s.is_success() => ClientError::UnexpectedStatus {
                        status: s.as_u16(),
                        url,
                    },
                    _ => return Ok(response.text().await?),
                };
                Err(err)
            }
        })
        .await?;

        let value: Value =
            serde_json::from_str(&body).map_err(|source| ClientError::Deserialize {
                context: context.to_owned(),
                source,
            })?;
        serde_json::from_value(unwrap_envelope(value)).map_err(|source| {
            ClientError::Deserialize {
                context: context.to_owned(),
                source,
            }
        })
    }
}

/// Returns the `data` member of an enveloped response, or the body itself
/// when there is no envelope.
pub(crate) fn unwrap_envelope(mut value: Value) -> Value {
    match value.get_mut("data") {
        Some(data) => data.take(),
        None => value,
    }
}

pub(crate) fn build_url(
    base: &Url,
    segments: &[&str],
    query: &[(&str, &str)],
) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidBaseUrl {
            base_url: base.to_string(),
            reason: "URL cannot be a base".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
