//! note API response types.
//!
//! ## Observed shape
//!
//! Every endpoint wraps its payload in `{"data": ...}`. The client strips the
//! envelope before these types see the body.
//!
//! ### Creator (`/v2/creators/{urlname}`)
//! camelCase keys. `followerCount` and `noteCount` are integers but have been
//! seen as `null` on suspended accounts, so both default to `0`.
//!
//! ### Contents page (`/v2/creators/{urlname}/contents`)
//! `{"contents": [...], "isLastPage": bool, "totalCount": n}`. `isLastPage`
//! is occasionally missing on the final page; absence is treated as `false`
//! and the empty `contents` array ends paging instead.
//!
//! ### Notes
//! `id` is numeric on most endpoints and a string on a few; both are read
//! into a `String`, and a missing or `null` id reads as empty. A list entry
//! that still fails to parse is skipped with a warning so one odd note does
//! not cost the rest of its page. `body` is present on contents listings and absent from
//! search results. `price` is `0` or `null` for free notes.

use notepower_core::Creator;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Creator profile from `GET /v2/creators/{urlname}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfile {
    #[serde(default)]
    pub urlname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub follower_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note_count: u64,
}

impl CreatorProfile {
    /// Converts the wire profile into the domain [`Creator`].
    ///
    /// `requested_id` fills in the handle when the profile omits `urlname`.
    #[must_use]
    pub fn into_creator(self, requested_id: &str) -> Creator {
        let id = if self.urlname.is_empty() {
            requested_id.to_string()
        } else {
            self.urlname
        };
        Creator {
            id,
            nickname: self.nickname,
            follower_count: self.follower_count,
            note_count: self.note_count,
        }
    }
}

/// One page of a creator's published notes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentsPage {
    #[serde(default, deserialize_with = "lenient_notes")]
    pub contents: Vec<NoteContent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_last_page: bool,
}

/// A note as listed by the contents and search endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteContent {
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub like_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment_count: u64,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub publish_at: Option<String>,
    #[serde(default)]
    pub user: Option<NoteUser>,
}

impl NoteContent {
    /// Price in yen, `0` for free notes.
    #[must_use]
    pub fn price_yen(&self) -> u64 {
        self.price.unwrap_or(0)
    }
}

/// Author summary embedded in search results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUser {
    #[serde(default, deserialize_with = "null_as_default")]
    pub urlname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub follower_count: u64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(n)) => n.to_string(),
        Some(RawId::Text(s)) => s,
        None => String::new(),
    })
}

/// Parses each entry of a note list on its own, dropping the ones that do
/// not fit [`NoteContent`].
pub(crate) fn parse_notes(entries: Vec<Value>, context: &str) -> Vec<NoteContent> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(note) => Some(note),
            Err(error) => {
                tracing::warn!(context, index, %error, "skipping unparseable note entry");
                None
            }
        })
        .collect()
}

fn lenient_notes<'de, D>(deserializer: D) -> Result<Vec<NoteContent>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<Value> = null_as_default(deserializer)?;
    Ok(parse_notes(entries, "contents page"))
}
