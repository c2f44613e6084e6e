use serde_json::json;

use super::*;

fn base() -> Url {
    Url::parse("https://note.com/api").unwrap()
}

#[test]
fn creator_url_appends_segments() {
    let url = build_url(&base(), &["v2", "creators", "taro"], &[]).unwrap();
    assert_eq!(url.as_str(), "https://note.com/api/v2/creators/taro");
}

#[test]
fn trailing_slash_on_base_is_ignored() {
    let base = Url::parse("https://note.com/api/").unwrap();
    let url = build_url(&base, &["v2", "creators", "taro"], &[]).unwrap();
    assert_eq!(url.as_str(), "https://note.com/api/v2/creators/taro");
}

#[test]
fn creator_id_is_percent_encoded() {
    let url = build_url(&base(), &["v2", "creators", "a/b"], &[]).unwrap();
    assert_eq!(url.as_str(), "https://note.com/api/v2/creators/a%2Fb");
}

#[test]
fn contents_url_carries_kind_and_page() {
    let url = build_url(
        &base(),
        &["v2", "creators", "taro", "contents"],
        &[("kind", "note"), ("page", "3")],
    )
    .unwrap();
    assert_eq!(
        url.as_str(),
        "https://note.com/api/v2/creators/taro/contents?kind=note&page=3"
    );
}

#[test]
fn search_url_offsets_start_by_page() {
    let url = NoteClient::search_url(&base(), "副業", 3, 20, "like_count").unwrap();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(pairs.contains(&("q".to_owned(), "副業".to_owned())));
    assert!(pairs.contains(&("start".to_owned(), "40".to_owned())));
    assert!(pairs.contains(&("size".to_owned(), "20".to_owned())));
    assert!(pairs.contains(&("sort".to_owned(), "like_count".to_owned())));
    assert!(pairs.contains(&("context".to_owned(), "note".to_owned())));
    assert_eq!(url.path(), "/api/v3/searches");
}

#[test]
fn first_search_page_starts_at_zero() {
    let url = NoteClient::search_url(&base(), "x", 1, 20, "like_count").unwrap();
    assert!(url.query_pairs().any(|(k, v)| k == "start" && v == "0"));
}

#[test]
fn envelope_is_unwrapped() {
    let value = unwrap_envelope(json!({"data": {"urlname": "taro"}}));
    assert_eq!(value, json!({"urlname": "taro"}));
}

#[test]
fn body_without_envelope_is_returned_whole() {
    let value = unwrap_envelope(json!({"urlname": "taro"}));
    assert_eq!(value, json!({"urlname": "taro"}));
}

#[test]
fn new_rejects_unparseable_base_url() {
    let result = NoteClient::new("not a url", 30, "test-agent", RetryPolicy::none());
    assert!(matches!(result, Err(ClientError::InvalidBaseUrl { .. })));
}

#[test]
fn new_rejects_non_base_url() {
    let result = NoteClient::new("mailto:someone@example.com", 30, "ua", RetryPolicy::none());
    assert!(matches!(result, Err(ClientError::InvalidBaseUrl { .. })));
}
