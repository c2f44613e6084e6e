use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_dir, PathBuf::from("./data"));
    assert_eq!(cfg.keywords_path, PathBuf::from("./config/keywords.yaml"));
    assert_eq!(cfg.api_base_url, "https://note.com/api");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.request_delay_ms, 1500);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.rate_limit_backoff_secs, 60);
    assert_eq!(cfg.forbidden_backoff_secs, 10);
    assert_eq!(cfg.error_backoff_secs, 5);
    assert_eq!(cfg.max_creators, 300);
    assert_eq!(cfg.min_followers, 0);
    assert_eq!(cfg.max_followers, 2000);
    assert_eq!(cfg.min_likes, 30);
    assert!((cfg.power_threshold - 0.8).abs() < f64::EPSILON);
    assert!(cfg.min_virality.is_none());
    assert_eq!(cfg.search_pages, 5);
    assert_eq!(cfg.search_page_size, 20);
    assert_eq!(cfg.article_pages, 5);
    assert_eq!(cfg.articles_per_creator, 50);
    assert!(!cfg.paid_only);
    assert_eq!(cfg.clean_min_likes, 10);
    assert!((cfg.success_threshold - 1.0).abs() < f64::EPSILON);
    assert!((cfg.outlier_threshold - 10.0).abs() < f64::EPSILON);
}

#[test]
fn derived_paths_live_under_data_dir() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_DATA_DIR", "/tmp/np");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.progress_path(), PathBuf::from("/tmp/np/progress.json"));
    assert_eq!(cfg.raw_store_path(), PathBuf::from("/tmp/np/raw_notes.jsonl"));
    assert_eq!(cfg.processed_dir(), PathBuf::from("/tmp/np/processed"));
}

#[test]
fn max_followers_override() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_MAX_FOLLOWERS", "1000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_followers, 1000);
}

#[test]
fn max_followers_invalid() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_MAX_FOLLOWERS", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NOTEPOWER_MAX_FOLLOWERS"),
        "expected InvalidEnvVar(NOTEPOWER_MAX_FOLLOWERS), got: {result:?}"
    );
}

#[test]
fn power_threshold_accepts_fraction() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_POWER_THRESHOLD", "0.5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.power_threshold - 0.5).abs() < f64::EPSILON);
}

#[test]
fn min_virality_parsed_when_present() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_MIN_VIRALITY", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.min_virality, Some(50.0));
}

#[test]
fn min_virality_blank_is_none() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_MIN_VIRALITY", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.min_virality.is_none());
}

#[test]
fn min_virality_invalid() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_MIN_VIRALITY", "high");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NOTEPOWER_MIN_VIRALITY"),
        "expected InvalidEnvVar(NOTEPOWER_MIN_VIRALITY), got: {result:?}"
    );
}

#[test]
fn paid_only_override() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_PAID_ONLY", "true");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.paid_only);
}

#[test]
fn paid_only_invalid() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_PAID_ONLY", "yes please");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NOTEPOWER_PAID_ONLY"),
        "expected InvalidEnvVar(NOTEPOWER_PAID_ONLY), got: {result:?}"
    );
}

#[test]
fn follower_band_must_be_ordered() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_MIN_FOLLOWERS", "500");
    map.insert("NOTEPOWER_MAX_FOLLOWERS", "100");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NOTEPOWER_MIN_FOLLOWERS"),
        "expected InvalidEnvVar(NOTEPOWER_MIN_FOLLOWERS), got: {result:?}"
    );
}

#[test]
fn request_delay_override() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_REQUEST_DELAY_MS", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_delay_ms, 250);
}

#[test]
fn max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("NOTEPOWER_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NOTEPOWER_MAX_RETRIES"),
        "expected InvalidEnvVar(NOTEPOWER_MAX_RETRIES), got: {result:?}"
    );
}
