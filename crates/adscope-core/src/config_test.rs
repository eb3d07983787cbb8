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
fn defaults_apply_with_empty_env() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "https://api.antelopeinc.com/chatbots/");
    assert_eq!(cfg.analyzer_path, "adsStrategyAnalyzer_testing");
    assert_eq!(cfg.validate_path, "validate");
    assert_eq!(cfg.library_id, 999);
    assert_eq!(cfg.page_origin, "http://localhost:5173");
    assert_eq!(cfg.request_timeout_secs, None);
    assert_eq!(cfg.log_level, "warn");
    assert_eq!(cfg.top_tier, "Superb");
}

#[test]
fn overrides_are_read() {
    let mut map = HashMap::new();
    map.insert("ADSCOPE_API_BASE_URL", "http://127.0.0.1:9000");
    map.insert("ADSCOPE_ANALYZER_PATH", "/adsStrategyAnalyzer/");
    map.insert("ADSCOPE_LIBRARY_ID", "12");
    map.insert("ADSCOPE_PAGE_ORIGIN", "https://reports.example.com");
    map.insert("ADSCOPE_REQUEST_TIMEOUT_SECS", "20");
    map.insert("ADSCOPE_TOP_TIER", "Great");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "http://127.0.0.1:9000");
    assert_eq!(cfg.analyzer_path, "adsStrategyAnalyzer");
    assert_eq!(cfg.library_id, 12);
    assert_eq!(cfg.page_origin, "https://reports.example.com");
    assert_eq!(cfg.request_timeout_secs, Some(20));
    assert_eq!(cfg.top_tier, "Great");
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let mut map = HashMap::new();
    map.insert("ADSCOPE_LIBRARY_ID", "  ");
    map.insert("ADSCOPE_REQUEST_TIMEOUT_SECS", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.library_id, 999);
    assert_eq!(cfg.request_timeout_secs, None);
}

#[test]
fn invalid_library_id_is_rejected() {
    let mut map = HashMap::new();
    map.insert("ADSCOPE_LIBRARY_ID", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOPE_LIBRARY_ID"),
        "expected InvalidEnvVar(ADSCOPE_LIBRARY_ID), got: {result:?}"
    );
}

#[test]
fn zero_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("ADSCOPE_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOPE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ADSCOPE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn relative_base_url_is_rejected() {
    let mut map = HashMap::new();
    map.insert("ADSCOPE_API_BASE_URL", "api.example.com/chatbots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOPE_API_BASE_URL"),
        "expected InvalidEnvVar(ADSCOPE_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn origin_without_host_is_rejected() {
    let mut map = HashMap::new();
    map.insert("ADSCOPE_PAGE_ORIGIN", "https://");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOPE_PAGE_ORIGIN"),
        "expected InvalidEnvVar(ADSCOPE_PAGE_ORIGIN), got: {result:?}"
    );
}

#[test]
fn slash_only_path_is_rejected() {
    let mut map = HashMap::new();
    map.insert("ADSCOPE_VALIDATE_PATH", "/");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOPE_VALIDATE_PATH"),
        "expected InvalidEnvVar(ADSCOPE_VALIDATE_PATH), got: {result:?}"
    );
}
