use std::{collections::HashMap, time::Duration};

use nowplaying::{
    config::{Config, DeviceRegistry, SPOTIFY_API_TOKEN_URL, SPOTIFY_API_URL},
    error::ConfigError,
    types::AllowedDevice,
};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::from_lookup(lookup(&[("CLIENT_ID", "id"), ("CLIENT_SECRET", "secret")]))
        .unwrap();

    assert_eq!(cfg.client_id, "id");
    assert_eq!(cfg.client_secret, "secret");
    assert_eq!(cfg.server_address.port(), 5005);
    assert_eq!(cfg.poll_base, Duration::from_secs(4));
    assert_eq!(cfg.poll_jitter_secs, 6);
    assert_eq!(cfg.http_timeout, Duration::from_secs(10));
    assert_eq!(cfg.token_url, SPOTIFY_API_TOKEN_URL);
    assert_eq!(cfg.api_url, SPOTIFY_API_URL);
    assert!(!cfg.on_demand_refresh);
    assert!(!cfg.verbose);
    assert!(cfg.proxy_header.is_none());
    assert!(cfg.refresh_token_file.ends_with("refresh_token"));
}

#[test]
fn test_config_missing_credentials() {
    let err = Config::from_lookup(lookup(&[("CLIENT_ID", "id")])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("CLIENT_SECRET")));

    // Blank values count as missing
    let err = Config::from_lookup(lookup(&[("CLIENT_ID", "  "), ("CLIENT_SECRET", "s")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Missing("CLIENT_ID")));
}

#[test]
fn test_config_overrides() {
    let cfg = Config::from_lookup(lookup(&[
        ("CLIENT_ID", "id"),
        ("CLIENT_SECRET", "secret"),
        ("SERVER_ADDRESS", "127.0.0.1:8080"),
        ("PUBLIC_BASE_URL", "https://api.example.com/"),
        ("PROXY_HEADER", "CF-Connecting-IP"),
        ("ON_DEMAND_REFRESH", "true"),
        ("POLL_BASE_SECS", "5"),
        ("POLL_JITTER_SECS", "0"),
        ("APP_ENV", "development"),
        ("SPOTIFY_API_URL", "http://localhost:9000/v1/"),
    ]))
    .unwrap();

    assert_eq!(cfg.server_address.to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.public_base_url.as_deref(), Some("https://api.example.com"));
    assert_eq!(cfg.proxy_header.as_deref(), Some("CF-Connecting-IP"));
    assert!(cfg.on_demand_refresh);
    assert_eq!(cfg.poll_base, Duration::from_secs(5));
    assert_eq!(cfg.poll_jitter_secs, 0);
    assert!(cfg.verbose);
    assert_eq!(cfg.api_url, "http://localhost:9000/v1");
}

#[test]
fn test_config_invalid_values() {
    let err = Config::from_lookup(lookup(&[
        ("CLIENT_ID", "id"),
        ("CLIENT_SECRET", "secret"),
        ("SERVER_ADDRESS", "not an address"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "SERVER_ADDRESS", .. }));

    let err = Config::from_lookup(lookup(&[
        ("CLIENT_ID", "id"),
        ("CLIENT_SECRET", "secret"),
        ("ON_DEMAND_REFRESH", "maybe"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "ON_DEMAND_REFRESH", .. }));

    let err = Config::from_lookup(lookup(&[
        ("CLIENT_ID", "id"),
        ("CLIENT_SECRET", "secret"),
        ("POLL_BASE_SECS", "-1"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "POLL_BASE_SECS", .. }));
}

#[test]
fn test_device_label() {
    let registry = DeviceRegistry::new(vec![AllowedDevice {
        id: "abc".to_string(),
        prefix: "my".to_string(),
    }]);

    assert_eq!(registry.display_label("abc", "MacBook", "Computer"), "my MacBook");
    assert_eq!(registry.display_label("other", "Phone", "Smartphone"), "a Smartphone");
    assert!(DeviceRegistry::default().is_empty());
}

#[tokio::test]
async fn test_device_registry_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"allowedDevices":[{"id":"abc","prefix":"my"},{"id":"def","prefix":"the office"}]}"#,
    )
    .unwrap();

    let registry = DeviceRegistry::load(&path).await.unwrap().unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.find("def").map(|d| d.prefix.as_str()), Some("the office"));
}

#[tokio::test]
async fn test_device_registry_missing_and_invalid() {
    let dir = tempfile::tempdir().unwrap();

    let missing = DeviceRegistry::load(&dir.path().join("nope.json")).await.unwrap();
    assert!(missing.is_none());

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = DeviceRegistry::load(&path).await.unwrap_err();
    assert!(matches!(err, ConfigError::Devices { .. }));
}
