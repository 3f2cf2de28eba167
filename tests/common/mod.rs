#![allow(dead_code)]

use std::{collections::HashMap, net::SocketAddr, path::Path};

use nowplaying::{
    config::{Config, DeviceRegistry},
    context::{AppContext, SharedContext},
    management::{AdminSession, TokenManager},
    server,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";

/// Configuration pointing every Spotify endpoint at `mock_uri`.
pub fn test_config(mock_uri: &str, token_file: &Path, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("CLIENT_ID".to_string(), CLIENT_ID.to_string()),
        ("CLIENT_SECRET".to_string(), CLIENT_SECRET.to_string()),
        ("SERVER_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        (
            "REFRESH_TOKEN_FILE".to_string(),
            token_file.display().to_string(),
        ),
        (
            "SPOTIFY_API_AUTH_URL".to_string(),
            format!("{}/authorize", mock_uri),
        ),
        (
            "SPOTIFY_API_TOKEN_URL".to_string(),
            format!("{}/api/token", mock_uri),
        ),
        ("SPOTIFY_API_URL".to_string(), format!("{}/v1", mock_uri)),
        ("HTTP_TIMEOUT_SECS".to_string(), "5".to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }

    Config::from_lookup(|k| vars.get(k).cloned()).unwrap()
}

pub fn test_context(config: Config, refresh_token: Option<&str>) -> SharedContext {
    let tokens = TokenManager::new(
        config.refresh_token_file.clone(),
        refresh_token.map(str::to_string),
    );
    AppContext::new(
        config,
        tokens,
        AdminSession::generate(),
        DeviceRegistry::default(),
    )
    .unwrap()
}

/// Binds the API on an ephemeral port and serves it in the background.
pub async fn spawn_server(ctx: SharedContext) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, ctx));
    addr
}

/// Player payload with the given capture time and progress.
pub fn player_payload(track: &str, artist: &str, timestamp: i64, progress: i64, duration: i64) -> Value {
    json!({
        "device": {
            "id": "device-1",
            "name": "Living Room",
            "type": "Speaker"
        },
        "is_playing": true,
        "timestamp": timestamp,
        "progress_ms": progress,
        "item": {
            "duration_ms": duration,
            "name": track,
            "artists": [
                { "name": artist, "external_urls": { "spotify": "https://open.spotify.com/artist/1" } }
            ],
            "external_urls": { "spotify": "https://open.spotify.com/track/1" }
        }
    })
}
