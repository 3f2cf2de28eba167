//! # Spotify Integration Module
//!
//! Thin client for the two Spotify services the backend talks to:
//!
//! ```text
//! Poller / Admin handlers
//!          ↓
//! SpotifyClient
//!     ├── auth   (accounts service: consent URL, code + refresh token grants)
//!     └── player (Web API: current player state)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! The client holds nothing but immutable credentials, endpoint URLs and a
//! shared `reqwest::Client` with a bounded request timeout, so it can be
//! cloned freely and used from any task.

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Response};

use crate::{config::Config, types::ApiErrorResponse};

pub mod auth;
pub mod player;

pub const SCOPE: &str = "user-read-playback-state";

#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    client_id: String,
    basic_auth: String,
    auth_url: String,
    token_url: String,
    api_url: String,
}

impl SpotifyClient {
    /// Creates a client from the runtime configuration.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying TLS backend cannot be initialised.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.http_timeout).build()?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            basic_auth: basic_auth_value(&config.client_id, &config.client_secret),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            api_url: config.api_url.clone(),
        })
    }
}

/// Value for the `Authorization` header of token requests.
pub fn basic_auth_value(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}

/// Pulls a human readable message out of a Spotify error response.
///
/// Spotify uses `{"error": "...", "error_description": "..."}` on the
/// accounts service and `{"error": {"status": .., "message": ".."}}` on the
/// Web API. Anything else is returned verbatim.
pub(crate) async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(ApiErrorResponse {
            error_description: Some(description),
            ..
        }) => description,
        Ok(ApiErrorResponse {
            error: Some(serde_json::Value::String(error)),
            ..
        }) => error,
        Ok(ApiErrorResponse {
            error: Some(serde_json::Value::Object(error)),
            ..
        }) => error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or(body),
        _ => body,
    }
}
