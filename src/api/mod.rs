//! # API Module
//!
//! HTTP handlers of the now-playing backend.
//!
//! ## Endpoints
//!
//! ### Public
//!
//! - [`now_playing`] - `GET /NowPlaying`, the cached snapshot formatted for
//!   the portfolio front end
//! - [`health`] - `GET /health`, status, version and whether a refresh token
//!   is loaded
//!
//! ### Admin
//!
//! - [`login`] - `GET /admin/{adminPath}/{updatePath}`, hands out the admin
//!   cookie and redirects to Spotify's consent page
//! - [`callback`] - `GET /admin/spotify/callback/1`, exchanges the consent
//!   code for a new refresh token
//!
//! The admin path segments are random per process and printed on startup.
//! They are a weak, obscurity-based guard; the cookie and the caller-IP
//! binding are what the callback actually checks.

use std::net::SocketAddr;

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::context::AppContext;

mod admin;
mod callback;
mod health;
mod now_playing;

pub use admin::login;
pub use callback::SUCCESS_TEXT;
pub use callback::callback;
pub use health::health;
pub use now_playing::NOTHING_PLAYING;
pub use now_playing::now_playing;
pub use now_playing::render;

pub const CALLBACK_PATH: &str = "/admin/spotify/callback/1";

/// IP the request originates from.
///
/// Uses the configured proxy header when present, the TCP peer otherwise.
pub fn client_ip(ctx: &AppContext, headers: &HeaderMap, peer: SocketAddr) -> String {
    ctx.config
        .proxy_header
        .as_deref()
        .and_then(|name| headers.get(name))
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| peer.ip().to_string())
}

/// Redirect URI registered with Spotify for the admin callback.
pub fn callback_uri(ctx: &AppContext, headers: &HeaderMap) -> String {
    let base = match &ctx.config.public_base_url {
        Some(base) => base.clone(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| ctx.config.server_address.to_string());
            format!("http://{}", host)
        }
    };

    format!("{}{}", base, CALLBACK_PATH)
}

/// Value of cookie `name`, if the request carries it.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Adds permissive CORS headers to every response.
pub async fn cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("*"),
    );
    response
}

pub async fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
