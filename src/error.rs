//! Error types for the refresh pipeline.
//!
//! OAuth failures and player fetch failures are kept apart so logs can tell
//! them apart, but everything a fetch can run into is surfaced to callers as a
//! single [`FetchError`].

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while talking to the Spotify accounts service.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token endpoint answered {status}: \"{message}\"")]
    Status { status: StatusCode, message: String },

    #[error("malformed token response: {0}")]
    Decode(String),
}

/// Failure while obtaining the current player state.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The access token could not be minted from the refresh token.
    #[error("oauth: {0}")]
    Auth(#[from] AuthError),

    #[error("player request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("player endpoint answered {status}: \"{message}\"")]
    Status { status: StatusCode, message: String },

    #[error("malformed player payload: {0}")]
    Decode(String),

    #[error("no refresh token available, visit the admin path first")]
    MissingRefreshToken,
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Failure reading or writing the refresh token file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("refresh token file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid or missing startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("cannot load device list from {path}: {message}")]
    Devices { path: PathBuf, message: String },
}

/// Anything that keeps the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("cannot build http client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}
