//! Configuration management for the now-playing backend.
//!
//! This module handles loading configuration values from environment
//! variables and `.env` files, and the optional device allow-list file. All
//! values are read once at startup into a [`Config`] which is then owned by
//! the application context.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (applied by the binary on top of [`Config`])
//! 2. Environment variables
//! 3. `.env` file in the working directory, then in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::{error::ConfigError, types::AllowedDevice};

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5005";
pub const DEFAULT_DEVICES_FILE: &str = "config.json";
pub const SPOTIFY_API_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Loads environment variables from `.env` files.
///
/// Looks for a `.env` file in the working directory first and then in the
/// platform-specific local data directory under `nowplaying/.env`. Values
/// already present in the process environment are never overwritten, and a
/// missing file is not an error: the service can run from plain environment
/// variables.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/nowplaying/.env`
/// - macOS: `~/Library/Application Support/nowplaying/.env`
/// - Windows: `%LOCALAPPDATA%/nowplaying/.env`
pub async fn load_env() {
    dotenv::dotenv().ok();

    let path = data_dir().join(".env");
    if async_fs::metadata(&path).await.is_ok() {
        dotenv::from_path(&path).ok();
    }
}

/// Returns the directory the service keeps its files in.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("nowplaying");
    path
}

/// Runtime configuration, loaded once and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub server_address: SocketAddr,
    pub refresh_token_file: PathBuf,
    pub devices_file: PathBuf,
    /// Base used to build the OAuth callback URI. Derived from the `Host`
    /// header when unset.
    pub public_base_url: Option<String>,
    /// Header carrying the real client IP when running behind a proxy,
    /// e.g. `CF-Connecting-IP`.
    pub proxy_header: Option<String>,
    pub on_demand_refresh: bool,
    pub poll_base: Duration,
    pub poll_jitter_secs: u32,
    pub http_timeout: Duration,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub verbose: bool,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `CLIENT_ID` or `CLIENT_SECRET`
    /// are absent, and [`ConfigError::Invalid`] for values that do not parse.
    ///
    /// # Example
    ///
    /// ```
    /// let cfg = Config::from_env()?;
    /// println!("binding {}", cfg.server_address);
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated like absent ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = get("CLIENT_ID").ok_or(ConfigError::Missing("CLIENT_ID"))?;
        let client_secret = get("CLIENT_SECRET").ok_or(ConfigError::Missing("CLIENT_SECRET"))?;

        let server_address = get("SERVER_ADDRESS")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "SERVER_ADDRESS",
                message: e.to_string(),
            })?;

        let refresh_token_file = get("REFRESH_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("refresh_token"));
        let devices_file = get("DEVICES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVICES_FILE));

        let verbose = get("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("development"))
            || parse_bool("VERBOSE", get("VERBOSE"))?;

        Ok(Config {
            client_id,
            client_secret,
            server_address,
            refresh_token_file,
            devices_file,
            public_base_url: get("PUBLIC_BASE_URL").map(|u| u.trim_end_matches('/').to_string()),
            proxy_header: get("PROXY_HEADER"),
            on_demand_refresh: parse_bool("ON_DEMAND_REFRESH", get("ON_DEMAND_REFRESH"))?,
            poll_base: Duration::from_secs(parse_num("POLL_BASE_SECS", get("POLL_BASE_SECS"), 4)?),
            poll_jitter_secs: parse_num("POLL_JITTER_SECS", get("POLL_JITTER_SECS"), 6)?,
            http_timeout: Duration::from_secs(parse_num(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                10,
            )?),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| SPOTIFY_API_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| SPOTIFY_API_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| SPOTIFY_API_URL.to_string()),
            verbose,
        })
    }
}

fn parse_bool(key: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            key,
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}

fn parse_num<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
    }
}

#[derive(Debug, Default, Deserialize)]
struct DevicesFile {
    #[serde(rename = "allowedDevices", default)]
    allowed_devices: Vec<AllowedDevice>,
}

/// Devices whose label is shown with a custom prefix instead of the
/// generic device type.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<AllowedDevice>,
}

impl DeviceRegistry {
    pub fn new(devices: Vec<AllowedDevice>) -> Self {
        Self { devices }
    }

    /// Loads the registry from a JSON file shaped like
    /// `{"allowedDevices": [{"id": "...", "prefix": "..."}]}`.
    ///
    /// A missing file yields an empty registry. A file that exists but cannot
    /// be read or parsed is an error.
    pub async fn load(path: &std::path::Path) -> Result<Option<Self>, ConfigError> {
        let content = match async_fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::Devices {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        let file: DevicesFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::Devices {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Some(Self::new(file.allowed_devices)))
    }

    pub fn find(&self, device_id: &str) -> Option<&AllowedDevice> {
        self.devices.iter().find(|d| d.id == device_id)
    }

    /// Label shown for the device a snapshot was captured on.
    ///
    /// Known devices render as `"{prefix} {name}"`, everything else as
    /// `"a {type}"`.
    pub fn display_label(&self, device_id: &str, device_name: &str, device_type: &str) -> String {
        match self.find(device_id) {
            Some(device) => format!("{} {}", device.prefix, device_name),
            None => format!("a {}", device_type),
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
