use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: Option<serde_json::Value>,
    pub error_description: Option<String>,
}

/// Access token minted from a refresh token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: u64,
    pub obtained_at: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerDevice {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerArtist {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub duration_ms: i64,
    #[serde(default)]
    pub artists: Vec<PlayerArtist>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// Payload of `GET /me/player`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerResponse {
    #[serde(default)]
    pub device: Option<PlayerDevice>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub progress_ms: Option<i64>,
    #[serde(default)]
    pub item: Option<PlayerItem>,
    #[serde(default)]
    pub is_playing: bool,
}

/// Point-in-time capture of what is playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub track_name: String,
    pub track_link: String,
    pub artist_name: String,
    pub artist_link: String,
    pub device_id: String,
    pub device_name: String,
    pub device_type: String,
    pub is_playing: bool,
    pub progress_ms: i64,
    pub duration_ms: i64,
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedDevice {
    pub id: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LinkInfo {
    pub link: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SongData {
    pub artist: LinkInfo,
    pub song: LinkInfo,
    pub device: String,
    pub playing: bool,
}

/// Body of `GET /NowPlaying`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlayingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playing_data: Option<SongData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NowPlayingResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            playing_data: None,
            song_end_time: None,
            message: Some(message.into()),
        }
    }
}
