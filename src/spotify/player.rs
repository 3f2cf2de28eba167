use reqwest::StatusCode;

use crate::{
    error::FetchError,
    spotify::{SpotifyClient, error_message},
    types::{PlaybackSnapshot, PlayerResponse},
};

impl SpotifyClient {
    /// Retrieves the current player state with the given access token.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(snapshot))` - something is loaded in the player
    /// - `Ok(None)` - empty body, the user is not using Spotify right now
    /// - `Err(FetchError)` - transport failure, non-2xx answer or a payload
    ///   that cannot be decoded
    pub async fn fetch_now_playing(
        &self,
        access_token: &str,
    ) -> Result<Option<PlaybackSnapshot>, FetchError> {
        let res = self
            .http
            .get(format!("{}/me/player", self.api_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                message: error_message(res).await,
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = res.bytes().await.map_err(FetchError::Request)?;
        decode_player_state(&body)
    }
}

/// Decodes a raw player-state body.
///
/// An empty body means nothing is playing.
pub fn decode_player_state(body: &[u8]) -> Result<Option<PlaybackSnapshot>, FetchError> {
    if body.is_empty() {
        return Ok(None);
    }

    let payload: PlayerResponse = serde_json::from_slice(body)?;
    PlaybackSnapshot::try_from(payload).map(Some)
}

impl TryFrom<PlayerResponse> for PlaybackSnapshot {
    type Error = FetchError;

    fn try_from(payload: PlayerResponse) -> Result<Self, Self::Error> {
        let item = payload
            .item
            .ok_or_else(|| FetchError::Decode("player state has no item".to_string()))?;
        let device = payload.device.unwrap_or_default();
        let (artist_name, artist_link) = item
            .artists
            .into_iter()
            .next()
            .map(|a| (a.name, a.external_urls.spotify))
            .unwrap_or_default();

        Ok(PlaybackSnapshot {
            track_name: item.name,
            track_link: item.external_urls.spotify,
            artist_name,
            artist_link,
            device_id: device.id.unwrap_or_default(),
            device_name: device.name,
            device_type: device.device_type,
            is_playing: payload.is_playing,
            progress_ms: payload.progress_ms.unwrap_or(0),
            duration_ms: item.duration_ms,
            timestamp_ms: payload.timestamp,
        })
    }
}
