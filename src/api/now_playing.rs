use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::{
    config::DeviceRegistry,
    context::SharedContext,
    management::PlaybackView,
    poller,
    types::{LinkInfo, NowPlayingResponse, SongData},
    utils,
};

pub const NOTHING_PLAYING: &str = "Nothing is playing!";

pub async fn now_playing(State(ctx): State<SharedContext>) -> Response {
    if ctx.config.on_demand_refresh
        && ctx.tokens.has_refresh_token().await
        && ctx
            .playback
            .needs_refresh(utils::now_millis(), utils::STALENESS_THRESHOLD)
            .await
    {
        if let Err(e) = poller::refresh_if_stale(&ctx).await {
            poller::report_failure(&e);
            return (
                StatusCode::FAILED_DEPENDENCY,
                Json(NowPlayingResponse::failure(format!(
                    "Failed to refresh now playing: {}",
                    e
                ))),
            )
                .into_response();
        }
    }

    let view = ctx.playback.view().await;
    Json(render(&ctx.devices, &view)).into_response()
}

/// Builds the public response body from a playback view.
pub fn render(devices: &DeviceRegistry, view: &PlaybackView) -> NowPlayingResponse {
    let Some(snapshot) = &view.snapshot else {
        return NowPlayingResponse::failure(NOTHING_PLAYING);
    };

    NowPlayingResponse {
        success: true,
        playing_data: Some(SongData {
            artist: LinkInfo {
                link: snapshot.artist_link.clone(),
                name: snapshot.artist_name.clone(),
            },
            song: LinkInfo {
                link: snapshot.track_link.clone(),
                name: snapshot.track_name.clone(),
            },
            device: devices.display_label(
                &snapshot.device_id,
                &snapshot.device_name,
                &snapshot.device_type,
            ),
            playing: snapshot.is_playing,
        }),
        song_end_time: view.predicted_end_ms.and_then(utils::millis_to_rfc3339),
        message: None,
    }
}
