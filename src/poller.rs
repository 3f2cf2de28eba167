//! Background refresh of the playback snapshot.
//!
//! The poller wakes up every `base + jitter` seconds and starts a
//! fetch-and-update cycle. A cycle that is still running when the next tick
//! comes around is not doubled up: that tick is skipped. Failures are logged
//! and never clear the shared state, so a provider hiccup does not make the
//! public endpoint flicker to "nothing playing".

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::{
    context::{AppContext, SharedContext},
    debug,
    error::FetchError,
    utils, warning,
};

/// Fetches the current player state and records it.
///
/// Returns whether the shared state changed. Errors leave the state as it
/// was.
pub async fn update_now_playing(ctx: &AppContext) -> Result<bool, FetchError> {
    let _gate = ctx.refresh_gate.lock().await;
    fetch_and_apply(ctx).await
}

/// Refetches only if the snapshot is still stale once the refresh gate is
/// held.
///
/// Concurrent readers queue on the gate; the first one fetches and the rest
/// find a fresh snapshot and return `Ok(false)` without calling Spotify.
pub async fn refresh_if_stale(ctx: &AppContext) -> Result<bool, FetchError> {
    let _gate = ctx.refresh_gate.lock().await;
    if !ctx
        .playback
        .needs_refresh(utils::now_millis(), utils::STALENESS_THRESHOLD)
        .await
    {
        return Ok(false);
    }
    fetch_and_apply(ctx).await
}

async fn fetch_and_apply(ctx: &AppContext) -> Result<bool, FetchError> {
    let snapshot = ctx.fetch_snapshot().await?;
    Ok(ctx.playback.apply(snapshot, utils::now_millis()).await)
}

/// Logs a failed cycle, keeping OAuth and player failures apart.
pub fn report_failure(err: &FetchError) {
    match err {
        FetchError::MissingRefreshToken => debug!("Skipping update: {}", err),
        FetchError::Auth(e) => warning!("Failed to refresh Spotify access token, Error: {}", e),
        e => warning!("Failed to update Spotify listening, Error: {}", e),
    }
}

fn spawn_cycle(ctx: SharedContext) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = update_now_playing(&ctx).await {
            report_failure(&e);
        }
    })
}

/// Runs the poll loop until the process exits.
///
/// Spotify allows roughly 180 requests per minute; the default cadence of
/// 4 to 9 seconds stays far below that.
pub async fn run(ctx: SharedContext) {
    let base = ctx.config.poll_base;
    let jitter = ctx.config.poll_jitter_secs;
    drive(base, jitter, || spawn_cycle(ctx.clone())).await;
}

/// Tick loop behind [`run`].
///
/// Calls `start` on every tick unless the task it returned last time is
/// still running, then sleeps for the jittered interval. Never returns.
pub async fn drive<F>(base: Duration, jitter_secs: u32, mut start: F)
where
    F: FnMut() -> JoinHandle<()>,
{
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        let busy = in_flight.as_ref().is_some_and(|h| !h.is_finished());
        if busy {
            debug!("Previous update still in flight, skipping this tick");
        } else {
            in_flight = Some(start());
        }

        let wait = utils::jittered_interval(base, jitter_secs, rand::random::<u32>());
        debug!("Next update in {:?}", wait);
        tokio::time::sleep(wait).await;
    }
}
