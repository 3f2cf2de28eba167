use std::time::Duration;

use tokio::sync::Mutex;

use crate::{debug, types::PlaybackSnapshot, utils};

/// Everything known about the current playback, read under one guard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackView {
    pub snapshot: Option<PlaybackSnapshot>,
    /// Unix ms at which the last playing track is expected to end. Kept when
    /// playback stops.
    pub predicted_end_ms: Option<i64>,
    /// Unix ms of the last successful fetch, including "nothing playing".
    pub last_update_ms: Option<i64>,
    /// Newest provider capture time applied so far. Survives clears so a
    /// late result from before a stop cannot bring the old track back.
    pub newest_timestamp_ms: Option<i64>,
}

/// Shared holder for the latest playback snapshot.
///
/// Handlers only read it. The poller, the admin callback and on-demand
/// refreshes write it through [`PlaybackState::apply`].
#[derive(Debug, Default)]
pub struct PlaybackState {
    inner: Mutex<PlaybackView>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the snapshot unconditionally.
    pub async fn set(&self, snapshot: Option<PlaybackSnapshot>) {
        self.inner.lock().await.snapshot = snapshot;
    }

    pub async fn get(&self) -> Option<PlaybackSnapshot> {
        self.inner.lock().await.snapshot.clone()
    }

    pub async fn view(&self) -> PlaybackView {
        self.inner.lock().await.clone()
    }

    /// Records the outcome of a successful fetch taken at `now_ms`.
    ///
    /// `None` clears the snapshot. A playing snapshot recomputes the predicted
    /// end time. A snapshot captured before any snapshot already applied is an
    /// out-of-order result and is dropped, even when the state was cleared in
    /// between; the return value tells whether the state changed.
    pub async fn apply(&self, snapshot: Option<PlaybackSnapshot>, now_ms: i64) -> bool {
        let mut state = self.inner.lock().await;

        if let (Some(incoming), Some(newest)) = (&snapshot, state.newest_timestamp_ms) {
            if incoming.timestamp_ms < newest {
                debug!(
                    "Dropping out-of-order snapshot ({} < {})",
                    incoming.timestamp_ms, newest
                );
                return false;
            }
        }
        if let Some(incoming) = &snapshot {
            state.newest_timestamp_ms = Some(incoming.timestamp_ms);
        }

        if let Some(s) = snapshot.as_ref().filter(|s| s.is_playing) {
            state.predicted_end_ms = Some(utils::predict_end_time(
                s.timestamp_ms,
                s.duration_ms,
                s.progress_ms,
            ));
        }
        state.snapshot = snapshot;
        state.last_update_ms = Some(now_ms);
        true
    }

    /// Whether a reader should refetch before serving the snapshot.
    pub async fn needs_refresh(&self, now_ms: i64, threshold: Duration) -> bool {
        let state = self.inner.lock().await;
        utils::needs_refresh(now_ms, state.predicted_end_ms, state.last_update_ms, threshold)
    }
}
