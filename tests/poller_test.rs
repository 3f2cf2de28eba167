//! Tests for the background poll loop.

mod common;

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use nowplaying::{poller, types::PlaybackSnapshot};
use serde_json::json;
use tokio::time::Instant;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test(start_paused = true)]
async fn test_slow_cycle_skips_overlapping_ticks() {
    let started = Arc::new(AtomicUsize::new(0));
    let counter = started.clone();

    // Ticks every 4s, each cycle takes 25s: cycles start at 0s, 28s and 56s
    let ticker = tokio::spawn(poller::drive(Duration::from_secs(4), 0, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(tokio::time::sleep(Duration::from_secs(25)))
    }));

    tokio::time::sleep(Duration::from_secs(58)).await;
    ticker.abort();

    assert_eq!(started.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_tick_interval_stays_within_jitter_range() {
    let starts = Arc::new(Mutex::new(Vec::new()));
    let recorder = starts.clone();

    let ticker = tokio::spawn(poller::drive(Duration::from_secs(4), 6, move || {
        recorder.lock().unwrap().push(Instant::now());
        tokio::spawn(async {})
    }));

    tokio::time::sleep(Duration::from_secs(300)).await;
    ticker.abort();

    let starts = starts.lock().unwrap();
    assert!(starts.len() >= 300 / 9);
    for pair in starts.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= Duration::from_secs(4), "gap too short: {gap:?}");
        assert!(gap < Duration::from_secs(10), "gap too long: {gap:?}");
    }
}

#[tokio::test]
async fn test_failed_cycles_do_not_stop_the_loop() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Refresh token revoked"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cfg = common::test_config(
        &server.uri(),
        &dir.path().join("token"),
        &[("POLL_BASE_SECS", "1"), ("POLL_JITTER_SECS", "0")],
    );
    let ctx = common::test_context(cfg, Some("revoked"));
    let held = PlaybackSnapshot {
        track_name: "Held".to_string(),
        track_link: String::new(),
        artist_name: "Artist".to_string(),
        artist_link: String::new(),
        device_id: "d".to_string(),
        device_name: "Desk".to_string(),
        device_type: "Computer".to_string(),
        is_playing: true,
        progress_ms: 0,
        duration_ms: 1_000,
        timestamp_ms: 1,
    };
    ctx.playback.apply(Some(held.clone()), 1).await;

    let ticker = tokio::spawn(poller::run(ctx.clone()));
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    ticker.abort();

    let attempts = server.received_requests().await.unwrap().len();
    assert!(attempts >= 2, "only {attempts} token request(s)");
    assert_eq!(ctx.playback.get().await, Some(held));
}
