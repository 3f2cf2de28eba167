use std::{fmt::Write, time::Duration};

use chrono::{DateTime, SecondsFormat, Utc};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha512_256};

/// Maximum age of a cached snapshot before a reader forces a refetch.
pub const STALENESS_THRESHOLD: Duration = Duration::from_secs(15);

/// Generates a random alphanumeric string of the given length.
///
/// Used for the admin path segments and the admin cookie name and value.
///
/// # Example
///
/// ```
/// let segment = generate_random_string(15);
/// assert_eq!(segment.len(), 15);
/// ```
pub fn generate_random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Hashes a caller IP into the hex form stored with the admin session.
///
/// SHA-512/256, lower-case hex, 64 characters.
pub fn hash_ip(ip: &str) -> String {
    let hash = Sha512_256::digest(ip.as_bytes());
    hash.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{:02x}", b);
        out
    })
}

/// Wall-clock millisecond at which the current track should end.
///
/// `timestamp_ms` is when the provider captured the player state;
/// the remaining play time is added on top of it.
pub fn predict_end_time(timestamp_ms: i64, duration_ms: i64, progress_ms: i64) -> i64 {
    timestamp_ms + (duration_ms - progress_ms)
}

/// Decides whether a cached snapshot must be refetched before it is served.
///
/// True when nothing was fetched yet, when the predicted end of the track
/// has passed without a fetch since, or when the last update is at least
/// `threshold` old. A prediction that an update already looked past is spent,
/// so a paused or stopped player does not trigger a fetch on every read.
pub fn needs_refresh(
    now_ms: i64,
    predicted_end_ms: Option<i64>,
    last_update_ms: Option<i64>,
    threshold: Duration,
) -> bool {
    let Some(last_update) = last_update_ms else {
        return true;
    };

    if predicted_end_ms.is_some_and(|end| now_ms >= end && last_update < end) {
        return true;
    }

    now_ms.saturating_sub(last_update) >= threshold.as_millis() as i64
}

/// Wait between two poll cycles: `base + (random mod jitter_range)` seconds.
///
/// A `jitter_range` of zero disables the jitter.
pub fn jittered_interval(base: Duration, jitter_range: u32, random: u32) -> Duration {
    if jitter_range == 0 {
        return base;
    }
    base + Duration::from_secs(u64::from(random % jitter_range))
}

/// Formats a unix millisecond timestamp as RFC 3339 (UTC, millisecond precision).
pub fn millis_to_rfc3339(ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
