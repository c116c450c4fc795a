use chrono::{DateTime, Utc};

/// Get current Unix timestamp (seconds)
pub fn now_epoch_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Convert a Unix timestamp (seconds) to an RFC 3339 string in UTC.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn epoch_seconds_to_rfc3339(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .unwrap_or_default()
        .to_rfc3339()
}
