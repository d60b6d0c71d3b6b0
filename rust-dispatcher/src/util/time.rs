//! Timestamp helpers for the state files and signatures.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;

/// Seconds-precision UTC timestamp, e.g. "2024-05-01T12:30:05Z".
///
/// This is the shape both state files carry for `queued_at`, `created_at`,
/// `last_attempt_at` and `updated_at`.
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Unix epoch seconds as a string, used for signature timestamps.
pub fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_timestamp_shape() {
        let stamp = utc_timestamp();
        assert_eq!(stamp.len(), 20);
        assert!(stamp.ends_with('Z'));
        assert_eq!(stamp.as_bytes()[10], b'T');
    }

    #[test]
    fn test_unix_timestamp_parses() {
        let stamp = unix_timestamp();
        assert!(stamp.parse::<u64>().unwrap() > 1_500_000_000);
    }
}
