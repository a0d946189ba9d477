//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp the way submissions carry it
///
/// ISO-8601 UTC with millisecond precision and a `Z` suffix,
/// e.g. `2026-01-28T15:04:05.123Z`.
pub fn to_iso8601(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current UTC time formatted as a submission timestamp
pub fn now_iso8601() -> String {
    to_iso8601(now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_iso8601_millis_and_zulu() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 28, 15, 4, 5).unwrap();
        assert_eq!(to_iso8601(ts), "2026-01-28T15:04:05.000Z");
    }

    #[test]
    fn test_now_iso8601_parses_back() {
        let formatted = now_iso8601();
        assert!(formatted.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&formatted).is_ok());
    }
}
