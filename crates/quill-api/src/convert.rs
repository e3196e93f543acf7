use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use tracing::warn;

/// Stored timestamp to epoch milliseconds.
pub fn epoch_millis(stored: &str) -> i64 {
    chrono::DateTime::parse_from_rfc3339(stored)
        .map(|dt| dt.timestamp_millis())
        .or_else(|_| {
            // SQLite's datetime('now') has no timezone and no 'T'
            chrono::NaiveDateTime::parse_from_str(stored, "%Y-%m-%d %H:%M:%S%.f")
                .map(|ndt| ndt.and_utc().timestamp_millis())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", stored, e);
            0
        })
}

/// Article content may be stored base64-encoded. Decode it when it is valid
/// base64 of UTF-8 text, otherwise hand it back untouched.
pub fn decode_content(stored: String) -> String {
    B64.decode(stored.as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or(stored)
}

/// Integer from a query parameter. Missing, empty and non-integer values are
/// all `None`.
pub fn parse_int(value: Option<&str>) -> Option<i64> {
    value.map(str::trim).filter(|v| !v.is_empty())?.parse().ok()
}
