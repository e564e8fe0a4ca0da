use chrono::{SecondsFormat, Utc};

/// Current UTC time as an RFC 3339 timestamp with millisecond precision
///
/// Example: `2024-05-01T12:30:45.123Z`
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
