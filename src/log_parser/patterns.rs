use super::formats::UNKNOWN;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

/// Japan Standard Time, UTC+09:00. No daylight saving.
pub const DISPLAY_OFFSET_SECS: i32 = 9 * 3600;

lazy_static! {
    pub static ref DISPLAY_TZ: FixedOffset = FixedOffset::east_opt(DISPLAY_OFFSET_SECS).unwrap();

    /// `HOST` or `HOST(PORT)`, nothing else.
    pub static ref CLIENT_ADDRESS_PATTERN: Regex =
        Regex::new(r"^([^()\s]+)(?:\((\d+)\))?$").unwrap();
}

/// Strips the `(port)` annotation from a captured client address.
///
/// Addresses that are not `HOST` or `HOST(PORT)` (unbalanced parentheses,
/// a non-numeric port, an empty host) come back as [`UNKNOWN`].
pub fn clean_client_address(raw: &str) -> String {
    CLIENT_ADDRESS_PATTERN
        .captures(raw.trim())
        .and_then(|caps| caps.get(1))
        .map(|host| host.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Parses a UTC timestamp in `format` and moves it into the display timezone.
pub fn parse_utc_timestamp(raw: &str, format: &str) -> Option<DateTime<FixedOffset>> {
    NaiveDateTime::parse_from_str(raw.trim(), format)
        .ok()
        .map(|naive| to_display_time(naive.and_utc()))
}

pub fn to_display_time(utc: DateTime<Utc>) -> DateTime<FixedOffset> {
    utc.with_timezone(&*DISPLAY_TZ)
}

/// Trims a captured field, treating whitespace-only captures as absent.
pub fn clean_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
