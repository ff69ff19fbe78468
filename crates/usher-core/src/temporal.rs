//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines [`Timestamp`], the single time representation used across the
//! admission stack: UTC, truncated to whole seconds, rendered as ISO 8601
//! with a `Z` suffix.
//!
//! ## Why UTC-only
//!
//! Scan events come from gate devices that may be configured with local
//! timezones. The reentry window is computed from the *first* scan, so two
//! devices disagreeing about offsets could move a window boundary by hours.
//! The strict parse path rejects any offset other than `Z` so stored
//! history is unambiguous; the lenient path exists for operator-typed
//! input and converts to UTC before anything else sees the value.
//!
//! Sub-second precision is discarded everywhere. Admission decisions are
//! made on second granularity, and dropping nanoseconds keeps the stored
//! and displayed forms identical.
//!
//! Serde goes through the strict path: a timestamp serializes to its
//! `Z`-suffixed form and only that form deserializes, so every wire document
//! (ticket records, payloads, results) carries one spelling per instant.

use chrono::{DateTime, Days, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FormatError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO 8601 string, rejecting non-UTC offsets.
/// - [`Timestamp::parse_lenient()`] — from an RFC 3339 string with any offset,
///   converted to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an ISO 8601 / RFC 3339 string.
    ///
    /// **Rejects non-UTC inputs.** Only the `Z` suffix is accepted; explicit
    /// offsets such as `+00:00` or `+05:00` are errors even when they name
    /// the same instant. Stored scan history must have exactly one textual
    /// form per instant.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidTimestamp`] if the string is not valid
    /// RFC 3339 or does not end in `Z`.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        if !s.ends_with('Z') {
            return Err(FormatError::InvalidTimestamp(format!(
                "must use Z suffix (UTC only), got {s:?}"
            )));
        }

        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| FormatError::InvalidTimestamp(format!("{s:?}: {e}")))?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Parse an RFC 3339 string with any timezone offset, converting to UTC.
    ///
    /// For operator-typed input (for example an explicit evaluation instant
    /// on the command line). The result satisfies the same UTC
    /// seconds-precision invariant as the strict path.
    pub fn parse_lenient(s: &str) -> Result<Self, FormatError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| FormatError::InvalidTimestamp(format!("{s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The timestamp `days` whole days after this one.
    ///
    /// Saturates at the latest representable instant; real validity windows
    /// never approach it.
    pub fn add_days(self, days: u32) -> Self {
        self.0
            .checked_add_days(Days::new(u64::from(days)))
            .map(Self)
            .unwrap_or(Self(truncate_to_seconds(DateTime::<Utc>::MAX_UTC)))
    }

    /// Signed duration from `earlier` to `self` (negative if `self` is
    /// before `earlier`).
    pub fn since(self, earlier: Timestamp) -> chrono::Duration {
        self.0.signed_duration_since(earlier.0)
    }

    /// Render as ISO 8601 with Z suffix (e.g., `2024-05-18T19:30:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = utc(2024, 5, 18, 19, 30, 45).with_nanosecond(987_654_321).unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(ts.to_iso8601(), "2024-05-18T19:30:45Z");
    }

    #[test]
    fn test_display_matches_iso8601() {
        let ts = Timestamp::from_utc(utc(2024, 12, 31, 23, 59, 59));
        assert_eq!(format!("{ts}"), ts.to_iso8601());
    }

    // ---- parse() strict mode ----

    #[test]
    fn test_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2024-05-18T19:30:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-05-18T19:30:00Z");
    }

    #[test]
    fn test_parse_offsets_rejected() {
        assert!(Timestamp::parse("2024-05-18T19:30:00+00:00").is_err());
        assert!(Timestamp::parse("2024-05-18T21:30:00+02:00").is_err());
        assert!(Timestamp::parse("2024-05-18T15:30:00-04:00").is_err());
    }

    #[test]
    fn test_parse_subseconds_truncated() {
        let ts = Timestamp::parse("2024-05-18T19:30:00.250Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-05-18T19:30:00Z");
    }

    #[test]
    fn test_parse_garbage_rejected() {
        assert!(Timestamp::parse("").is_err());
        assert!(Timestamp::parse("yesterday").is_err());
        assert!(Timestamp::parse("2024-05-18").is_err());
    }

    // ---- parse_lenient() ----

    #[test]
    fn test_parse_lenient_converts_offset() {
        let ts = Timestamp::parse_lenient("2024-05-18T21:30:00+02:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-05-18T19:30:00Z");
    }

    #[test]
    fn test_parse_lenient_accepts_z() {
        let ts = Timestamp::parse_lenient("2024-05-18T19:30:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-05-18T19:30:00Z");
    }

    // ---- arithmetic ----

    #[test]
    fn test_add_days() {
        let first = Timestamp::parse("2024-05-01T10:00:00Z").unwrap();
        assert_eq!(first.add_days(14).to_iso8601(), "2024-05-15T10:00:00Z");
        assert_eq!(first.add_days(0), first);
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        let ts = Timestamp::parse("2024-12-30T08:00:00Z").unwrap();
        assert_eq!(ts.add_days(3).to_iso8601(), "2025-01-02T08:00:00Z");
    }

    #[test]
    fn test_since_signed() {
        let earlier = Timestamp::parse("2024-05-01T10:00:00Z").unwrap();
        let later = Timestamp::parse("2024-05-03T10:00:00Z").unwrap();
        assert_eq!(later.since(earlier), chrono::Duration::days(2));
        assert_eq!(earlier.since(later), chrono::Duration::days(-2));
    }

    // ---- ordering ----

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2024-05-18T19:30:00Z").unwrap();
        let later = Timestamp::parse("2024-05-18T19:30:01Z").unwrap();
        assert!(earlier < later);
    }

    // ---- serde ----

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2024-05-18T19:30:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-05-18T19:30:00Z\"");
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }

    #[test]
    fn test_serde_rejects_offset_form() {
        let result: Result<Timestamp, _> =
            serde_json::from_str("\"2024-05-18T21:30:00+02:00\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_truncates_subseconds_like_parse() {
        let ts: Timestamp = serde_json::from_str("\"2024-05-18T19:30:00.250Z\"").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-05-18T19:30:00Z");
    }
}
