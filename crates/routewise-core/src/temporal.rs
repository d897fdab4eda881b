//! # Temporal Types — Edit Timestamps
//!
//! Defines `Timestamp`, a UTC instant truncated to millisecond precision,
//! and `EditTime`, the ingested form of a record's `updatedAt`/`createdAt`.
//!
//! Audit-log timestamps arrive with arbitrary offsets, sometimes as epoch
//! milliseconds and occasionally as garbage. Parsing is lenient: any valid
//! RFC 3339 offset is converted to UTC. A value that cannot be parsed is kept
//! verbatim as [`EditTime::Unparsed`] so the display layer can still show it,
//! and it orders before every parsed instant (i.e. "oldest").
//!
//! Correlation windows are measured in milliseconds, so sub-second precision
//! is kept down to the millisecond.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A UTC timestamp truncated to millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating to
    /// milliseconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(dt))
    }

    /// Parse an RFC 3339 string with any offset, converting to UTC.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| Self::from_utc(dt.with_timezone(&Utc)))
    }

    /// Create a timestamp from Unix epoch milliseconds.
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch milliseconds.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Absolute distance between two instants in milliseconds.
    pub fn millis_between(&self, other: &Timestamp) -> i64 {
        (self.epoch_millis() - other.epoch_millis()).abs()
    }

    /// Render as RFC 3339 with millisecond precision and `Z` suffix.
    pub fn to_rfc3339(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.nanosecond() / 1_000_000;
    dt.with_nanosecond(millis * 1_000_000).unwrap_or(dt)
}

/// Parse the date-ish strings found in record payloads: RFC 3339, naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC) and plain `YYYY-MM-DD`.
pub fn parse_date_like(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    // Cheap shape check so free text never reaches the parsers.
    let bytes = s.as_bytes();
    if bytes.len() < 10 || !bytes[..4].iter().all(u8::is_ascii_digit) || bytes[4] != b'-' {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

// ─── EditTime ────────────────────────────────────────────────────────

/// When an edit happened, as far as the audit log lets us tell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditTime {
    /// A well-formed instant.
    Parsed(Timestamp),
    /// The raw text of a timestamp that could not be parsed.
    Unparsed(String),
}

impl EditTime {
    /// Ingest a JSON timestamp: RFC 3339 strings, epoch-millisecond numbers,
    /// or anything else preserved as raw text.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Self::from_text(s)),
            serde_json::Value::Number(n) => Some(
                n.as_i64()
                    .and_then(Timestamp::from_epoch_millis)
                    .map(Self::Parsed)
                    .unwrap_or_else(|| Self::Unparsed(n.to_string())),
            ),
            other => Some(Self::Unparsed(other.to_string())),
        }
    }

    /// Ingest a textual timestamp.
    pub fn from_text(s: &str) -> Self {
        match Timestamp::parse_lenient(s).or_else(|| parse_date_like(s).map(Timestamp::from_utc)) {
            Some(ts) => Self::Parsed(ts),
            None => Self::Unparsed(s.to_string()),
        }
    }

    /// The parsed instant, if any.
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Parsed(ts) => Some(*ts),
            Self::Unparsed(_) => None,
        }
    }

    /// Text suitable for display when no formatting applies.
    pub fn raw(&self) -> String {
        match self {
            Self::Parsed(ts) => ts.to_rfc3339(),
            Self::Unparsed(raw) => raw.clone(),
        }
    }
}

impl From<Timestamp> for EditTime {
    fn from(ts: Timestamp) -> Self {
        Self::Parsed(ts)
    }
}

/// Distance in milliseconds between two optional edit times, or `None` when
/// either side has no parseable instant.
pub fn millis_apart(a: Option<&EditTime>, b: Option<&EditTime>) -> Option<i64> {
    let a = a?.timestamp()?;
    let b = b?.timestamp()?;
    Some(a.millis_between(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_lenient_converts_offset() {
        let ts = Timestamp::parse_lenient("2024-01-01T15:00:00+05:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T10:00:00.000Z");
    }

    #[test]
    fn test_millisecond_precision_kept() {
        let ts = Timestamp::parse_lenient("2024-01-01T10:00:00.123456Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T10:00:00.123Z");
        assert_eq!(ts.as_datetime().nanosecond(), 123_000_000);
    }

    #[test]
    fn test_epoch_millis_roundtrip() {
        let ts = Timestamp::parse_lenient("2024-01-01T10:00:02.500Z").unwrap();
        let back = Timestamp::from_epoch_millis(ts.epoch_millis()).unwrap();
        assert_eq!(ts, back);
    }

    #[test]
    fn test_millis_between_is_symmetric() {
        let a = Timestamp::parse_lenient("2024-01-01T10:00:00Z").unwrap();
        let b = Timestamp::parse_lenient("2024-01-01T10:00:04.999Z").unwrap();
        assert_eq!(a.millis_between(&b), 4999);
        assert_eq!(b.millis_between(&a), 4999);
    }

    #[test]
    fn test_parse_date_like_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(parse_date_like("2024-03-05"), Some(expected));
        assert_eq!(parse_date_like("2024-03-05T00:00:00Z"), Some(expected));
        assert_eq!(parse_date_like("2024-03-05T00:00:00.000"), Some(expected));
        assert_eq!(parse_date_like("05/03/2024"), None);
        assert_eq!(parse_date_like("John Smith"), None);
        assert_eq!(parse_date_like("2024"), None);
    }

    #[test]
    fn test_edit_time_from_json() {
        let parsed = EditTime::from_json(&serde_json::json!("2024-01-01T10:00:00Z")).unwrap();
        assert!(parsed.timestamp().is_some());

        let epoch = EditTime::from_json(&serde_json::json!(1_704_103_200_000_i64)).unwrap();
        assert_eq!(epoch.timestamp(), parsed.timestamp());

        let garbage = EditTime::from_json(&serde_json::json!("yesterday-ish")).unwrap();
        assert_eq!(garbage, EditTime::Unparsed("yesterday-ish".into()));
        assert_eq!(garbage.raw(), "yesterday-ish");

        assert!(EditTime::from_json(&serde_json::Value::Null).is_none());
    }

    #[test]
    fn test_millis_apart_requires_both_parsed() {
        let a = EditTime::from_text("2024-01-01T10:00:00Z");
        let b = EditTime::from_text("2024-01-01T10:00:01.500Z");
        let bad = EditTime::Unparsed("?".into());
        assert_eq!(millis_apart(Some(&a), Some(&b)), Some(1500));
        assert_eq!(millis_apart(Some(&a), Some(&bad)), None);
        assert_eq!(millis_apart(None, Some(&b)), None);
    }
}
