//! Raw export records and the normalized play event.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{Hours, Milliseconds};

/// Naive layouts found in older exports. Interpreted as UTC.
const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// One record as it appears in an exported history file.
///
/// Only the fields the aggregations need are kept; anything else in the
/// export is ignored. A `null` value and a missing key both deserialize to
/// `None`. `ts` is kept as raw JSON so a malformed timestamp only costs its
/// own record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamRecord {
    #[serde(default)]
    pub ts: Option<Value>,
    pub ms_played: Milliseconds,
    #[serde(default)]
    pub master_metadata_album_artist_name: Option<String>,
    #[serde(default)]
    pub master_metadata_track_name: Option<String>,
}

/// A single listening session fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayEvent {
    pub timestamp: DateTime<Utc>,
    pub duration: Milliseconds,
    pub artist_name: Option<String>,
    pub track_name: Option<String>,
    hours_played: Hours,
}

impl PlayEvent {
    /// Create an event, deriving `hours_played` from the duration.
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        duration: Milliseconds,
        artist_name: Option<String>,
        track_name: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            duration,
            artist_name,
            track_name,
            hours_played: duration.to_hours(),
        }
    }

    /// Hours played, computed once from `duration`.
    #[must_use]
    pub const fn hours_played(&self) -> Hours {
        self.hours_played
    }
}

impl TryFrom<StreamRecord> for PlayEvent {
    type Error = Error;

    fn try_from(record: StreamRecord) -> Result<Self> {
        let timestamp = match &record.ts {
            Some(Value::String(raw)) => parse_timestamp(raw)?,
            Some(other) => return Err(Error::InvalidTimestamp(other.to_string())),
            None => return Err(Error::InvalidTimestamp("missing".to_string())),
        };
        Ok(Self::new(
            timestamp,
            record.ms_played,
            record.master_metadata_album_artist_name,
            record.master_metadata_track_name,
        ))
    }
}

/// Parse an export timestamp into UTC.
///
/// Accepts RFC 3339 with any offset, and the naive layouts in
/// [`NAIVE_FORMATS`] which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::InvalidTimestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_utc() {
        let ts = parse_timestamp("2020-03-14T15:09:26Z").unwrap();
        assert_eq!(ts.year(), 2020);
        assert_eq!(ts.hour(), 15);
        assert_eq!(ts.minute(), 9);
    }

    #[test]
    fn test_parse_rfc3339_with_offset_converts_to_utc() {
        let ts = parse_timestamp("2021-01-01T01:30:00+02:00").unwrap();
        assert_eq!(ts.year(), 2020);
        assert_eq!(ts.hour(), 23);
    }

    #[test]
    fn test_parse_legacy_formats() {
        assert_eq!(parse_timestamp("2019-02-01 13:45").unwrap().hour(), 13);
        assert_eq!(parse_timestamp("2019-02-01 13:45:10").unwrap().second(), 10);
        assert_eq!(parse_timestamp("2019-02-01T13:45:10").unwrap().minute(), 45);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let ts = parse_timestamp("2020-03-14 15:09:26.123").unwrap();
        assert_eq!(ts.second(), 26);
        assert_eq!(ts.timestamp_subsec_millis(), 123);
        assert_eq!(parse_timestamp("2020-03-14T15:09:26.5").unwrap().minute(), 9);
    }

    #[test]
    fn test_non_string_timestamp_is_invalid() {
        for json in [
            r#"{"ts": null, "ms_played": 1000}"#,
            r#"{"ms_played": 1000}"#,
            r#"{"ts": 1589000000, "ms_played": 1000}"#,
        ] {
            let record: StreamRecord = serde_json::from_str(json).unwrap();
            assert!(
                matches!(PlayEvent::try_from(record), Err(Error::InvalidTimestamp(_))),
                "{json} should be rejected per record"
            );
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "yesterday", "2020-13-01T00:00:00Z", "1589000000"] {
            assert!(
                matches!(parse_timestamp(raw), Err(Error::InvalidTimestamp(_))),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn test_record_ignores_unknown_and_null_fields() {
        let json = r#"{
            "ts": "2020-06-01T10:00:00Z",
            "platform": "android",
            "ms_played": 1800000,
            "master_metadata_track_name": null,
            "episode_name": "Some Podcast"
        }"#;
        let record: StreamRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.ms_played, Milliseconds::new(1_800_000));
        assert!(record.master_metadata_album_artist_name.is_none());
        assert!(record.master_metadata_track_name.is_none());
    }

    #[test]
    fn test_record_rejects_negative_duration() {
        let json = r#"{"ts": "2020-06-01T10:00:00Z", "ms_played": -5}"#;
        assert!(serde_json::from_str::<StreamRecord>(json).is_err());
    }

    #[test]
    fn test_event_derives_hours_and_keeps_absence() {
        let record = StreamRecord {
            ts: Some(Value::from("2020-06-01T10:00:00Z")),
            ms_played: Milliseconds::new(1_800_000),
            master_metadata_album_artist_name: None,
            master_metadata_track_name: Some("Intro".to_string()),
        };
        let event = PlayEvent::try_from(record).unwrap();
        assert!((event.hours_played().get() - 0.5).abs() < f64::EPSILON);
        assert!(event.artist_name.is_none());
        assert_eq!(event.track_name.as_deref(), Some("Intro"));
    }
}
