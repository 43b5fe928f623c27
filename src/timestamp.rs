use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::date_util::start_of_day;

/// A record timestamp in any of the shapes the data store emits.
///
/// Every comparison in the metrics layer goes through [`Timestamp::coerce`],
/// which returns `None` for anything it cannot interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// Document-store timestamp wrapper.
    Wrapped {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },
    /// Already-local wall-clock time.
    Native(NaiveDateTime),
    Text(String),
    /// Any other JSON value (null, float, bool, malformed wrapper). Kept so
    /// one bad record does not fail the whole snapshot.
    Invalid(serde_json::Value),
}

impl Timestamp {
    /// Normalize to local wall-clock time, or `None` if the value is not a valid instant.
    pub fn coerce(&self) -> Option<NaiveDateTime> {
        match self {
            Timestamp::Native(dt) => Some(*dt),
            Timestamp::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms).map(to_local),
            Timestamp::Wrapped {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds).map(to_local),
            Timestamp::Text(s) => parse_text(s),
            Timestamp::Invalid(_) => None,
        }
    }

    /// Calendar day of the coerced value.
    pub fn date(&self) -> Option<NaiveDate> {
        self.coerce().map(|dt| dt.date())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Timestamp::Native(dt)
    }
}

fn to_local(dt: DateTime<chrono::Utc>) -> NaiveDateTime {
    dt.with_timezone(&Local).naive_local()
}

fn parse_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_native_passes_through() {
        let v = dt(2025, 1, 6, 9, 30);
        assert_eq!(Timestamp::Native(v).coerce(), Some(v));
    }

    #[test]
    fn test_epoch_millis_is_local() {
        let ms = 1_736_150_400_000; // 2025-01-06T08:00:00Z
        let expected = Local.timestamp_millis_opt(ms).unwrap().naive_local();
        assert_eq!(Timestamp::EpochMillis(ms).coerce(), Some(expected));
    }

    #[test]
    fn test_wrapped_matches_epoch() {
        let wrapped = Timestamp::Wrapped {
            seconds: 1_736_150_400,
            nanoseconds: 0,
        };
        assert_eq!(
            wrapped.coerce(),
            Timestamp::EpochMillis(1_736_150_400_000).coerce()
        );
    }

    #[test]
    fn test_naive_strings() {
        let expected = dt(2025, 1, 6, 9, 30);
        assert_eq!(
            Timestamp::Text("2025-01-06T09:30:00".into()).coerce(),
            Some(expected)
        );
        assert_eq!(
            Timestamp::Text("2025-01-06 09:30:00.000".into()).coerce(),
            Some(expected)
        );
        assert_eq!(
            Timestamp::Text("2025-01-06".into()).coerce(),
            Some(dt(2025, 1, 6, 0, 0))
        );
    }

    #[test]
    fn test_rfc3339_converted_to_local() {
        let expected = Local
            .timestamp_opt(1_736_150_400, 0)
            .unwrap()
            .naive_local();
        assert_eq!(
            Timestamp::Text("2025-01-06T08:00:00Z".into()).coerce(),
            Some(expected)
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(Timestamp::Text("not a date".into()).coerce(), None);
        assert_eq!(Timestamp::Text(String::new()).coerce(), None);
        assert_eq!(Timestamp::EpochMillis(i64::MAX).coerce(), None);
    }

    #[test]
    fn test_unrecognized_shapes_deserialize_as_invalid() {
        for raw in [
            "1736150400000.5",
            "null",
            "true",
            r#"{"_seconds": 1736150400, "_nanoseconds": -1}"#,
        ] {
            let ts: Timestamp = serde_json::from_str(raw).unwrap();
            assert!(matches!(ts, Timestamp::Invalid(_)), "{raw}");
            assert_eq!(ts.coerce(), None, "{raw}");
        }
    }

    #[test]
    fn test_deserialize_shapes() {
        let n: Timestamp = serde_json::from_str("1736150400000").unwrap();
        assert_eq!(n, Timestamp::EpochMillis(1_736_150_400_000));

        let w: Timestamp =
            serde_json::from_str(r#"{"_seconds": 1736150400, "_nanoseconds": 0}"#).unwrap();
        assert_eq!(
            w,
            Timestamp::Wrapped {
                seconds: 1_736_150_400,
                nanoseconds: 0
            }
        );

        let native: Timestamp = serde_json::from_str(r#""2025-01-06T09:30:00""#).unwrap();
        assert_eq!(native, Timestamp::Native(dt(2025, 1, 6, 9, 30)));

        let text: Timestamp = serde_json::from_str(r#""2025-01-06T08:00:00Z""#).unwrap();
        assert!(matches!(text, Timestamp::Text(_)));
    }
}
