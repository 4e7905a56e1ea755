//! Normalizer — converts source records into JSON-native values.
//!
//! Mappings and sequences are rebuilt recursively with their order intact.
//! Timestamps, dates and times become their canonical ISO-8601 text; every
//! JSON-native scalar passes through untouched, so normalizing an already
//! normalized record is a no-op.

use crate::types::Datum;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::{Map, Number, Value};

/// Normalize one record (or any value inside one).
pub fn normalize(datum: &Datum) -> Value {
    match datum {
        Datum::Null => Value::Null,
        Datum::Bool(b) => Value::Bool(*b),
        Datum::Int(i) => Value::Number((*i).into()),
        Datum::UInt(u) => Value::Number((*u).into()),
        // JSON has no NaN or infinity.
        Datum::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Datum::String(s) => Value::String(s.clone()),
        Datum::Seq(items) => Value::Array(items.iter().map(normalize).collect()),
        Datum::Map(entries) => {
            let mut obj = Map::with_capacity(entries.len());
            for (key, value) in entries {
                obj.insert(key.clone(), normalize(value));
            }
            Value::Object(obj)
        }
        Datum::Timestamp(ts) => Value::String(encode_timestamp(ts)),
        Datum::TimestampTz(ts) => Value::String(encode_timestamp_tz(ts)),
        Datum::Date(d) => Value::String(encode_date(d)),
        Datum::Time(t) => Value::String(encode_time(t)),
    }
}

/// Normalize every record of a sample, keeping their order.
pub fn normalize_all(records: &[Datum]) -> Vec<Value> {
    records.iter().map(normalize).collect()
}

// ---------------------------------------------------------------------------
// Canonical encodings
// ---------------------------------------------------------------------------

/// `2024-01-15T10:30:00`, or `2024-01-15T10:30:00.250000` when there is a
/// sub-second part. Precision stops at microseconds.
pub fn encode_timestamp(ts: &NaiveDateTime) -> String {
    format!("{}{}", ts.format("%Y-%m-%dT%H:%M:%S"), micros_suffix(ts.nanosecond()))
}

/// Same as [`encode_timestamp`] followed by the offset, e.g. `+00:00`.
pub fn encode_timestamp_tz(ts: &DateTime<FixedOffset>) -> String {
    format!(
        "{}{}",
        encode_timestamp(&ts.naive_local()),
        ts.format("%:z")
    )
}

pub fn encode_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn encode_time(t: &NaiveTime) -> String {
    format!("{}{}", t.format("%H:%M:%S"), micros_suffix(t.nanosecond()))
}

fn micros_suffix(nanos: u32) -> String {
    // Leap seconds carry nanos >= 1e9; fold them into the last microsecond.
    let micros = (nanos / 1_000).min(999_999);
    if micros == 0 {
        String::new()
    } else {
        format!(".{micros:06}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn timestamp_without_fraction() {
        let datum = Datum::Timestamp(ts(2024, 1, 15, 10, 30, 0));
        assert_eq!(normalize(&datum), json!("2024-01-15T10:30:00"));
    }

    #[test]
    fn timestamp_fraction_is_six_digits() {
        let t = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_nano_opt(10, 30, 0, 250_000_789)
            .unwrap();
        assert_eq!(encode_timestamp(&t), "2024-01-15T10:30:00.250000");
    }

    #[test]
    fn offset_timestamp_keeps_offset() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let t = utc.with_ymd_and_hms(2023, 4, 9, 0, 2, 53).unwrap();
        assert_eq!(encode_timestamp_tz(&t), "2023-04-09T00:02:53+00:00");

        let cet = FixedOffset::east_opt(3600).unwrap();
        let t = cet.with_ymd_and_hms(2023, 4, 9, 1, 2, 53).unwrap();
        assert_eq!(encode_timestamp_tz(&t), "2023-04-09T01:02:53+01:00");
    }

    #[test]
    fn date_and_time() {
        let d = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(normalize(&Datum::Date(d)), json!("1999-12-31"));
        let t = NaiveTime::from_hms_micro_opt(7, 5, 9, 42).unwrap();
        assert_eq!(normalize(&Datum::Time(t)), json!("07:05:09.000042"));
    }

    #[test]
    fn native_structure_is_unchanged() {
        let input = json!({"a": [1, {"b": "x"}]});
        assert_eq!(normalize(&Datum::from(input.clone())), input);
    }

    #[test]
    fn nested_timestamps_are_encoded_in_place() {
        let record = Datum::map([
            ("id", Datum::Int(7)),
            (
                "conversation",
                Datum::Seq(vec![Datum::map([
                    ("role", Datum::from("user")),
                    ("timestamp", Datum::Timestamp(ts(2024, 1, 15, 10, 30, 0))),
                ])]),
            ),
        ]);
        assert_eq!(
            normalize(&record),
            json!({
                "id": 7,
                "conversation": [{"role": "user", "timestamp": "2024-01-15T10:30:00"}]
            })
        );
    }

    #[test]
    fn key_order_is_preserved() {
        let record = Datum::map([("zeta", Datum::Null), ("alpha", Datum::Null), ("mid", Datum::Null)]);
        let keys: Vec<_> = normalize(&record).as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(normalize(&Datum::Float(f64::NAN)), Value::Null);
        assert_eq!(normalize(&Datum::Float(f64::INFINITY)), Value::Null);
        assert_eq!(normalize(&Datum::Float(0.5)), json!(0.5));
    }
}
