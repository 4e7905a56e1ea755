//! Typed lifting of hub cells into [`Datum`] values.
//!
//! The rows API returns plain JSON plus a `features` description of each
//! column. Timestamp, date and time columns arrive as strings or epoch
//! numbers; this module uses the feature type to turn them back into the
//! matching chrono scalar so the normalizer encodes them canonically.
//! Anything that does not parse stays exactly as the API sent it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use convset_core::Datum;
use serde_json::{Map, Value};

/// Lift one row, using the `name → feature type` map from the page.
pub fn lift_row(row: Map<String, Value>, features: &Map<String, Value>) -> Datum {
    Datum::Map(
        row.into_iter()
            .map(|(name, cell)| {
                let lifted = lift(cell, features.get(&name));
                (name, lifted)
            })
            .collect(),
    )
}

/// Lift one cell given its feature type, if any.
///
/// Feature shapes handled: `{"_type": "Value", "dtype": ...}`,
/// `{"_type": "Sequence" | "List" | "LargeList", "feature": ...}`, the
/// `[inner]` list shorthand, and plain `{field: feature}` structs.
pub fn lift(cell: Value, feature: Option<&Value>) -> Datum {
    let Some(feature) = feature else {
        return Datum::from(cell);
    };
    match feature {
        Value::Array(inner) => lift_list(cell, inner.first()),
        Value::Object(f) => match f.get("_type").and_then(Value::as_str) {
            Some("Value") => {
                let dtype = f.get("dtype").and_then(Value::as_str).unwrap_or_default();
                lift_scalar(cell, dtype)
            }
            Some("Sequence" | "List" | "LargeList") => lift_list(cell, f.get("feature")),
            Some(_) => Datum::from(cell),
            None => lift_struct(cell, f),
        },
        _ => Datum::from(cell),
    }
}

fn lift_list(cell: Value, inner: Option<&Value>) -> Datum {
    match cell {
        Value::Array(items) => Datum::Seq(items.into_iter().map(|i| lift(i, inner)).collect()),
        // A sequence of structs is served column-wise: {field: [values]}.
        Value::Object(columns) => Datum::Map(
            columns
                .into_iter()
                .map(|(k, v)| {
                    let sub = inner.and_then(|f| f.get(&k));
                    let lifted = lift_list(v, sub);
                    (k, lifted)
                })
                .collect(),
        ),
        other => Datum::from(other),
    }
}

fn lift_struct(cell: Value, fields: &Map<String, Value>) -> Datum {
    match cell {
        Value::Object(obj) => Datum::Map(
            obj.into_iter()
                .map(|(k, v)| {
                    let lifted = lift(v, fields.get(&k));
                    (k, lifted)
                })
                .collect(),
        ),
        other => Datum::from(other),
    }
}

fn lift_scalar(cell: Value, dtype: &str) -> Datum {
    let parsed = if dtype.starts_with("timestamp") {
        parse_timestamp(&cell, dtype)
    } else if dtype.starts_with("date") {
        parse_date(&cell, dtype)
    } else if dtype.starts_with("time") {
        parse_time(&cell, dtype)
    } else {
        None
    };
    parsed.unwrap_or_else(|| Datum::from(cell))
}

// ---------------------------------------------------------------------------
// Scalar parsers
// ---------------------------------------------------------------------------

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Unit inside `timestamp[us, tz=UTC]`, `time64[ns]`, ...
fn unit_of(dtype: &str) -> &str {
    dtype
        .split_once('[')
        .map(|(_, rest)| rest.split([',', ']']).next().unwrap_or("").trim())
        .unwrap_or("")
}

fn parse_timestamp(cell: &Value, dtype: &str) -> Option<Datum> {
    let has_tz = dtype.contains("tz=");
    match cell {
        Value::String(s) => {
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(Datum::TimestampTz(ts));
            }
            let naive = NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())?;
            Some(if has_tz {
                Datum::TimestampTz(naive.and_utc().fixed_offset())
            } else {
                Datum::Timestamp(naive)
            })
        }
        Value::Number(n) => {
            let raw = n.as_i64()?;
            let utc = match unit_of(dtype) {
                "s" => DateTime::from_timestamp(raw, 0)?,
                "ms" => DateTime::from_timestamp_millis(raw)?,
                "ns" => DateTime::from_timestamp(
                    raw.div_euclid(1_000_000_000),
                    u32::try_from(raw.rem_euclid(1_000_000_000)).ok()?,
                )?,
                _ => DateTime::from_timestamp_micros(raw)?,
            };
            Some(if has_tz {
                Datum::TimestampTz(utc.fixed_offset())
            } else {
                Datum::Timestamp(utc.naive_utc())
            })
        }
        _ => None,
    }
}

fn parse_date(cell: &Value, dtype: &str) -> Option<Datum> {
    match cell {
        Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Datum::Date),
        Value::Number(n) => {
            let raw = n.as_i64()?;
            let date = if dtype.starts_with("date64") {
                DateTime::from_timestamp_millis(raw)?.date_naive()
            } else {
                DateTime::from_timestamp(raw.checked_mul(86_400)?, 0)?.date_naive()
            };
            Some(Datum::Date(date))
        }
        _ => None,
    }
}

fn parse_time(cell: &Value, dtype: &str) -> Option<Datum> {
    match cell {
        Value::String(s) => NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok().map(Datum::Time),
        Value::Number(n) => {
            let raw = n.as_i64()?;
            let nanos: i64 = match unit_of(dtype) {
                "s" => raw.checked_mul(1_000_000_000)?,
                "ms" => raw.checked_mul(1_000_000)?,
                "ns" => raw,
                _ => raw.checked_mul(1_000)?,
            };
            let secs = u32::try_from(nanos / 1_000_000_000).ok()?;
            let frac = u32::try_from(nanos % 1_000_000_000).ok()?;
            NaiveTime::from_num_seconds_from_midnight_opt(secs, frac).map(Datum::Time)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
