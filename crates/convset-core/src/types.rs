//! Core types for convset-core.
//!
//! This module defines the loosely-typed record value handed over by every
//! dataset source ([`Datum`]) and the catalog entry describing one dataset to
//! download ([`DatasetSpec`]).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

/// One value inside a dataset record, as produced by a source.
///
/// Mirrors the JSON data model plus the handful of scalar types a dataset
/// hub can hand back that JSON cannot express directly. Mappings keep their
/// insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Seq(Vec<Datum>),
    Map(Vec<(String, Datum)>),
    /// Timestamp without a timezone (`timestamp[us]` and friends).
    Timestamp(NaiveDateTime),
    /// Timestamp carrying a UTC offset (`timestamp[us, tz=UTC]`).
    TimestampTz(DateTime<FixedOffset>),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Datum {
    /// Build a mapping from `(key, value)` pairs, keeping their order.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Datum)>,
    {
        Datum::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Look up a key in a mapping. Returns `None` for every other variant.
    pub fn get(&self, key: &str) -> Option<&Datum> {
        match self {
            Datum::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Datum {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Datum::Null,
            Value::Bool(b) => Datum::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Datum::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Datum::UInt(u)
                } else {
                    Datum::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Datum::String(s),
            Value::Array(items) => Datum::Seq(items.into_iter().map(Datum::from).collect()),
            Value::Object(obj) => Datum::Map(obj.into_iter().map(|(k, v)| (k, Datum::from(v))).collect()),
        }
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::String(s.to_string())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::String(s)
    }
}

impl From<i64> for Datum {
    fn from(i: i64) -> Self {
        Datum::Int(i)
    }
}

impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Datum::Bool(b)
    }
}

impl From<NaiveDateTime> for Datum {
    fn from(ts: NaiveDateTime) -> Self {
        Datum::Timestamp(ts)
    }
}

// ---------------------------------------------------------------------------
// Dataset catalog
// ---------------------------------------------------------------------------

/// Where a dataset's records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A dataset hub rows API; `id` is the hub identifier (`org/name`).
    #[default]
    Hub,
    /// A local `.json` / `.jsonl` file; `id` is its path.
    File,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Hub => write!(f, "hub"),
            SourceKind::File => write!(f, "file"),
        }
    }
}

/// One entry of the dataset catalog (`[[datasets]]` in `config.toml`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetSpec {
    /// Output file stem; records land in `<output.dir>/<name>.json`.
    pub name: String,
    /// Hub identifier or local path, depending on `source`.
    pub id: String,
    #[serde(default)]
    pub source: SourceKind,
    /// Hub config (subset) name. Resolved from the split listing when absent.
    #[serde(default)]
    pub config: Option<String>,
    #[serde(default = "default_split")]
    pub split: String,
    /// Sample size cutoff. `None` takes the whole split.
    #[serde(default)]
    pub max_records: Option<usize>,
    /// Stop at the cutoff without asking the source for a total row count.
    #[serde(default)]
    pub streaming: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_split() -> String {
    "train".to_string()
}

impl DatasetSpec {
    /// Minimal hub spec with defaults for everything but name and id.
    pub fn hub(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            source: SourceKind::Hub,
            config: None,
            split: default_split(),
            max_records: None,
            streaming: false,
            description: None,
        }
    }

    /// Minimal local-file spec.
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            source: SourceKind::File,
            ..Self::hub(name, path)
        }
    }

    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }

    pub fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }
}
