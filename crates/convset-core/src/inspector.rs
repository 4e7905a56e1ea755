//! Inspector — structural and statistical summary of a normalized dataset.
//!
//! Conversation datasets on the hub do not agree on a shape. The inspector
//! keys everything off the *first* record: its field names decide which
//! statistics are computed, and which preview shape is rendered. Statistics
//! themselves always run over every record.
//!
//! | first record has  | computed                                       |
//! |-------------------|------------------------------------------------|
//! | `conversation`    | min / max / mean turn count over all records   |
//! | `language`        | top 5 languages, percent of *all* records      |
//!
//! Preview priority: `conversation` (3 turns) → `messages` (2 turns) →
//! `chosen` (150 chars) → pretty-printed structure (300 chars).

use crate::error::{kind_of, InspectError};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const CONVERSATION_FIELD: &str = "conversation";
pub const MESSAGES_FIELD: &str = "messages";
pub const CHOSEN_FIELD: &str = "chosen";
pub const LANGUAGE_FIELD: &str = "language";

/// How many languages the frequency table keeps.
pub const TOP_LANGUAGES: usize = 5;

const CONVERSATION_PREVIEW_TURNS: usize = 3;
const MESSAGES_PREVIEW_TURNS: usize = 2;
const TURN_CONTENT_CHARS: usize = 100;
const CHOSEN_CHARS: usize = 150;
const STRUCTURE_CHARS: usize = 300;
const OVERVIEW_SCALAR_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// Read-only report derived from one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    /// Keys of the first record, in record order.
    pub fields: Vec<String>,
    pub turns: Option<TurnStats>,
    pub languages: Option<Vec<CategoryCount>>,
    pub preview: Option<Preview>,
}

impl Summary {
    fn empty() -> Self {
        Self {
            count: 0,
            fields: Vec::new(),
            turns: None,
            languages: None,
            preview: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Distribution of conversation lengths. Records without the field count as 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// Share of the total record count, 0–100.
    pub percent: f64,
}

/// Rendered example of the first record.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Leading turns of a `conversation` or `messages` field.
    Turns { field: &'static str, turns: Vec<Turn> },
    /// Prefix of a preference pair's `chosen` text.
    Chosen(String),
    /// Prefix of the pretty-printed record.
    Structure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

/// One line of the quick field overview printed after a download.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOverview {
    Collection {
        key: String,
        kind: &'static str,
        items: usize,
    },
    Scalar {
        key: String,
        preview: String,
        truncated: bool,
    },
}

// ---------------------------------------------------------------------------
// Summarize
// ---------------------------------------------------------------------------

/// Summarize a dataset. Fails only when the first record is not a mapping.
pub fn summarize(records: &[Value]) -> Result<Summary, InspectError> {
    let Some(first) = records.first() else {
        return Ok(Summary::empty());
    };
    let first = first.as_object().ok_or(InspectError::RecordNotObject {
        index: 0,
        found: kind_of(first),
    })?;

    let turns = first
        .contains_key(CONVERSATION_FIELD)
        .then(|| turn_stats(records));
    let languages = first
        .contains_key(LANGUAGE_FIELD)
        .then(|| top_categories(records, LANGUAGE_FIELD, TOP_LANGUAGES));

    Ok(Summary {
        count: records.len(),
        fields: first.keys().cloned().collect(),
        turns,
        languages,
        preview: Some(preview(first)),
    })
}

/// Caller guarantees `records` is non-empty.
fn turn_stats(records: &[Value]) -> TurnStats {
    let lengths: Vec<usize> = records
        .iter()
        .map(|r| {
            r.get(CONVERSATION_FIELD)
                .and_then(Value::as_array)
                .map_or(0, Vec::len)
        })
        .collect();

    TurnStats {
        min: lengths.iter().copied().min().unwrap_or(0),
        max: lengths.iter().copied().max().unwrap_or(0),
        mean: lengths.iter().sum::<usize>() as f64 / lengths.len() as f64,
    }
}

/// Frequency table over `field`, most common first, ties in first-seen order.
///
/// NOTE: the percentage denominator is the total record count, including
/// records where the field is absent or falsy.
pub fn top_categories(records: &[Value], field: &str, top_n: usize) -> Vec<CategoryCount> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for value in records.iter().filter_map(|r| r.get(field)) {
        if !is_truthy(value) {
            continue;
        }
        let key = display_text(value);
        match index.get(&key) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, 1));
            }
        }
    }

    // Stable sort keeps first-encountered order among equal counts.
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(top_n);

    let total = records.len() as f64;
    order
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value,
            count,
            percent: 100.0 * count as f64 / total,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// Render a preview of one record using the first matching known shape.
pub fn preview(record: &Map<String, Value>) -> Preview {
    if let Some(conversation) = record.get(CONVERSATION_FIELD) {
        return Preview::Turns {
            field: CONVERSATION_FIELD,
            turns: leading_turns(
                conversation,
                CONVERSATION_PREVIEW_TURNS,
                &["role", "speaker_role"],
                &["content", "utterance"],
            ),
        };
    }
    if let Some(messages) = record.get(MESSAGES_FIELD) {
        return Preview::Turns {
            field: MESSAGES_FIELD,
            turns: leading_turns(messages, MESSAGES_PREVIEW_TURNS, &["role"], &["content"]),
        };
    }
    if let Some(chosen) = record.get(CHOSEN_FIELD) {
        return Preview::Chosen(truncate(&display_text(chosen), CHOSEN_CHARS));
    }
    let pretty = serde_json::to_string_pretty(record).unwrap_or_default();
    Preview::Structure(truncate(&pretty, STRUCTURE_CHARS))
}

fn leading_turns(value: &Value, limit: usize, role_keys: &[&str], content_keys: &[&str]) -> Vec<Turn> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .take(limit)
        .map(|turn| Turn {
            role: first_present(turn, role_keys).unwrap_or_else(|| "unknown".to_string()),
            content: truncate(
                &first_present(turn, content_keys).unwrap_or_default(),
                TURN_CONTENT_CHARS,
            ),
        })
        .collect()
}

/// Text of the first key that is present and non-null.
fn first_present(turn: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| turn.get(*k))
        .find(|v| !v.is_null())
        .map(display_text)
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// One line per top-level field: collection sizes, or a short scalar preview.
/// Non-mapping records have no fields and yield an empty overview.
pub fn overview(record: &Value) -> Vec<FieldOverview> {
    let Some(obj) = record.as_object() else {
        return Vec::new();
    };
    obj.iter()
        .map(|(key, value)| match value {
            Value::Array(items) => FieldOverview::Collection {
                key: key.clone(),
                kind: "list",
                items: items.len(),
            },
            Value::Object(fields) => FieldOverview::Collection {
                key: key.clone(),
                kind: "dict",
                items: fields.len(),
            },
            scalar => {
                let text = display_text(scalar);
                FieldOverview::Scalar {
                    key: key.clone(),
                    truncated: text.chars().count() > OVERVIEW_SCALAR_CHARS,
                    preview: truncate(&text, OVERVIEW_SCALAR_CHARS),
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// First `max` characters of `s` (characters, not bytes).
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Strings as-is, everything else as compact JSON.
fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
