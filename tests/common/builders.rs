//! Test builders — ergonomic constructors for conversation records.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use fake::faker::lorem::en::Sentence;
use fake::Fake;
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for normalized conversation records.
///
/// # Example
///
/// ```rust,ignore
/// let record = RecordBuilder::new()
///     .turn("user", "hello")
///     .turn("assistant", "hi there")
///     .language("English")
///     .build();
/// ```
pub struct RecordBuilder {
    turns_field: &'static str,
    turns: Vec<Value>,
    fields: Map<String, Value>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            turns_field: "conversation",
            turns: Vec::new(),
            fields: Map::new(),
        }
    }

    /// Put the turns under `messages` instead of `conversation`.
    pub fn as_messages(mut self) -> Self {
        self.turns_field = "messages";
        self
    }

    pub fn turn(mut self, role: &str, content: &str) -> Self {
        self.turns.push(json!({"role": role, "content": content}));
        self
    }

    /// Append `n` alternating user/assistant turns with lorem content.
    pub fn random_turns(mut self, n: usize) -> Self {
        for i in 0..n {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            let content: String = Sentence(3..12).fake();
            self.turns.push(json!({"role": role, "content": content}));
        }
        self
    }

    pub fn language(self, language: &str) -> Self {
        self.field("language", language)
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> Value {
        let mut record = Map::new();
        record.insert(self.turns_field.to_string(), Value::Array(self.turns));
        record.extend(self.fields);
        Value::Object(record)
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `n` random conversations, each with between 1 and 8 turns.
pub fn random_conversations(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            RecordBuilder::new()
                .random_turns(1 + i % 8)
                .language(if i % 3 == 0 { "Portuguese" } else { "English" })
                .field("id", i)
                .build()
        })
        .collect()
}
