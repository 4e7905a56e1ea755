//! Static record corpora used across harnesses.
//!
//! Each fixture returns already-normalized records (`serde_json::Value`), the
//! shape the inspector reads back from disk.

use serde_json::{json, Value};

/// Three conversations of 2, 5 and 3 turns, all in English.
pub fn conversation_records() -> Vec<Value> {
    [2usize, 5, 3]
        .iter()
        .enumerate()
        .map(|(i, &turns)| {
            let conversation: Vec<Value> = (0..turns)
                .map(|t| {
                    json!({
                        "role": if t % 2 == 0 { "user" } else { "assistant" },
                        "content": format!("message {t} of conversation {i}"),
                    })
                })
                .collect();
            json!({
                "conversation_id": format!("conv-{i}"),
                "conversation": conversation,
                "language": "English",
                "timestamp": "2024-01-15T10:30:00",
            })
        })
        .collect()
}

/// 100 records: 60 English, 30 Spanish, 10 French.
pub fn language_corpus() -> Vec<Value> {
    let mut records = Vec::with_capacity(100);
    for (language, n) in [("English", 60), ("Spanish", 30), ("French", 10)] {
        for i in 0..n {
            records.push(json!({"id": records.len(), "language": language, "turn": i}));
        }
    }
    records
}

/// A chat-template record with a `messages` list and no `conversation`.
pub fn messages_record() -> Value {
    json!({
        "prompt": "How do I boil an egg?",
        "messages": [
            {"role": "user", "content": "How do I boil an egg?"},
            {"role": "assistant", "content": "Place it in boiling water for about nine minutes."},
            {"role": "user", "content": "And for a soft yolk?"},
        ],
    })
}

/// A preference-pair record with `chosen`/`rejected` transcripts.
pub fn chosen_record() -> Value {
    json!({
        "chosen": "\n\nHuman: What is the capital of France?\n\nAssistant: Paris.",
        "rejected": "\n\nHuman: What is the capital of France?\n\nAssistant: London.",
    })
}

/// A record with none of the conversation fields.
pub fn structure_record() -> Value {
    json!({"question": "2 + 2?", "answer": 4, "tags": ["math", "easy"]})
}

/// Hub `features` list for [`hub_rows`], in the rows API's own shape.
pub fn hub_features() -> Value {
    json!([
        {"feature_idx": 0, "name": "conversation_id", "type": {"dtype": "string", "_type": "Value"}},
        {"feature_idx": 1, "name": "conversation", "type": [
            {"role": {"dtype": "string", "_type": "Value"}, "content": {"dtype": "string", "_type": "Value"}}
        ]},
        {"feature_idx": 2, "name": "language", "type": {"dtype": "string", "_type": "Value"}},
        {"feature_idx": 3, "name": "created", "type": {"dtype": "timestamp[s]", "_type": "Value"}},
    ])
}

/// `n` hub rows matching [`hub_features`]. `created` is epoch seconds
/// starting at 2024-01-15T10:30:00.
pub fn hub_rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "conversation_id": format!("conv-{i}"),
                "conversation": [
                    {"role": "user", "content": format!("question {i}")},
                    {"role": "assistant", "content": format!("answer {i}")},
                ],
                "language": if i % 4 == 0 { "Portuguese" } else { "English" },
                "created": 1_705_314_600 + i as i64,
            })
        })
        .collect()
}
