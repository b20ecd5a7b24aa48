//! Heuristic extraction of short display text from JSON payloads of unknown
//! shape.
//!
//! Each payload family has an ordered list of shape matchers. A matcher
//! is a pure function from a JSON value to an optional string; the first
//! one that yields text wins.

use serde_json::Value;

pub mod chat;
pub mod rest;

pub use chat::extract_answer;
pub use rest::extract_definition;

pub type ShapeMatcher = fn(&Value) -> Option<String>;

pub(crate) fn first_match(value: &Value, shapes: &[ShapeMatcher]) -> Option<String> {
    shapes.iter().find_map(|shape| shape(value))
}

/// `null`, `false`, `0` and `""` count as absent
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings as-is, anything else as compact JSON
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First present (truthy) field among `keys`, in priority order
pub(crate) fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|field| is_truthy(field))
}
