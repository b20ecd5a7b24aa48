use serde_json::Value;

use super::{ShapeMatcher, display_text, first_match, is_truthy};

const SHAPES: &[ShapeMatcher] = &[candidate_parts, output_content, chat_choices, first_text_field];

/// Plain-text answer from a chat completion payload
pub fn extract_answer(value: Option<&Value>) -> Option<String> {
    first_match(value?, SHAPES)
}

fn trimmed(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    let text = display_text(value).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// `candidates[0].content.parts[0].text`
fn candidate_parts(value: &Value) -> Option<String> {
    let candidate = value.get("candidates")?.as_array()?.first()?;
    let part = candidate.get("content")?.get("parts")?.as_array()?.first()?;
    trimmed(part.get("text")?)
}

/// `output[0].content[0].text`
fn output_content(value: &Value) -> Option<String> {
    let output = value.get("output")?.as_array()?.first()?;
    let content = output.get("content")?.as_array()?.first()?;
    trimmed(content.get("text")?)
}

/// `choices[0].message.content`, else `choices[0].text`
fn chat_choices(value: &Value) -> Option<String> {
    let choice = value.get("choices")?.as_array()?.first()?;
    choice
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(trimmed)
        .or_else(|| choice.get("text").and_then(trimmed))
}

/// First non-blank string field, or first element of a string array field.
/// Top-level arrays are scanned element by element the same way.
fn first_text_field(value: &Value) -> Option<String> {
    let text_of = |field: &Value| match field {
        Value::String(_) => trimmed(field),
        Value::Array(items) => items.first().filter(|i| i.is_string()).and_then(trimmed),
        _ => None,
    };

    match value {
        Value::Object(fields) => fields.values().find_map(text_of),
        Value::Array(items) => items.iter().find_map(text_of),
        _ => None,
    }
}
