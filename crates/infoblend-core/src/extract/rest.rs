use serde_json::Value;

use super::{ShapeMatcher, display_text, first_match, first_present, is_truthy};

const SHAPES: &[ShapeMatcher] = &[entry_array, nested_object];

/// Short definition from a dictionary-style payload, formatted as
/// `(<part of speech>): <first clause>`.
pub fn extract_definition(value: Option<&Value>) -> Option<String> {
    let value = value.filter(|v| is_truthy(v))?;
    first_match(value, SHAPES)
}

/// `(pos): text`, cut at the first semicolon
fn format_definition(pos: &str, raw: &Value) -> Option<String> {
    if !is_truthy(raw) {
        return None;
    }

    let text = match raw {
        Value::String(s) => s.clone(),
        other => match other.get("definition").filter(|d| is_truthy(d)) {
            Some(definition) => display_text(definition),
            None => display_text(other),
        },
    };

    let first_clause = text.split(';').next().unwrap_or_default().trim();
    let pos = if pos.is_empty() { "def" } else { pos };

    Some(format!("({pos}): {first_clause}"))
}

fn part_of_speech(value: &Value, keys: &[&str]) -> String {
    first_present(value, keys)
        .map(display_text)
        .unwrap_or_default()
}

fn from_meanings(meanings: Option<&Value>) -> Option<String> {
    let meanings = meanings?.as_array()?;

    meanings
        .iter()
        .filter(|m| is_truthy(m))
        .find_map(|meaning| {
            let defs = first_present(meaning, &["definitions", "definition", "defs"])?;
            let candidate = match defs {
                Value::Array(items) => items.first(),
                Value::String(_) => Some(defs),
                _ => None,
            }
            .filter(|c| is_truthy(c))?;

            format_definition(&part_of_speech(meaning, &["partOfSpeech", "type"]), candidate)
        })
}

fn first_shortdef(value: &Value, pos: &str) -> Option<String> {
    let first = value.get("shortdef")?.as_array()?.first()?;
    format_definition(pos, first)
}

fn definition_field(value: &Value, pos: &str) -> Option<String> {
    let definition = value.get("definition").filter(|d| d.is_string())?;
    format_definition(pos, definition)
}

/// `[{ meanings: [...] }, ...]`, the dictionaryapi.dev layout
fn entry_array(value: &Value) -> Option<String> {
    let entries = value.as_array()?;

    entries.iter().filter(|e| is_truthy(e)).find_map(|entry| {
        from_meanings(first_present(entry, &["meanings", "meaning", "senses"]))
            .or_else(|| first_shortdef(entry, ""))
            .or_else(|| definition_field(entry, ""))
    })
}

/// Objects that nest entries under `results`, `entries` or `senses`
fn nested_object(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    let pos = part_of_speech(value, &["partOfSpeech"]);

    if let Some(found) = from_meanings(object.get("meanings").filter(|m| is_truthy(m))) {
        return Some(found);
    }

    for key in ["results", "entries"] {
        if let Some(found) = object
            .get(key)
            .and_then(Value::as_array)
            .and_then(|items| items.iter().find_map(nested_object))
        {
            return Some(found);
        }
    }

    if let Some(senses) = object.get("senses").and_then(Value::as_array) {
        let found = senses.iter().find_map(|sense| {
            match sense.get("definition").filter(|d| is_truthy(d)) {
                Some(definition) => format_definition(&pos, definition),
                None => sense
                    .get("definitions")
                    .and_then(Value::as_array)
                    .and_then(|defs| defs.first())
                    .and_then(|first| format_definition(&pos, first)),
            }
        });
        if found.is_some() {
            return found;
        }
    }

    first_shortdef(value, &pos).or_else(|| definition_field(value, &pos))
}
