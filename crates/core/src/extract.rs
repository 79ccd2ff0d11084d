//! Recovery of JSON from untrusted generated text
//!
//! Generated output tends to wrap JSON in markdown fences or prose and to
//! carry small syntax slips. Candidates are tried in order: the whole text,
//! a ```json block, any fenced block, then the outermost `{...}`/`[...]`
//! span; each one is retried after light repair.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::inference::{FieldDefinition, FieldType};
use crate::schema::{Schema, SchemaError, normalize_value};

static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

static SINGLE_QUOTED_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']*)'\s*:").unwrap());

static SINGLE_QUOTED_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*'([^']*)'").unwrap());

const LENGTH_KEYWORDS: &[&str] = &["minLength", "maxLength", "minItems", "maxItems"];

/// Parse the JSON value carried by candidate text
pub fn parse_candidate(text: &str) -> Result<Value, SchemaError> {
    let mut last_error = String::from("no JSON content found");

    for candidate in candidates(text) {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = e.to_string(),
        }
        let repaired = repair(candidate);
        if repaired != candidate {
            if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
                debug!("Recovered JSON after repair");
                return Ok(value);
            }
        }
    }

    Err(SchemaError::Candidate(last_error))
}

/// Parse candidate text and normalize it as a schema
pub fn normalize_candidate(text: &str) -> Result<Schema, SchemaError> {
    normalize_value(&parse_candidate(text)?)
}

/// Parse a generated field list
///
/// Accepts a bare array of fields or an object holding them under `fields`.
/// Entries are recovered one by one: an unknown `type` becomes `string`,
/// integral float length bounds (`2.0`) become integers, and an entry that
/// still does not fit is skipped with a warning.
pub fn parse_field_definitions(text: &str) -> Result<Vec<FieldDefinition>, SchemaError> {
    let entries = match parse_candidate(text)? {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.shift_remove("fields") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(SchemaError::Candidate("expected a list of fields".to_string())),
        },
        _ => return Err(SchemaError::Candidate("expected a list of fields".to_string())),
    };

    let mut fields = Vec::with_capacity(entries.len());
    for (index, mut entry) in entries.into_iter().enumerate() {
        if let Ok(field) = serde_json::from_value::<FieldDefinition>(entry.clone()) {
            fields.push(field);
            continue;
        }
        coerce_field(&mut entry);
        match serde_json::from_value::<FieldDefinition>(entry) {
            Ok(field) => fields.push(field),
            Err(e) => warn!(index, error = %e, "Skipping unusable field definition"),
        }
    }
    Ok(fields)
}

/// Bring a loosely shaped field entry in line with [`FieldDefinition`]
fn coerce_field(entry: &mut Value) {
    let Value::Object(field) = entry else {
        return;
    };
    coerce_type(field);

    if let Some(Value::Object(constraints)) = field.get_mut("constraints") {
        for key in LENGTH_KEYWORDS {
            if let Some(bound) = constraints.get_mut(*key) {
                if let Some(whole) = bound.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0) {
                    *bound = Value::from(whole as u64);
                }
            }
        }
    }
    if let Some(Value::Array(children)) = field.get_mut("properties") {
        children.iter_mut().for_each(coerce_field);
    }
    if let Some(Value::Object(items)) = field.get_mut("items") {
        coerce_type(items);
        if let Some(Value::Array(children)) = items.get_mut("properties") {
            children.iter_mut().for_each(coerce_field);
        }
    }
}

fn coerce_type(level: &mut Map<String, Value>) {
    if let Some(Value::String(name)) = level.get("type") {
        if FieldType::parse(name).is_none() {
            debug!(field_type = name.as_str(), "Unknown field type, using string");
            level.insert("type".to_string(), Value::String("string".to_string()));
        }
    }
}

fn candidates(text: &str) -> Vec<&str> {
    let trimmed = text.trim();
    let mut out = vec![trimmed];

    if let Some(start) = trimmed.find("```json") {
        let content_start = start + 7;
        if let Some(end) = trimmed[content_start..].find("```") {
            out.push(trimmed[content_start..content_start + end].trim());
        }
    }

    if let Some(start) = trimmed.find("```") {
        let content_start = start + 3;
        // Skip language identifier if present
        let content_start = trimmed[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start);
        if let Some(end) = trimmed[content_start..].find("```") {
            out.push(trimmed[content_start..content_start + end].trim());
        }
    }

    let open = trimmed.find(['{', '[']);
    if let Some(start) = open {
        let close = if trimmed[start..].starts_with('{') { '}' } else { ']' };
        if let Some(end) = trimmed.rfind(close) {
            if end > start {
                out.push(&trimmed[start..=end]);
            }
        }
    }

    out.dedup();
    out
}

fn repair(candidate: &str) -> String {
    let fixed = TRAILING_COMMA.replace_all(candidate, "$1");
    let fixed = SINGLE_QUOTED_KEY.replace_all(&fixed, "\"$1\":");
    let fixed = SINGLE_QUOTED_VALUE.replace_all(&fixed, ": \"$1\"");
    fixed.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        assert_eq!(parse_candidate(r#" {"a": 1} "#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_fenced_blocks() {
        let text = "Here you go:\n```json\n{\"a\": [1, 2]}\n```\nThanks";
        assert_eq!(parse_candidate(text).unwrap(), json!({"a": [1, 2]}));

        let generic = "```\n[{\"b\": true}]\n```";
        assert_eq!(parse_candidate(generic).unwrap(), json!([{"b": true}]));
    }

    #[test]
    fn test_embedded_span() {
        let text = "The schema is {\"type\": \"object\"} as requested.";
        assert_eq!(parse_candidate(text).unwrap(), json!({"type": "object"}));
    }

    #[test]
    fn test_repairs_trailing_commas_and_single_quotes() {
        let text = "{'name': 'Alice', 'tags': [1, 2,],}";
        assert_eq!(
            parse_candidate(text).unwrap(),
            json!({"name": "Alice", "tags": [1, 2]})
        );
    }

    #[test]
    fn test_unrecoverable_text() {
        assert!(matches!(
            parse_candidate("no json here"),
            Err(SchemaError::Candidate(_))
        ));
    }

    #[test]
    fn test_normalize_candidate() {
        let text = "```json\n{\"properties\": {\"a\": {\"type\": \"string\", \"required\": true}}}\n```";
        let schema = normalize_candidate(text).unwrap();
        assert_eq!(schema.required(), vec!["a".to_string()]);

        assert!(matches!(
            normalize_candidate("[1, 2]"),
            Err(SchemaError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_parse_field_definitions() {
        let bare = r#"[{"name": "age", "type": "int", "required": true}]"#;
        let fields = parse_field_definitions(bare).unwrap();
        assert_eq!(fields[0].field_type, FieldType::Integer);
        assert!(fields[0].required);

        let wrapped = r#"{"fields": [{"name": "at", "type": "date-time"}]}"#;
        let fields = parse_field_definitions(wrapped).unwrap();
        assert_eq!(fields[0].field_type, FieldType::Datetime);
        assert!(fields[0].path.is_empty());

        assert!(parse_field_definitions(r#"{"other": 1}"#).is_err());
    }

    #[test]
    fn test_field_definitions_recover_per_entry() {
        let text = r#"[
            {"name": "id", "path": "id", "type": "string"},
            {"name": "u", "path": "u", "type": "uuid"},
            {"name": "code", "type": "string", "constraints": {"minLength": 2.0}},
            {"name": "broken", "type": "string", "required": "sometimes"},
            "not a field"
        ]"#;
        let fields = parse_field_definitions(text).unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "u", "code"]);
        assert_eq!(fields[1].field_type, FieldType::String);
        assert_eq!(fields[2].constraints.min_length, Some(2));
    }

    #[test]
    fn test_nested_field_types_are_coerced() {
        let text = r#"{"fields": [{
            "name": "owner",
            "type": "object",
            "properties": [{"name": "ref", "type": "objectid"}]
        }]}"#;
        let fields = parse_field_definitions(text).unwrap();
        let children = fields[0].properties.as_ref().unwrap();
        assert_eq!(children[0].field_type, FieldType::String);
    }
}
