//! Schema normalization
//!
//! Rewrites any schema-shaped object into a well-formed object schema:
//! `required` becomes an array at every object level, per-property required
//! markers are promoted into their parent, single-field response envelopes
//! are unwrapped and composition keywords are normalized recursively.

use serde_json::{Map, Value};
use tracing::debug;

use super::document::{Schema, json_type_name};
use super::error::SchemaError;
use super::required::Required;

/// Property names treated as response envelopes (compared case-insensitively)
pub const ENVELOPE_NAMES: &[&str] = &["response", "data", "result", "body", "content", "payload"];

/// Keywords lifted out of a nested `constraints` bag
const CONSTRAINT_KEYWORDS: &[&str] = &[
    "minLength",
    "maxLength",
    "minimum",
    "maximum",
    "enum",
    "pattern",
    "minItems",
    "maxItems",
    "format",
];

const COMPOSITION_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf"];

/// Normalize a schema, returning a new one
///
/// Idempotent: normalizing the result again yields the same schema.
pub fn normalize(schema: &Schema) -> Schema {
    Schema::from_map(normalize_map(schema.as_map()))
}

/// Normalize an arbitrary JSON value that is expected to be an object schema
pub fn normalize_value(value: &Value) -> Result<Schema, SchemaError> {
    match value {
        Value::Object(map) => Ok(Schema::from_map(normalize_map(map))),
        other => Err(SchemaError::NotAnObject {
            found: json_type_name(other).to_string(),
        }),
    }
}

fn normalize_map(input: &Map<String, Value>) -> Map<String, Value> {
    if let Some((name, inner)) = envelope(input) {
        debug!(wrapper = name, "Unwrapping response envelope");
        return normalize_map(inner);
    }

    let mut level = input.clone();
    lift_constraints(&mut level);

    let raw_required = level.shift_remove("required");
    let mut promoted: Vec<String> = Vec::new();
    let mut property_names: Vec<String> = Vec::new();

    if let Some(Value::Object(props)) = level.get("properties") {
        let mut normalized = Map::with_capacity(props.len());
        for (name, prop) in props {
            property_names.push(name.clone());
            match prop {
                Value::Object(prop) => {
                    let prop = normalize_property(name, prop, &mut promoted);
                    normalized.insert(name.clone(), Value::Object(prop));
                }
                other => {
                    normalized.insert(name.clone(), other.clone());
                }
            }
        }
        level.insert("properties".to_string(), Value::Object(normalized));
    }

    let required = Required::from_value(raw_required.as_ref());
    let is_object_level = level.contains_key("properties")
        || level.get("type").and_then(Value::as_str) == Some("object");
    if !required.is_absent() || is_object_level || !promoted.is_empty() {
        let names = required.resolve(&property_names, &promoted);
        level.insert(
            "required".to_string(),
            Value::Array(names.into_iter().map(Value::String).collect()),
        );
    }

    if let Some(Value::Object(items)) = level.get("items") {
        let items = normalize_map(items);
        level.insert("items".to_string(), Value::Object(items));
    }

    for keyword in COMPOSITION_KEYWORDS {
        if let Some(Value::Array(members)) = level.get(*keyword) {
            let members = members
                .iter()
                .map(|member| match member {
                    Value::Object(map) => Value::Object(normalize_map(map)),
                    other => other.clone(),
                })
                .collect();
            level.insert(keyword.to_string(), Value::Array(members));
        }
    }

    level
}

/// Normalize one property and strip its `required` marker
///
/// A boolean marker is read before recursion and promotes the property's own
/// name. Any names required inside the property are promoted as dotted paths.
fn normalize_property(
    name: &str,
    prop: &Map<String, Value>,
    promoted: &mut Vec<String>,
) -> Map<String, Value> {
    let mut prop = prop.clone();
    let flag = match prop.get("required") {
        Some(Value::Bool(flag)) => {
            let flag = *flag;
            prop.shift_remove("required");
            Some(flag)
        }
        Some(Value::Array(_)) | None => None,
        Some(_) => {
            prop.shift_remove("required");
            None
        }
    };

    let mut normalized = normalize_map(&prop);

    if flag == Some(true) && !promoted.iter().any(|p| p == name) {
        debug!(property = name, "Promoting required flag");
        promoted.push(name.to_string());
    }

    if let Some(nested) = normalized.shift_remove("required") {
        if let Required::Explicit(entries) = Required::from_value(Some(&nested)) {
            for entry in entries {
                let path = format!("{}.{}", name, entry);
                if !promoted.contains(&path) {
                    promoted.push(path);
                }
            }
        }
    }

    normalized
}

/// Detect a single-property response envelope around the real schema
fn envelope(level: &Map<String, Value>) -> Option<(&str, &Map<String, Value>)> {
    let props = level.get("properties")?.as_object()?;
    if props.len() != 1 {
        return None;
    }
    let (name, inner) = props.iter().next()?;
    let inner = inner.as_object()?;

    let is_wrapper = ENVELOPE_NAMES
        .iter()
        .any(|wrapper| wrapper.eq_ignore_ascii_case(name));
    let is_object = inner.get("type").and_then(Value::as_str) == Some("object");

    if is_wrapper && is_object && inner.contains_key("properties") {
        Some((name.as_str(), inner))
    } else {
        None
    }
}

/// Move entries of a nested `constraints` object onto the schema itself
///
/// Keys already present on the schema win over the bag.
fn lift_constraints(level: &mut Map<String, Value>) {
    if !matches!(level.get("constraints"), Some(Value::Object(_))) {
        return;
    }
    if let Some(Value::Object(bag)) = level.shift_remove("constraints") {
        for (key, value) in bag {
            if CONSTRAINT_KEYWORDS.contains(&key.as_str()) && !level.contains_key(&key) {
                level.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn norm(value: Value) -> Value {
        normalize_value(&value).unwrap().into_value()
    }

    #[test]
    fn test_promotes_boolean_required() {
        let out = norm(json!({"properties": {"a": {"type": "string", "required": true}}}));
        assert_eq!(out["required"], json!(["a"]));
        assert_eq!(out["properties"]["a"], json!({"type": "string"}));
    }

    #[test]
    fn test_false_marker_is_dropped() {
        let out = norm(json!({
            "type": "object",
            "properties": {"a": {"type": "string", "required": false}},
            "required": ["b"]
        }));
        assert_eq!(out["required"], json!(["b"]));
        assert!(out["properties"]["a"].get("required").is_none());
    }

    #[test]
    fn test_nested_required_promoted_as_paths() {
        let out = norm(json!({
            "type": "object",
            "properties": {
                "user": {
                    "type": "object",
                    "properties": {"email": {"type": "string", "required": true}},
                    "required": ["name"]
                }
            }
        }));
        assert_eq!(out["required"], json!(["user.name", "user.email"]));
        assert!(out["properties"]["user"].get("required").is_none());
    }

    #[test]
    fn test_required_true_at_level() {
        let out = norm(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}, "b": {"type": "integer"}},
            "required": true
        }));
        assert_eq!(out["required"], json!(["a", "b"]));

        let none = norm(json!({"type": "object", "required": true}));
        assert_eq!(none["required"], json!([]));
    }

    #[test]
    fn test_required_false_at_level() {
        let out = norm(json!({
            "type": "object",
            "properties": {"a": {"type": "string", "required": true}, "b": {"type": "string"}},
            "required": false
        }));
        assert_eq!(out["required"], json!(["a"]));
    }

    #[test]
    fn test_required_array_union() {
        let out = norm(json!({
            "type": "object",
            "properties": {"a": {"type": "string", "required": true}, "b": {"type": "string"}},
            "required": ["b", "a"]
        }));
        assert_eq!(out["required"], json!(["b", "a"]));
    }

    #[test]
    fn test_absent_required_becomes_empty_array() {
        let out = norm(json!({"type": "object", "properties": {"a": {"type": "string"}}}));
        assert_eq!(out["required"], json!([]));
    }

    #[test]
    fn test_envelope_unwrap() {
        let out = norm(json!({
            "properties": {
                "response": {"type": "object", "properties": {"id": {"type": "integer"}}}
            }
        }));
        assert_eq!(out["properties"], json!({"id": {"type": "integer"}}));
        assert_eq!(out["required"], json!([]));
    }

    #[test]
    fn test_envelope_names_are_case_insensitive_and_nested() {
        let out = norm(json!({
            "properties": {
                "Data": {
                    "type": "object",
                    "properties": {
                        "payload": {"type": "object", "properties": {"x": {"type": "string"}}}
                    }
                }
            }
        }));
        assert_eq!(out["properties"], json!({"x": {"type": "string"}}));
    }

    #[test]
    fn test_envelope_requires_object_with_properties() {
        let scalar = json!({"properties": {"data": {"type": "string"}}});
        assert_eq!(norm(scalar.clone())["properties"], scalar["properties"]);

        let two = json!({
            "properties": {
                "data": {"type": "object", "properties": {}},
                "meta": {"type": "string"}
            }
        });
        assert_eq!(norm(two)["properties"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_items_and_composition() {
        let out = norm(json!({
            "type": "object",
            "properties": {
                "rows": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"id": {"type": "integer", "required": true}}
                    }
                }
            },
            "anyOf": [{"properties": {"k": {"type": "string", "required": true}}}, 3]
        }));
        assert_eq!(out["properties"]["rows"]["items"]["required"], json!(["id"]));
        assert_eq!(out["anyOf"][0]["required"], json!(["k"]));
        assert_eq!(out["anyOf"][1], json!(3));
        assert_eq!(out["required"], json!([]));
    }

    #[test]
    fn test_lifts_constraint_bag() {
        let out = norm(json!({
            "properties": {
                "code": {
                    "type": "string",
                    "maxLength": 4,
                    "constraints": {"minLength": 2, "maxLength": 9, "note": "x"}
                }
            }
        }));
        assert_eq!(
            out["properties"]["code"],
            json!({"type": "string", "maxLength": 4, "minLength": 2})
        );
    }

    #[test]
    fn test_idempotent() {
        let samples = vec![
            json!({"properties": {"a": {"type": "string", "required": true}}}),
            json!({
                "type": "object",
                "properties": {
                    "user": {
                        "type": "object",
                        "required": true,
                        "properties": {"email": {"type": "string", "required": true}}
                    },
                    "tags": {"type": "array", "items": {"type": "string"}}
                },
                "required": true,
                "oneOf": [{"required": false}]
            }),
            json!({"properties": {"body": {"type": "object", "properties": {"n": {"required": "yes"}}}}}),
            json!({"type": "string"}),
            json!({}),
        ];

        for sample in samples {
            let once = normalize_value(&sample).unwrap();
            let twice = normalize(&once);
            assert_eq!(once, twice, "normalization not idempotent for {}", sample);
        }
    }

    #[test]
    fn test_does_not_mutate_input() {
        let input = Schema::from_value(json!({"properties": {"a": {"required": true}}})).unwrap();
        let before = input.clone();
        let _ = normalize(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            normalize_value(&json!("schema")),
            Err(SchemaError::NotAnObject { .. })
        ));
    }
}
