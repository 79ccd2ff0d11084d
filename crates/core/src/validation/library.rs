//! Validation engine backed by the `jsonschema` crate

use jsonschema::error::ValidationErrorKind;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::engine::{Target, ValidationEngine, join_path};
use super::report::ValidationDetail;
use crate::schema::{Schema, SchemaError};

/// Validation engine delegating to the `jsonschema` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaEngine;

impl JsonSchemaEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationEngine for JsonSchemaEngine {
    fn name(&self) -> &'static str {
        "jsonschema"
    }

    fn validate(&self, schema: &Schema, targets: &[Target<'_>]) -> Result<Vec<ValidationDetail>, SchemaError> {
        let prepared = library_schema(schema);
        let validator =
            jsonschema::validator_for(&prepared).map_err(|e| SchemaError::Compile(e.to_string()))?;
        debug!("Compiled schema for library validation");

        let mut details = Vec::new();
        for target in targets {
            let mut integral_floats = Vec::new();
            collect_integral_floats(&prepared, target.value, String::new(), &mut integral_floats);

            for error in validator.iter_errors(target.value) {
                let instance_pointer = error.instance_path().to_string();
                if integral_floats.iter().any(|found| found.pointer == instance_pointer) {
                    continue;
                }
                let schema_path = error.schema_path().to_string();
                let keyword = schema_path
                    .rsplit('/')
                    .next()
                    .filter(|segment| !segment.is_empty())
                    .unwrap_or("schema")
                    .to_string();

                let mut path = pointer_to_path(target.prefix, &instance_pointer);
                if let ValidationErrorKind::Required { property } = error.kind() {
                    let name = property.as_str().map(str::to_string).unwrap_or_else(|| property.to_string());
                    path = join_path(&path, &name);
                }
                if path.is_empty() {
                    path = target.self_path().to_string();
                }

                let validator_value = prepared.pointer(&schema_path).cloned().unwrap_or(Value::Null);
                details.push(ValidationDetail::new(path, error.to_string(), keyword, validator_value));
            }

            for found in integral_floats {
                details.push(ValidationDetail::new(
                    pointer_to_path(target.prefix, &found.pointer),
                    format!("{} is not of type {}", found.value, found.declared),
                    "type",
                    found.declared,
                ));
            }
        }
        Ok(details)
    }
}

/// An integral float literal (`3.0`) sitting where only `integer` is allowed
///
/// The library follows JSON Schema and accepts these as integers. Reports
/// classify them as `number`, so they become type failures here and any other
/// failure on the same value is dropped, as the hand-rolled engine does.
struct IntegralFloat {
    pointer: String,
    value: Value,
    declared: Value,
}

fn collect_integral_floats(
    schema: &Value,
    value: &Value,
    pointer: String,
    found: &mut Vec<IntegralFloat>,
) {
    let Value::Object(schema) = schema else {
        return;
    };
    if let Some(declared) = schema.get("type") {
        if integer_only(declared) && is_integral_float(value) {
            found.push(IntegralFloat {
                pointer,
                value: value.clone(),
                declared: declared.clone(),
            });
            return;
        }
    }

    match value {
        Value::Object(data) => {
            let Some(Value::Object(properties)) = schema.get("properties") else {
                return;
            };
            for (key, child) in data {
                if let Some(prop) = properties.get(key) {
                    collect_integral_floats(prop, child, format!("{}/{}", pointer, escape_pointer(key)), found);
                }
            }
        }
        Value::Array(items) => {
            let Some(item_schema) = schema.get("items") else {
                return;
            };
            for (index, item) in items.iter().enumerate() {
                collect_integral_floats(item_schema, item, format!("{}/{}", pointer, index), found);
            }
        }
        _ => {}
    }
}

fn integer_only(declared: &Value) -> bool {
    match declared {
        Value::String(name) => name == "integer",
        Value::Array(names) => {
            let names: Vec<&str> = names.iter().filter_map(Value::as_str).collect();
            names.contains(&"integer") && !names.contains(&"number")
        }
        _ => false,
    }
}

fn is_integral_float(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_f64() && n.as_f64().is_some_and(|f| f.fract() == 0.0))
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Convert a JSON pointer into the dotted/bracket path used in reports
fn pointer_to_path(prefix: &str, pointer: &str) -> String {
    let mut path = prefix.to_string();
    for raw in pointer.split('/').skip(1) {
        if raw.is_empty() {
            continue;
        }
        let segment = raw.replace("~1", "/").replace("~0", "~");
        if segment.chars().all(|c| c.is_ascii_digit()) {
            path = if path.is_empty() {
                format!("root[{}]", segment)
            } else {
                format!("{}[{}]", path, segment)
            };
        } else {
            path = join_path(&path, &segment);
        }
    }
    path
}

/// Copy of a normalized schema the library can evaluate with the same meaning
///
/// `date`/`datetime` types become strings with a `format`, dotted required
/// entries are re-nested onto their parent objects, and a missing root type
/// becomes `object`.
pub(crate) fn library_schema(schema: &Schema) -> Value {
    let mut root = schema.as_map().clone();
    if !root.contains_key("type") {
        root.insert("type".to_string(), json!("object"));
    }
    renest_required(&mut root);
    let mut value = Value::Object(root);
    rewrite_temporal_types(&mut value);
    value
}

fn renest_required(level: &mut Map<String, Value>) {
    let Some(Value::Array(required)) = level.get("required") else {
        return;
    };
    let declared = level.get("properties").and_then(Value::as_object);

    let mut direct = Vec::new();
    let mut dotted = Vec::new();
    for entry in required {
        match entry.as_str() {
            Some(name) if name.contains('.') && !declared.is_some_and(|p| p.contains_key(name)) => {
                dotted.push(name.to_string())
            }
            _ => direct.push(entry.clone()),
        }
    }
    if dotted.is_empty() {
        return;
    }
    level.insert("required".to_string(), Value::Array(direct));

    let properties = level
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(properties) = properties else {
        return;
    };

    for entry in dotted {
        let Some((head, rest)) = entry.split_once('.') else {
            continue;
        };
        let child = properties
            .entry(head)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(child) = child {
            let required = child
                .entry("required")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = required {
                if !list.iter().any(|v| v.as_str() == Some(rest)) {
                    list.push(json!(rest));
                }
            }
            renest_required(child);
        }
    }
}

fn rewrite_temporal_types(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let format = match map.get("type").and_then(Value::as_str) {
                Some("date") => Some("date"),
                Some("datetime") => Some("date-time"),
                _ => None,
            };
            if let Some(format) = format {
                map.insert("type".to_string(), json!("string"));
                if !map.contains_key("format") {
                    map.insert("format".to_string(), json!(format));
                }
            }
            for (key, child) in map.iter_mut() {
                // `enum` and `const` hold data, not schemas
                if key != "enum" && key != "const" {
                    rewrite_temporal_types(child);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(rewrite_temporal_types),
        _ => {}
    }
}
