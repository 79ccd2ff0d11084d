//! Hand-rolled validation engine
//!
//! Covers the keywords generated schemas actually use: `type`, `required`,
//! `properties`, `items`, `enum`, string length and `pattern`, numeric
//! bounds and array length. Nested objects and array items are checked
//! recursively.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::{Map, Value, json};
use tracing::warn;

use super::engine::{Target, ValidationEngine, index_path, join_path};
use super::report::ValidationDetail;
use crate::inference::compare_numbers;
use crate::schema::{Schema, SchemaError, json_type_name};

/// Validation engine with no external dependencies
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEngine;

impl FallbackEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationEngine for FallbackEngine {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn validate(&self, schema: &Schema, targets: &[Target<'_>]) -> Result<Vec<ValidationDetail>, SchemaError> {
        let mut details = Vec::new();
        for target in targets {
            check_object(target.value, schema.as_map(), target.prefix, target.self_path(), &mut details);
        }
        Ok(details)
    }
}

fn check_object(
    value: &Value,
    schema: &Map<String, Value>,
    prefix: &str,
    self_path: &str,
    details: &mut Vec<ValidationDetail>,
) {
    let Value::Object(data) = value else {
        details.push(ValidationDetail::new(
            self_path,
            format!("Expected object, got {}", json_type_name(value)),
            "type",
            json!("object"),
        ));
        return;
    };

    let properties = schema.get("properties").and_then(Value::as_object);

    if let Some(Value::Array(required)) = schema.get("required") {
        for entry in required.iter().filter_map(Value::as_str) {
            let declared = properties.is_some_and(|props| props.contains_key(entry));
            if is_missing(data, entry, declared) {
                details.push(ValidationDetail::new(
                    join_path(prefix, entry),
                    "Required field is missing",
                    "required",
                    Value::Array(required.clone()),
                ));
            }
        }
    }

    let Some(properties) = properties else {
        return;
    };
    for (key, child) in data {
        if let Some(Value::Object(prop)) = properties.get(key) {
            check_value(child, prop, &join_path(prefix, key), details);
        }
    }
}

/// Whether a required entry is absent from the data
///
/// Dotted entries are walked as paths. When an intermediate object is
/// missing the entry is not reported; the parent's own required-ness
/// governs that case.
fn is_missing(data: &Map<String, Value>, entry: &str, declared: bool) -> bool {
    if declared || !entry.contains('.') {
        return !data.contains_key(entry);
    }

    let mut segments = entry.split('.').peekable();
    let mut current = data;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            return !current.contains_key(segment);
        }
        match current.get(segment) {
            Some(Value::Object(next)) => current = next,
            _ => return false,
        }
    }
    false
}

fn check_value(value: &Value, prop: &Map<String, Value>, path: &str, details: &mut Vec<ValidationDetail>) {
    if let Some(declared) = prop.get("type") {
        if !type_matches(declared, value) {
            details.push(ValidationDetail::new(
                path,
                format!("Expected {}, got {}", type_label(declared), json_type_name(value)),
                "type",
                declared.clone(),
            ));
            return;
        }
    }

    if let Some(Value::Array(allowed)) = prop.get("enum") {
        if !allowed.iter().any(|candidate| values_equal(candidate, value)) {
            details.push(ValidationDetail::new(
                path,
                format!("Value {} is not in enum {}", value, Value::Array(allowed.clone())),
                "enum",
                Value::Array(allowed.clone()),
            ));
        }
    }

    match value {
        Value::String(s) => check_string(s, prop, path, details),
        Value::Number(n) => check_number(n, prop, path, details),
        Value::Array(items) => {
            check_length(items.len(), prop, "minItems", "maxItems", "Array", path, details);
            if let Some(Value::Object(item_schema)) = prop.get("items") {
                for (index, item) in items.iter().enumerate() {
                    check_value(item, item_schema, &index_path(path, index), details);
                }
            }
        }
        Value::Object(_) => {
            if prop.contains_key("properties") || prop.contains_key("required") {
                check_object(value, prop, path, path, details);
            }
        }
        Value::Null | Value::Bool(_) => {}
    }
}

fn check_string(s: &str, prop: &Map<String, Value>, path: &str, details: &mut Vec<ValidationDetail>) {
    check_length(s.chars().count(), prop, "minLength", "maxLength", "String", path, details);

    if let Some(Value::String(pattern)) = prop.get("pattern") {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(s) => details.push(ValidationDetail::new(
                path,
                format!("String does not match pattern {}", pattern),
                "pattern",
                json!(pattern),
            )),
            Ok(_) => {}
            Err(e) => warn!(path, pattern = pattern.as_str(), error = %e, "Skipping invalid pattern"),
        }
    }
}

fn check_number(
    n: &serde_json::Number,
    prop: &Map<String, Value>,
    path: &str,
    details: &mut Vec<ValidationDetail>,
) {
    if let Some(Value::Number(minimum)) = prop.get("minimum") {
        if compare_numbers(n, minimum) == Some(Ordering::Less) {
            details.push(ValidationDetail::new(
                path,
                format!("Value {} is less than minimum {}", n, minimum),
                "minimum",
                json!(minimum),
            ));
        }
    }
    if let Some(Value::Number(maximum)) = prop.get("maximum") {
        if compare_numbers(n, maximum) == Some(Ordering::Greater) {
            details.push(ValidationDetail::new(
                path,
                format!("Value {} exceeds maximum {}", n, maximum),
                "maximum",
                json!(maximum),
            ));
        }
    }
}

fn check_length(
    length: usize,
    prop: &Map<String, Value>,
    min_key: &str,
    max_key: &str,
    noun: &str,
    path: &str,
    details: &mut Vec<ValidationDetail>,
) {
    let length = length as u64;
    if let Some(min) = length_limit(prop, min_key, path) {
        if length < min {
            details.push(ValidationDetail::new(
                path,
                format!("{} length {} is less than minimum {}", noun, length, min),
                min_key,
                json!(min),
            ));
        }
    }
    if let Some(max) = length_limit(prop, max_key, path) {
        if length > max {
            details.push(ValidationDetail::new(
                path,
                format!("{} length {} exceeds maximum {}", noun, length, max),
                max_key,
                json!(max),
            ));
        }
    }
}

/// Read a length bound, accepting integral floats such as `2.0`
fn length_limit(prop: &Map<String, Value>, key: &str, path: &str) -> Option<u64> {
    let raw = prop.get(key)?;
    if let Some(limit) = raw.as_u64() {
        return Some(limit);
    }
    match raw.as_f64() {
        Some(limit) if limit >= 0.0 && limit.fract() == 0.0 => Some(limit as u64),
        _ => {
            warn!(path, keyword = key, value = %raw, "Skipping unusable length bound");
            None
        }
    }
}

/// Structural equality where numbers compare by value (`1 == 1.0`)
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b) == Some(Ordering::Equal),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}

/// Exact classification: `integer` accepts integral literals only
fn type_matches(declared: &Value, value: &Value) -> bool {
    match declared {
        Value::String(name) => single_type_matches(name, value),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| single_type_matches(name, value)),
        _ => true,
    }
}

fn single_type_matches(name: &str, value: &Value) -> bool {
    match name {
        "string" | "date" | "datetime" | "date-time" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_label(declared: &Value) -> String {
    match declared {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}
