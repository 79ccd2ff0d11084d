//! Schema merging with a primary side and constraint tightening

use std::cmp::Ordering;

use serde_json::{Map, Value, json};
use tracing::debug;

use super::document::Schema;
use super::required::{names, union};
use crate::inference::compare_numbers;

/// Lower bounds; the larger value wins
const LOWER_BOUNDS: &[&str] = &["minLength", "minimum", "minItems"];

/// Upper bounds; the smaller value wins
const UPPER_BOUNDS: &[&str] = &["maxLength", "maximum", "maxItems"];

/// Merge two schemas, `primary` winning conflicts
///
/// Either side may be absent, in which case a copy of the other is returned
/// (or an empty object schema when both are absent). Property order is
/// primary's first, then properties only the secondary declares.
pub fn merge(primary: Option<&Schema>, secondary: Option<&Schema>) -> Schema {
    match (primary, secondary) {
        (Some(p), Some(s)) => {
            let mut merged = merge_levels(p.as_map(), s.as_map());
            if !merged.contains_key("type") {
                merged.insert("type".to_string(), json!("object"));
            }
            Schema::from_map(merged)
        }
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (None, None) => Schema::empty(),
    }
}

/// Fold several schemas left to right, each earlier one acting as primary
pub fn merge_all<'a, I>(schemas: I) -> Schema
where
    I: IntoIterator<Item = &'a Schema>,
{
    let mut iter = schemas.into_iter();
    let Some(first) = iter.next() else {
        return Schema::empty();
    };
    iter.fold(first.clone(), |acc, next| merge(Some(&acc), Some(next)))
}

fn merge_levels(primary: &Map<String, Value>, secondary: &Map<String, Value>) -> Map<String, Value> {
    let mut out = primary.clone();

    let p_props = primary.get("properties").and_then(Value::as_object);
    let s_props = secondary.get("properties").and_then(Value::as_object);
    if p_props.is_some() || s_props.is_some() {
        let empty = Map::new();
        let merged = merge_properties(p_props.unwrap_or(&empty), s_props.unwrap_or(&empty));
        out.insert("properties".to_string(), Value::Object(merged));
    }

    let required = union(
        &names(primary.get("required")),
        &names(secondary.get("required")),
    );
    out.insert(
        "required".to_string(),
        Value::Array(required.into_iter().map(Value::String).collect()),
    );

    for (key, value) in secondary {
        if !out.contains_key(key) {
            out.insert(key.clone(), value.clone());
        }
    }

    out
}

fn merge_properties(
    primary: &Map<String, Value>,
    secondary: &Map<String, Value>,
) -> Map<String, Value> {
    let mut out = Map::with_capacity(primary.len() + secondary.len());

    for (name, p) in primary {
        let merged = match (p, secondary.get(name)) {
            (Value::Object(p), Some(Value::Object(s))) => {
                debug!(property = name.as_str(), "Merging property from both sources");
                Value::Object(merge_property(p, s))
            }
            _ => p.clone(),
        };
        out.insert(name.clone(), merged);
    }

    for (name, s) in secondary {
        if !out.contains_key(name) {
            out.insert(name.clone(), s.clone());
        }
    }

    out
}

fn merge_property(primary: &Map<String, Value>, secondary: &Map<String, Value>) -> Map<String, Value> {
    let mut out = primary.clone();

    let primary_description = primary
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if primary_description.is_empty() {
        if let Some(description) = secondary.get("description") {
            out.insert("description".to_string(), description.clone());
        }
    }

    for key in LOWER_BOUNDS {
        tighten(&mut out, secondary, key, Ordering::Greater);
    }
    for key in UPPER_BOUNDS {
        tighten(&mut out, secondary, key, Ordering::Less);
    }

    if has_object_shape(primary) && has_object_shape(secondary) {
        let nested = merge_levels(&sub_schema(primary), &sub_schema(secondary));
        for (key, value) in nested {
            if key == "properties" || key == "required" {
                out.insert(key, value);
            }
        }
        if !primary.contains_key("required") && !secondary.contains_key("required") {
            out.shift_remove("required");
        }
    }

    match (primary.get("items"), secondary.get("items")) {
        (Some(Value::Object(p)), Some(Value::Object(s))) if is_object_items(p) && is_object_items(s) => {
            out.insert("items".to_string(), Value::Object(merge_levels(p, s)));
        }
        (Some(_), _) => {}
        (None, Some(s)) => {
            out.insert("items".to_string(), s.clone());
        }
        (None, None) => {}
    }

    // pattern, enum, format and anything else: primary's if present
    for (key, value) in secondary {
        if !out.contains_key(key) {
            out.insert(key.clone(), value.clone());
        }
    }

    out
}

/// Replace `key` in `target` with the secondary value if that one is stricter
fn tighten(target: &mut Map<String, Value>, secondary: &Map<String, Value>, key: &str, stricter: Ordering) {
    let Some(candidate) = secondary.get(key) else {
        return;
    };
    let replace = match target.get(key) {
        None => true,
        Some(Value::Number(current)) => match candidate {
            Value::Number(candidate) => compare_numbers(candidate, current) == Some(stricter),
            _ => false,
        },
        Some(_) => false,
    };
    if replace {
        target.insert(key.to_string(), candidate.clone());
    }
}

fn has_object_shape(prop: &Map<String, Value>) -> bool {
    prop.get("properties").is_some_and(Value::is_object)
}

fn is_object_items(items: &Map<String, Value>) -> bool {
    items.get("type").and_then(Value::as_str) == Some("object") || has_object_shape(items)
}

fn sub_schema(prop: &Map<String, Value>) -> Map<String, Value> {
    let mut sub = Map::new();
    for key in ["properties", "required"] {
        if let Some(value) = prop.get(key) {
            sub.insert(key.to_string(), value.clone());
        }
    }
    sub
}
