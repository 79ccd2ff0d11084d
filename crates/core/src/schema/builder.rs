//! Build object schemas from field definitions

use serde_json::{Map, Value, json};

use super::document::Schema;
use crate::inference::{FieldDefinition, FieldType};

/// Build an object schema from inferred or generated field definitions
///
/// Only top-level fields (no dot or bracket in their path) contribute at the
/// root; nested levels are built from each field's own `properties`. The
/// `required` slot is always an array.
pub fn build_schema(fields: &[FieldDefinition]) -> Schema {
    let top_level: Vec<&FieldDefinition> = fields.iter().filter(|f| f.is_top_level()).collect();
    Schema::from_map(build_level(top_level))
}

fn build_level<'a, I>(fields: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a FieldDefinition>,
{
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        properties.insert(field.name.clone(), Value::Object(property_schema(field)));
        if field.required && !required.contains(&field.name) {
            required.push(field.name.clone());
        }
    }

    let mut level = Map::new();
    level.insert("type".to_string(), json!("object"));
    level.insert("properties".to_string(), Value::Object(properties));
    level.insert("required".to_string(), json!(required));
    level
}

fn property_schema(field: &FieldDefinition) -> Map<String, Value> {
    let mut prop = Map::new();
    prop.insert("type".to_string(), json!(field.field_type.as_str()));
    prop.insert("description".to_string(), json!(field.description));
    field.constraints.write_into(&mut prop);

    match field.field_type {
        FieldType::Object => {
            if let Some(children) = &field.properties {
                attach_nested(&mut prop, build_level(children));
            }
        }
        FieldType::Array => {
            if let Some(items) = &field.items {
                let mut item_schema = Map::new();
                item_schema.insert("type".to_string(), json!(items.item_type.as_str()));
                if items.item_type == FieldType::Object {
                    if let Some(children) = &items.properties {
                        attach_nested(&mut item_schema, build_level(children));
                    }
                }
                prop.insert("items".to_string(), Value::Object(item_schema));
            }
        }
        _ => {}
    }

    prop
}

fn attach_nested(target: &mut Map<String, Value>, mut nested: Map<String, Value>) {
    for key in ["properties", "required"] {
        if let Some(value) = nested.remove(key) {
            target.insert(key.to_string(), value);
        }
    }
}
