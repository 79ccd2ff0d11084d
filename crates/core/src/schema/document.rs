//! Object schema carrier

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::error::SchemaError;
use super::required;

/// A JSON-Schema-shaped object
///
/// Always a JSON object; whether it is well formed depends on whether it went
/// through [`normalize`](super::normalize). Serializes as the bare object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(Map<String, Value>);

impl Schema {
    /// `{"type": "object", "properties": {}, "required": []}`
    pub fn empty() -> Self {
        let mut map = Map::new();
        map.insert("type".to_string(), json!("object"));
        map.insert("properties".to_string(), Value::Object(Map::new()));
        map.insert("required".to_string(), Value::Array(Vec::new()));
        Self(map)
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value, rejecting anything that is not an object
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(SchemaError::NotAnObject {
                found: json_type_name(&other).to_string(),
            }),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Declared `type`, if it is a string
    pub fn schema_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Declared properties, if `properties` is an object
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.0.get("properties").and_then(Value::as_object)
    }

    /// Schema of a single declared property
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties().and_then(|props| props.get(name))
    }

    /// Names listed in the `required` array (empty unless it is an array)
    pub fn required(&self) -> Vec<String> {
        required::names(self.0.get("required"))
    }

    /// Ensure the schema can describe an object
    ///
    /// A missing `type` is accepted; any other declared type is rejected.
    pub fn ensure_object(&self) -> Result<(), SchemaError> {
        match self.0.get("type") {
            None => Ok(()),
            Some(Value::String(t)) if t == "object" => Ok(()),
            Some(Value::String(t)) => Err(SchemaError::UnsupportedRootType(t.clone())),
            Some(other) => Err(SchemaError::UnsupportedRootType(other.to_string())),
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Map<String, Value>> for Schema {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Schema> for Value {
    fn from(schema: Schema) -> Self {
        schema.into_value()
    }
}

/// JSON type name of a value, as used in diagnostics
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
