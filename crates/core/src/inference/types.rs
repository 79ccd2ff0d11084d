//! Field descriptors produced by inference

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Inferred field type
///
/// Aliases cover the spellings generated field lists tend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[serde(alias = "str", alias = "text")]
    String,
    #[serde(alias = "int", alias = "long")]
    Integer,
    #[serde(alias = "float", alias = "double", alias = "decimal")]
    Number,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "dict", alias = "map")]
    Object,
    #[serde(alias = "list")]
    Array,
    Date,
    #[serde(alias = "date-time", alias = "date_time", alias = "timestamp")]
    Datetime,
}

impl FieldType {
    /// Name used in schema `type` slots
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
        }
    }

    /// Parse a schema `type` name, accepting the same aliases as deserialization
    pub fn parse(name: &str) -> Option<FieldType> {
        serde_json::from_value(Value::String(name.to_ascii_lowercase())).ok()
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional constraint bag attached to a field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
}

impl Constraints {
    /// True when no constraint is set
    pub fn is_empty(&self) -> bool {
        *self == Constraints::default()
    }

    /// Spread the set constraints into a property schema object
    pub fn write_into(&self, target: &mut Map<String, Value>) {
        if let Ok(Value::Object(map)) = serde_json::to_value(self) {
            for (key, value) in map {
                target.insert(key, value);
            }
        }
    }

    /// Narrow length and numeric bounds using another source's constraints
    ///
    /// Lower bounds take the larger value, upper bounds the smaller; a bound
    /// only present on `other` is adopted as-is. Item counts, pattern and
    /// enum are left untouched.
    pub fn tighten_bounds(&mut self, other: &Constraints) {
        self.min_length = match (self.min_length, other.min_length) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.max_length = match (self.max_length, other.max_length) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.minimum = tighter_number(self.minimum.take(), other.minimum.as_ref(), Ordering::Greater);
        self.maximum = tighter_number(self.maximum.take(), other.maximum.as_ref(), Ordering::Less);
    }
}

fn tighter_number(current: Option<Number>, other: Option<&Number>, keep: Ordering) -> Option<Number> {
    match (current, other) {
        (Some(a), Some(b)) => match compare_numbers(b, &a) {
            Some(ord) if ord == keep => Some(b.clone()),
            _ => Some(a),
        },
        (None, Some(b)) => Some(b.clone()),
        (a, None) => a,
    }
}

/// Compare two JSON numbers, exactly for integers and by `f64` otherwise
pub(crate) fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// Element description for array fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayItems {
    #[serde(rename = "type")]
    pub item_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<FieldDefinition>>,
}

/// A single inferred (or generated) field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    /// Dot/bracket path, e.g. `user.address.city` or `items[].id`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<FieldDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ArrayItems>,
}

impl FieldDefinition {
    /// Create a field with no description, constraints or children
    pub fn new(name: impl Into<String>, path: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            field_type,
            description: String::new(),
            required: false,
            constraints: Constraints::default(),
            properties: None,
            items: None,
        }
    }

    /// Mark this field as required
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the field sits at the root of its document
    ///
    /// Fields without a path (as in generated field lists) count as top-level.
    pub fn is_top_level(&self) -> bool {
        let path = if self.path.is_empty() { &self.name } else { &self.path };
        !path.contains('.') && !path.contains('[')
    }

    /// Number of descendant fields, counting nested object and item properties
    pub fn descendant_count(&self) -> usize {
        let nested = self.properties.iter().flatten();
        let item_props = self
            .items
            .iter()
            .filter_map(|items| items.properties.as_ref())
            .flatten();
        nested
            .chain(item_props)
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}
