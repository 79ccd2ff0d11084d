//! Field inference engine

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::{debug, warn};

use super::config::InferenceConfig;
use super::describe::describe_field;
use super::error::InferenceError;
use super::formats::{EMAIL_PATTERN, Format, detect_format, looks_like_email};
use super::types::{ArrayItems, Constraints, FieldDefinition, FieldType};
use crate::schema::{Schema, build_schema};

/// Fields inferred from one example value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldInference {
    /// Top-level fields, children nested under `properties` / `items`
    pub fields: Vec<FieldDefinition>,
    /// Whether the depth limit cut off any non-empty object
    pub truncated: bool,
    /// Paths whose children were dropped by the depth limit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub truncated_paths: Vec<String>,
}

/// Schema plus field catalogue derived from an example document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedExample {
    pub schema: Schema,
    pub field_definitions: Vec<FieldDefinition>,
    pub truncated: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub truncated_paths: Vec<String>,
}

/// Infer the type of a JSON value with default settings
///
/// Precedence: null, boolean, integral number, fractional number, date,
/// datetime, plain string, array, object.
pub fn infer_field_type(value: &Value) -> FieldType {
    classify(value, true)
}

fn classify(value: &Value, detect_temporal: bool) -> FieldType {
    match value {
        Value::Null => FieldType::String,
        Value::Bool(_) => FieldType::Boolean,
        Value::Number(n) if n.is_i64() || n.is_u64() => FieldType::Integer,
        Value::Number(_) => FieldType::Number,
        Value::String(s) if detect_temporal => match detect_format(s) {
            Some(Format::Date) => FieldType::Date,
            Some(Format::DateTime) => FieldType::Datetime,
            None => FieldType::String,
        },
        Value::String(_) => FieldType::String,
        Value::Array(_) => FieldType::Array,
        Value::Object(_) => FieldType::Object,
    }
}

/// Field inference engine
///
/// Walks an example JSON value and produces a tree of field definitions with
/// inferred types, heuristic constraints and descriptions.
#[derive(Debug, Clone, Default)]
pub struct FieldInferrer {
    config: InferenceConfig,
}

impl FieldInferrer {
    /// Create a new inferrer with default configuration
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    /// Create a new inferrer with custom configuration
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer the type of a value under this inferrer's configuration
    pub fn infer_type(&self, value: &Value) -> FieldType {
        classify(value, self.config.detect_temporal)
    }

    /// Parse an example JSON text into a schema and field catalogue
    ///
    /// Rejects text above the configured size ceiling before parsing.
    pub fn parse_json(&self, json: &str) -> Result<ParsedExample, InferenceError> {
        if json.len() > self.config.max_input_bytes {
            return Err(InferenceError::InputTooLarge {
                size: json.len(),
                max: self.config.max_input_bytes,
            });
        }

        let value: Value = serde_json::from_str(json)?;
        Ok(self.parse_value(&value))
    }

    /// Build a schema and field catalogue from an already parsed example
    pub fn parse_value(&self, value: &Value) -> ParsedExample {
        let inference = self.infer_fields(value);
        let schema = build_schema(&inference.fields);

        ParsedExample {
            schema,
            field_definitions: inference.fields,
            truncated: inference.truncated,
            truncated_paths: inference.truncated_paths,
        }
    }

    /// Infer field definitions from an example value
    pub fn infer_fields(&self, value: &Value) -> FieldInference {
        let mut truncated_paths = Vec::new();
        let fields = self.extract(value, "", 0, &mut truncated_paths);

        debug!(
            fields = fields.len(),
            truncated = !truncated_paths.is_empty(),
            "Field inference complete"
        );

        FieldInference {
            fields,
            truncated: !truncated_paths.is_empty(),
            truncated_paths,
        }
    }

    fn extract(
        &self,
        value: &Value,
        prefix: &str,
        depth: usize,
        truncated: &mut Vec<String>,
    ) -> Vec<FieldDefinition> {
        if depth > self.config.max_depth {
            return Vec::new();
        }

        match value {
            Value::Object(map) => map
                .iter()
                .map(|(key, child)| self.extract_field(key, child, prefix, depth, truncated))
                .collect(),
            Value::Array(items) => match items.first() {
                Some(first @ Value::Object(_)) => {
                    self.descend(first, prefix, depth + 1, truncated, prefix)
                }
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn extract_field(
        &self,
        key: &str,
        value: &Value,
        prefix: &str,
        depth: usize,
        truncated: &mut Vec<String>,
    ) -> FieldDefinition {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        };
        let field_type = self.infer_type(value);

        let mut field = FieldDefinition::new(key, path.clone(), field_type)
            .with_description(describe_field(key));

        if self.config.infer_constraints {
            field.constraints = self.infer_constraints(value, field_type);
        }

        match (field_type, value) {
            (FieldType::Object, Value::Object(map)) if !map.is_empty() => {
                let nested = self.descend(value, &path, depth + 1, truncated, &path);
                if !nested.is_empty() {
                    field.properties = Some(nested);
                }
            }
            (FieldType::Array, Value::Array(items)) => {
                if let Some(first) = items.first() {
                    let item_type = self.infer_type(first);
                    let mut array_items = ArrayItems {
                        item_type,
                        properties: None,
                    };
                    if let Value::Object(map) = first {
                        if !map.is_empty() {
                            let item_prefix = format!("{}[]", path);
                            let nested =
                                self.descend(first, &item_prefix, depth + 1, truncated, &path);
                            if !nested.is_empty() {
                                array_items.properties = Some(nested);
                            }
                        }
                    }
                    field.items = Some(array_items);
                }
            }
            _ => {}
        }

        field
    }

    /// Recurse one level down, recording a truncation when the limit is hit
    fn descend(
        &self,
        value: &Value,
        prefix: &str,
        depth: usize,
        truncated: &mut Vec<String>,
        report_path: &str,
    ) -> Vec<FieldDefinition> {
        if depth > self.config.max_depth {
            warn!(
                path = report_path,
                max_depth = self.config.max_depth,
                "Maximum nesting depth reached, children dropped"
            );
            truncated.push(report_path.to_string());
            return Vec::new();
        }
        self.extract(value, prefix, depth, truncated)
    }

    /// Infer heuristic constraints from an example value
    pub fn infer_constraints(&self, value: &Value, field_type: FieldType) -> Constraints {
        let mut constraints = Constraints::default();

        match (field_type, value) {
            (FieldType::String, Value::String(s)) => {
                let length = s.chars().count() as u64;
                if length > 0 {
                    constraints.min_length = Some(1);
                    constraints.max_length = Some(length.saturating_mul(2));
                }
                if looks_like_email(s) {
                    constraints.pattern = Some(EMAIL_PATTERN.to_string());
                }
            }
            (FieldType::Integer | FieldType::Number, Value::Number(n)) => {
                let (minimum, maximum) = numeric_range(n);
                constraints.minimum = minimum;
                constraints.maximum = maximum;
            }
            (FieldType::Array, Value::Array(items)) => {
                constraints.min_items = Some(0);
                constraints.max_items = Some(if items.is_empty() {
                    10
                } else {
                    (items.len() as u64).saturating_mul(2)
                });
            }
            _ => {}
        }

        constraints
    }
}

/// Range heuristic around an example number
///
/// Positive values span `[v/2, 2v]`; zero and negatives span `[v-10, v+10]`.
/// Integers keep integral bounds (halving rounds toward zero).
fn numeric_range(n: &Number) -> (Option<Number>, Option<Number>) {
    if let Some(v) = n.as_i64() {
        return if v > 0 {
            (Some(Number::from(v / 2)), Some(Number::from(v.saturating_mul(2))))
        } else {
            (
                Some(Number::from(v.saturating_sub(10))),
                Some(Number::from(v.saturating_add(10))),
            )
        };
    }
    if let Some(v) = n.as_u64() {
        return (Some(Number::from(v / 2)), Some(Number::from(v.saturating_mul(2))));
    }
    match n.as_f64() {
        Some(v) if v > 0.0 => (Number::from_f64(v * 0.5), Number::from_f64(v * 2.0)),
        Some(v) => (Number::from_f64(v - 10.0), Number::from_f64(v + 10.0)),
        None => (None, None),
    }
}
