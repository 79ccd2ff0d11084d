//! Schema validator front end

use serde_json::Value;
use tracing::{debug, warn};

use super::config::{ValidationBackend, ValidationConfig};
use super::engine::{Target, ValidationEngine, join_path};
use super::fallback::FallbackEngine;
use super::report::ValidationResult;
use crate::schema::{Schema, SchemaError, normalize};

/// Validates data against object schemas
///
/// The schema is normalized on a private copy before use. Data that is a
/// JSON string is parsed first; a list is validated element by element
/// against the object schema with paths prefixed `item[i]`.
pub struct SchemaValidator {
    config: ValidationConfig,
    engine: Box<dyn ValidationEngine>,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("config", &self.config)
            .field("engine", &self.engine.name())
            .finish()
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaValidator {
    /// Create a validator with default configuration
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create a validator, picking the engine from the configured backend
    pub fn with_config(config: ValidationConfig) -> Self {
        let engine = select_engine(config.backend);
        Self { config, engine }
    }

    /// Create a validator around a caller-supplied engine
    pub fn with_engine(config: ValidationConfig, engine: Box<dyn ValidationEngine>) -> Self {
        Self { config, engine }
    }

    /// Name of the active engine
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Validate `data` against `schema`
    ///
    /// Content problems are reported in the returned [`ValidationResult`].
    /// An error is returned only when the normalized schema cannot describe
    /// an object.
    pub fn validate(&self, data: &Value, schema: &Schema) -> Result<ValidationResult, SchemaError> {
        let normalized = normalize(schema);
        normalized.ensure_object()?;

        let parsed;
        let data = match data {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) => {
                    parsed = value;
                    &parsed
                }
                Err(e) => return Ok(ValidationResult::invalid_json(e)),
            },
            other => other,
        };

        let prefixes: Vec<String> = match data {
            Value::Array(items) => (0..items.len()).map(|i| format!("item[{}]", i)).collect(),
            _ => vec![String::new()],
        };
        let targets: Vec<Target<'_>> = match data {
            Value::Array(items) => items
                .iter()
                .zip(&prefixes)
                .map(|(item, prefix)| Target::new(prefix, item))
                .collect(),
            single => vec![Target::new(&prefixes[0], single)],
        };

        let mut result = ValidationResult::new();
        let details = match self.engine.validate(&normalized, &targets) {
            Ok(details) => details,
            Err(SchemaError::Compile(reason)) => {
                warn!(
                    engine = self.engine.name(),
                    reason = reason.as_str(),
                    "Engine could not compile schema, using fallback engine"
                );
                result.warn(format!(
                    "Schema could not be compiled by the {} engine, used fallback validation: {}",
                    self.engine.name(),
                    reason
                ));
                FallbackEngine.validate(&normalized, &targets)?
            }
            Err(e) => return Err(e),
        };

        for detail in details {
            result.push(detail);
        }
        if self.config.warn_undeclared {
            for target in &targets {
                undeclared_warnings(&normalized, target, &mut result);
            }
        }

        debug!(
            engine = self.engine.name(),
            items = targets.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Validation complete"
        );
        Ok(result)
    }

    /// Validate JSON text against a schema
    ///
    /// Text that does not parse yields an invalid result, not an error.
    pub fn validate_str(&self, data: &str, schema: &Schema) -> Result<ValidationResult, SchemaError> {
        self.validate(&Value::String(data.to_string()), schema)
    }
}

/// Validate with a default-configured validator
pub fn validate(data: &Value, schema: &Schema) -> Result<ValidationResult, SchemaError> {
    SchemaValidator::new().validate(data, schema)
}

fn select_engine(backend: ValidationBackend) -> Box<dyn ValidationEngine> {
    match backend {
        ValidationBackend::Fallback => Box::new(FallbackEngine),
        ValidationBackend::Auto | ValidationBackend::Library => library_engine(backend),
    }
}

#[cfg(feature = "schema-validation")]
fn library_engine(_backend: ValidationBackend) -> Box<dyn ValidationEngine> {
    Box::new(super::library::JsonSchemaEngine)
}

#[cfg(not(feature = "schema-validation"))]
fn library_engine(backend: ValidationBackend) -> Box<dyn ValidationEngine> {
    if backend == ValidationBackend::Library {
        warn!("Library validation requested but the schema-validation feature is disabled");
    }
    Box::new(FallbackEngine)
}

fn undeclared_warnings(schema: &Schema, target: &Target<'_>, result: &mut ValidationResult) {
    let (Some(properties), Value::Object(data)) = (schema.properties(), target.value) else {
        return;
    };
    for key in data.keys() {
        if !properties.contains_key(key) {
            result.warn(format!(
                "{}: Field is not declared in schema",
                join_path(target.prefix, key)
            ));
        }
    }
}
