//! Validation report types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One failed check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetail {
    /// Where the failure happened, e.g. `user.email`, `item[2].tags[0]` or `root`
    pub path: String,
    pub message: String,
    /// Schema keyword that failed (`required`, `type`, `minLength`, ...)
    #[serde(rename = "validator")]
    pub validator_kind: String,
    /// Value of that keyword in the schema
    pub validator_value: Value,
}

impl ValidationDetail {
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        validator_kind: impl Into<String>,
        validator_value: Value,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            validator_kind: validator_kind.into(),
            validator_value,
        }
    }

    /// Human-readable `<path>: <message>` form used in [`ValidationResult::errors`]
    pub fn error_line(&self) -> String {
        format!("{}: {}", self.path, self.message)
    }
}

/// Outcome of validating data against a schema
///
/// `valid` is always `errors.is_empty()`; use the constructors and
/// [`ValidationResult::push`] to keep it that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub details: Vec<ValidationDetail>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    /// An empty, valid result
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            details: Vec::new(),
        }
    }

    /// Result for data that is not parseable JSON
    pub fn invalid_json(reason: impl std::fmt::Display) -> Self {
        let mut result = Self::new();
        result.errors.push(format!("Invalid JSON format: {}", reason));
        result.valid = false;
        result
    }

    /// Record a failed check
    pub fn push(&mut self, detail: ValidationDetail) {
        self.errors.push(detail.error_line());
        self.details.push(detail);
        self.valid = false;
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Details whose path equals `path`
    pub fn details_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationDetail> + 'a {
        self.details.iter().filter(move |d| d.path == path)
    }
}
