//! The `required` slot as an explicit sum type

use serde_json::Value;

/// Shapes a `required` slot can take in an unnormalized schema
///
/// Generated schemas put booleans, arrays or nothing at all into `required`;
/// every shape resolves to a plain list of names via [`Required::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Required {
    /// No `required` key
    #[default]
    Absent,
    /// `required: true`, every declared property is required
    All,
    /// `required: false`
    None,
    /// `required: [..]`; non-string entries are dropped
    Explicit(Vec<String>),
}

impl Required {
    /// Classify a raw `required` value
    ///
    /// Values of any other JSON type count as absent.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Bool(true)) => Required::All,
            Some(Value::Bool(false)) => Required::None,
            Some(Value::Array(entries)) => Required::Explicit(
                entries
                    .iter()
                    .filter_map(|entry| entry.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => Required::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Required::Absent)
    }

    /// Resolve to a canonical, duplicate-free list of names
    ///
    /// `property_names` are the names declared at this level and `promoted`
    /// are markers lifted from the properties themselves. Order is preserved:
    /// the base list first, then promoted names not already present.
    pub fn resolve<'a, I>(&self, property_names: I, promoted: &[String]) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let base: Vec<String> = match self {
            Required::All => property_names.into_iter().cloned().collect(),
            Required::Explicit(names) => names.clone(),
            Required::None | Required::Absent => Vec::new(),
        };
        union(&base, promoted)
    }
}

/// Order-preserving union of two name lists without duplicates
pub(crate) fn union(first: &[String], second: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(first.len() + second.len());
    for name in first.iter().chain(second) {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

/// Collect the string entries of a `required` array
pub(crate) fn names(value: Option<&Value>) -> Vec<String> {
    match Required::from_value(value) {
        Required::Explicit(names) => names,
        _ => Vec::new(),
    }
}
