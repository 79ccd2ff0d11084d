//! Format detection for string values

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Pattern attached to string fields whose example looks like an email address
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Detected temporal string format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// ISO 8601 date (YYYY-MM-DD)
    Date,
    /// Date followed by a time of day (YYYY-MM-DDTHH:MM:SS...)
    DateTime,
}

impl Format {
    /// Get the JSON Schema format string for this format
    pub fn as_json_schema_format(&self) -> &'static str {
        match self {
            Format::Date => "date",
            Format::DateTime => "date-time",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_json_schema_format())
    }
}

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

// Prefix match: fractional seconds and offsets may follow.
static DATETIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}").unwrap());

/// Detect a temporal format in a string value
///
/// Date is checked before datetime; a bare date never matches the datetime
/// prefix, so the order only matters for readability.
pub fn detect_format(value: &str) -> Option<Format> {
    if DATE_REGEX.is_match(value) {
        Some(Format::Date)
    } else if DATETIME_REGEX.is_match(value) {
        Some(Format::DateTime)
    } else {
        None
    }
}

/// Whether an example string should be given the email pattern constraint
pub fn looks_like_email(value: &str) -> bool {
    value.contains('@') && value.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_date() {
        assert_eq!(detect_format("2024-01-15"), Some(Format::Date));
        assert_eq!(detect_format("2024-1-15"), None);
        assert_eq!(detect_format("2024-01-15 "), None);
    }

    #[test]
    fn test_detect_datetime() {
        assert_eq!(detect_format("2024-01-15T10:30:00"), Some(Format::DateTime));
        assert_eq!(detect_format("2024-01-15 10:30:00"), Some(Format::DateTime));
        assert_eq!(
            detect_format("2024-01-15T10:30:00.123+02:00"),
            Some(Format::DateTime)
        );
        assert_eq!(detect_format("2024-01-15T10:30"), None);
    }

    #[test]
    fn test_plain_strings() {
        assert_eq!(detect_format("hello"), None);
        assert_eq!(detect_format(""), None);
    }

    #[test]
    fn test_email_heuristic() {
        assert!(looks_like_email("alice@example.com"));
        assert!(!looks_like_email("alice@localhost"));
        assert!(!looks_like_email("example.com"));
        assert!(Regex::new(EMAIL_PATTERN).unwrap().is_match("alice@example.com"));
    }

    #[test]
    fn test_json_schema_format_names() {
        assert_eq!(Format::Date.as_json_schema_format(), "date");
        assert_eq!(Format::DateTime.to_string(), "date-time");
    }
}
