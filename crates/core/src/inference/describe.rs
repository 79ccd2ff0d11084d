//! Field description heuristics

/// Ordered lexicon: (needle, label, whole-word only)
///
/// More specific needles come first so `created_at` resolves to a creation
/// timestamp rather than a generic date.
const LEXICON: &[(&str, &str, bool)] = &[
    ("created", "Creation time", false),
    ("updated", "Last update time", false),
    ("email", "Email address", false),
    ("phone", "Phone number", false),
    ("mobile", "Phone number", false),
    ("address", "Address", false),
    ("city", "City", false),
    ("country", "Country", false),
    ("date", "Date", false),
    ("time", "Time", false),
    ("name", "Name", false),
    ("id", "Identifier", true),
    ("age", "Age", true),
];

/// Split a field name into lowercase words on `_`, `-`, spaces and camelCase
/// boundaries.
pub fn split_words(field_name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in field_name.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Generate a default description for a field name
pub fn describe_field(field_name: &str) -> String {
    let words = split_words(field_name);
    let joined = words.join(" ");

    for (needle, label, whole_word) in LEXICON {
        let hit = if *whole_word {
            words.iter().any(|w| w == needle)
        } else {
            joined.contains(needle)
        };
        if hit {
            return (*label).to_string();
        }
    }

    if joined.is_empty() {
        field_name.to_string()
    } else {
        joined
    }
}
