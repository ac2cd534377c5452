//! Base contract system
//!
//! Required fields are declared, not coded: a resource lists
//! `FieldRule { field, label, kind }` entries and [`validate_fields`]
//! checks them against the JSON form of the input.

use clinic_core::error::ValidationErrors;
use serde::Serialize;
use serde_json::Value;

pub use clinic_core::result::ValidationResult;

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the input
    fn validate(&self, input: &T) -> ValidationResult;
}

/// What counts as "present" for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// String with at least one non-whitespace character
    Text,
    /// Non-empty array
    List,
    /// Any non-null value; blank strings and empty objects/arrays are absent
    Content,
}

/// Declarative required-field rule
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Wire name of the field
    pub field: &'static str,
    /// Name used in messages
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldRule {
    pub const fn text(field: &'static str, label: &'static str) -> Self {
        Self { field, label, kind: FieldKind::Text }
    }

    pub const fn list(field: &'static str, label: &'static str) -> Self {
        Self { field, label, kind: FieldKind::List }
    }

    pub const fn content(field: &'static str, label: &'static str) -> Self {
        Self { field, label, kind: FieldKind::Content }
    }

    fn is_satisfied(&self, value: Option<&Value>) -> bool {
        match (self.kind, value) {
            (_, None) | (_, Some(Value::Null)) => false,
            (FieldKind::Text, Some(Value::String(s))) => !s.trim().is_empty(),
            (FieldKind::Text, Some(Value::Number(_))) => true,
            (FieldKind::Text, Some(_)) => false,
            (FieldKind::List, Some(Value::Array(items))) => !items.is_empty(),
            (FieldKind::List, Some(_)) => false,
            (FieldKind::Content, Some(Value::String(s))) => !s.trim().is_empty(),
            (FieldKind::Content, Some(Value::Array(items))) => !items.is_empty(),
            (FieldKind::Content, Some(Value::Object(map))) => !map.is_empty(),
            (FieldKind::Content, Some(_)) => true,
        }
    }
}

/// Whether absent fields are errors (create) or skipped (partial update)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    IfPresent,
}

/// Serialize an input into the JSON view rules are evaluated against
pub fn json_view<T: Serialize>(input: &T) -> Value {
    serde_json::to_value(input).unwrap_or(Value::Null)
}

/// Check every rule against a JSON object
pub fn validate_fields(
    input: &Value,
    rules: &[FieldRule],
    presence: Presence,
    errors: &mut ValidationErrors,
) {
    for rule in rules {
        let value = input.get(rule.field);
        if presence == Presence::IfPresent && value.map_or(true, Value::is_null) {
            continue;
        }
        if !rule.is_satisfied(value) {
            errors.add(rule.field, format!("{} is required", rule.label));
        }
    }
}

/// Check every entry of a nested array against the same rules.
///
/// Errors are keyed `field[i].name` and the message names the 1-based entry.
pub fn validate_entries(
    field: &str,
    entries: &[Value],
    rules: &[FieldRule],
    errors: &mut ValidationErrors,
) {
    for (index, entry) in entries.iter().enumerate() {
        for rule in rules {
            if !rule.is_satisfied(entry.get(rule.field)) {
                errors.add(
                    format!("{}[{}].{}", field, index, rule.field),
                    format!("{} is required for entry {}", rule.label, index + 1),
                );
            }
        }
    }
}

/// Text value that is present and not blank
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULES: &[FieldRule] = &[
        FieldRule::text("title", "Title"),
        FieldRule::list("days", "Days"),
        FieldRule::content("body", "Body"),
    ];

    fn run(input: Value, presence: Presence) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validate_fields(&input, RULES, presence, &mut errors);
        errors
    }

    #[test]
    fn test_all_present() {
        let errors = run(json!({"title": "x", "days": [1], "body": {"ops": []}}), Presence::Required);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_each_field_missing_or_blank_is_named() {
        let complete = json!({"title": "x", "days": [1], "body": "text"});

        for rule in RULES {
            for blank in [Value::Null, json!("   "), json!([])] {
                let mut input = complete.clone();
                input[rule.field] = blank.clone();
                let errors = run(input, Presence::Required);
                assert!(errors.has_error(rule.field), "{} with {:?}", rule.field, blank);
                assert_eq!(errors.errors.len(), 1);
                assert_eq!(
                    errors.get(rule.field).unwrap()[0],
                    format!("{} is required", rule.label)
                );
            }
        }
    }

    #[test]
    fn test_if_present_skips_absent() {
        let errors = run(json!({"title": null}), Presence::IfPresent);
        assert!(errors.is_empty());

        let errors = run(json!({"title": " "}), Presence::IfPresent);
        assert!(errors.has_error("title"));
    }

    #[test]
    fn test_entries_are_indexed() {
        let entries = vec![json!({"title": "ok", "days": [1], "body": 1}), json!({"title": "", "days": [2], "body": 1})];
        let mut errors = ValidationErrors::new();
        validate_entries("items", &entries, RULES, &mut errors);

        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.get("items[1].title").unwrap()[0], "Title is required for entry 2");
    }
}
