//! Request validation for item payloads.
//!
//! Payloads arrive as raw JSON objects so that type mismatches (`"quantity": "ten"`)
//! and explicit nulls can be reported per field instead of failing deserialization
//! wholesale. String values are trimmed first and an empty string counts as absent.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{ItemChanges, NewItem};

pub const NAME_MAX_CHARS: usize = 255;

/// Field-keyed error messages, in the order the fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(IndexMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Top-level message: the first error, plus a count of the rest.
    pub fn summary(&self) -> String {
        let mut messages = self.0.values().flatten();
        let Some(first) = messages.next() else {
            return "The given data was invalid.".to_string();
        };
        match messages.count() {
            0 => first.clone(),
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// What a request carries for one field, after trimming.
enum Field<'a> {
    Missing,
    Blank,
    Present(&'a Value),
}

fn field<'a>(input: &'a Map<String, Value>, key: &str) -> Field<'a> {
    match input.get(key) {
        None => Field::Missing,
        Some(Value::Null) => Field::Blank,
        Some(Value::String(s)) if s.trim().is_empty() => Field::Blank,
        Some(value) => Field::Present(value),
    }
}

fn required(key: &str) -> String {
    format!("The {key} field is required.")
}

fn check_name(value: &Value) -> Result<String, String> {
    let Value::String(raw) = value else {
        return Err("The name field must be a string.".to_string());
    };
    let name = raw.trim();
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(format!(
            "The name field must not be greater than {NAME_MAX_CHARS} characters."
        ));
    }
    Ok(name.to_string())
}

fn check_quantity(value: &Value) -> Result<i32, String> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let Some(quantity) = parsed else {
        return Err("The quantity field must be an integer.".to_string());
    };
    if quantity < 0 {
        return Err("The quantity field must be at least 0.".to_string());
    }
    i32::try_from(quantity)
        .map_err(|_| format!("The quantity field must not be greater than {}.", i32::MAX))
}

/// Validate a create payload: both fields are required.
pub fn validate_create(input: &Map<String, Value>) -> Result<NewItem, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = match field(input, "name") {
        Field::Missing | Field::Blank => {
            errors.add("name", required("name"));
            None
        }
        Field::Present(v) => check_name(v).map_err(|e| errors.add("name", e)).ok(),
    };

    let quantity = match field(input, "quantity") {
        Field::Missing | Field::Blank => {
            errors.add("quantity", required("quantity"));
            None
        }
        Field::Present(v) => check_quantity(v).map_err(|e| errors.add("quantity", e)).ok(),
    };

    match (name, quantity) {
        (Some(name), Some(quantity)) if errors.is_empty() => Ok(NewItem { name, quantity }),
        _ => Err(errors),
    }
}

/// Validate an update payload: absent fields are skipped, present ones follow the
/// create rules (so an explicit null or blank name is still rejected).
pub fn validate_update(input: &Map<String, Value>) -> Result<ItemChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut changes = ItemChanges::default();

    match field(input, "name") {
        Field::Missing => {}
        Field::Blank => errors.add("name", required("name")),
        Field::Present(v) => match check_name(v) {
            Ok(name) => changes.name = Some(name),
            Err(e) => errors.add("name", e),
        },
    }

    match field(input, "quantity") {
        Field::Missing => {}
        Field::Blank => errors.add("quantity", required("quantity")),
        Field::Present(v) => match check_quantity(v) {
            Ok(quantity) => changes.quantity = Some(quantity),
            Err(e) => errors.add("quantity", e),
        },
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    // ── Create ─────────────────────────────────────────────────────────────────

    #[test]
    fn create_accepts_valid_payload_and_trims_name() {
        let item = validate_create(&obj(json!({ "name": "  Widget  ", "quantity": 10 }))).unwrap();
        assert_eq!(
            item,
            NewItem {
                name: "Widget".to_string(),
                quantity: 10
            }
        );
    }

    #[test]
    fn create_requires_both_fields() {
        let errors = validate_create(&obj(json!({}))).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["The name field is required."]);
        assert_eq!(errors.get("quantity").unwrap(), ["The quantity field is required."]);
        assert_eq!(errors.summary(), "The name field is required. (and 1 more error)");
    }

    #[test]
    fn create_rejects_blank_name() {
        for name in [json!(""), json!("   "), Value::Null] {
            let errors = validate_create(&obj(json!({ "name": name, "quantity": 5 }))).unwrap_err();
            assert!(errors.contains("name"));
            assert!(!errors.contains("quantity"));
        }
    }

    #[test]
    fn create_rejects_negative_quantity() {
        let errors = validate_create(&obj(json!({ "name": "Widget", "quantity": -1 }))).unwrap_err();
        assert_eq!(errors.get("quantity").unwrap(), ["The quantity field must be at least 0."]);
        assert_eq!(errors.summary(), "The quantity field must be at least 0.");
    }

    #[test]
    fn create_name_length_is_counted_in_characters() {
        let ok = "é".repeat(NAME_MAX_CHARS);
        assert!(validate_create(&obj(json!({ "name": ok, "quantity": 1 }))).is_ok());

        let too_long = "a".repeat(NAME_MAX_CHARS + 1);
        let errors = validate_create(&obj(json!({ "name": too_long, "quantity": 1 }))).unwrap_err();
        assert_eq!(
            errors.get("name").unwrap(),
            ["The name field must not be greater than 255 characters."]
        );
    }

    #[test]
    fn create_rejects_non_string_name() {
        let errors = validate_create(&obj(json!({ "name": 42, "quantity": 1 }))).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["The name field must be a string."]);
    }

    #[test]
    fn quantity_type_rules() {
        let accepted = [json!(0), json!(7), json!("12"), json!(3.0)];
        for q in accepted {
            assert!(
                validate_create(&obj(json!({ "name": "Widget", "quantity": q.clone() }))).is_ok(),
                "{q} should be accepted"
            );
        }

        let rejected = [json!(1.5), json!("ten"), json!(true), json!([1])];
        for q in rejected {
            let errors =
                validate_create(&obj(json!({ "name": "Widget", "quantity": q.clone() }))).unwrap_err();
            assert_eq!(
                errors.get("quantity").unwrap(),
                ["The quantity field must be an integer."],
                "{q} should be rejected"
            );
        }
    }

    #[test]
    fn quantity_must_fit_storage_column() {
        let errors = validate_create(&obj(json!({ "name": "Widget", "quantity": 3_000_000_000i64 })))
            .unwrap_err();
        assert_eq!(
            errors.get("quantity").unwrap(),
            ["The quantity field must not be greater than 2147483647."]
        );
    }

    // ── Update ─────────────────────────────────────────────────────────────────

    #[test]
    fn update_with_only_quantity() {
        let changes = validate_update(&obj(json!({ "quantity": 5 }))).unwrap();
        assert_eq!(
            changes,
            ItemChanges {
                name: None,
                quantity: Some(5)
            }
        );
    }

    #[test]
    fn update_empty_payload_is_empty_change_set() {
        let changes = validate_update(&obj(json!({ "colour": "red" }))).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn update_present_fields_follow_create_rules() {
        let errors = validate_update(&obj(json!({ "name": "", "quantity": -3 }))).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["The name field is required."]);
        assert_eq!(errors.get("quantity").unwrap(), ["The quantity field must be at least 0."]);
    }

    #[test]
    fn errors_serialize_as_field_map() {
        let errors = validate_create(&obj(json!({ "quantity": 1 }))).unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({ "name": ["The name field is required."] })
        );
    }

    #[test]
    fn summary_pluralizes() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "first");
        errors.add("name", "second");
        errors.add("quantity", "third");
        assert_eq!(errors.summary(), "first (and 2 more errors)");
    }
}
