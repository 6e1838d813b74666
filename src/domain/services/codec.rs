//! Value codec between raw submitted values and their canonical stored
//! string form. Single-valued types store the direct string; checkbox
//! selections store a JSON list so they round-trip without delimiter
//! ambiguity.

use crate::domain::models::field::{EventField, FieldType};
use chrono::NaiveDate;
use serde_json::Value;

const PHONE_MAX_LEN: usize = 20;

/// Validates and canonicalizes one submitted value. Errors are
/// field-scoped human-readable messages; the form engine aggregates them.
pub fn encode(field: &EventField, raw: &Value) -> Result<String, String> {
    match field.kind() {
        FieldType::Checkbox => {
            let selections = as_string_list(raw)
                .ok_or_else(|| "Enter a list of choices.".to_string())?;
            serde_json::to_string(&selections).map_err(|_| "Enter a list of choices.".to_string())
        }
        FieldType::Number => {
            let text = scalar_text(raw).ok_or_else(|| "Enter a whole number.".to_string())?;
            text.trim()
                .parse::<i64>()
                .map(|n| n.to_string())
                .map_err(|_| "Enter a whole number.".to_string())
        }
        FieldType::Date => {
            let text = scalar_text(raw).ok_or_else(|| "Enter a valid date.".to_string())?;
            NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .map(|d| d.format("%Y-%m-%d").to_string())
                .map_err(|_| "Enter a valid date (YYYY-MM-DD).".to_string())
        }
        FieldType::Email => {
            let text = scalar_text(raw).ok_or_else(|| "Enter a valid email address.".to_string())?;
            let trimmed = text.trim();
            if is_plausible_email(trimmed) {
                Ok(trimmed.to_string())
            } else {
                Err("Enter a valid email address.".to_string())
            }
        }
        FieldType::Phone => {
            let text = scalar_text(raw).ok_or_else(|| "Enter a phone number.".to_string())?;
            let trimmed = text.trim();
            if trimmed.len() > PHONE_MAX_LEN {
                Err(format!("Ensure this value has at most {} characters.", PHONE_MAX_LEN))
            } else {
                Ok(trimmed.to_string())
            }
        }
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Radio
        | FieldType::Select
        | FieldType::File => scalar_text(raw)
            .map(|s| s.to_string())
            .ok_or_else(|| "Enter a value.".to_string()),
    }
}

/// Formats a stored value for display. Checkbox values are decoded from
/// their JSON list form and joined with ", "; anything that fails to
/// decode (legacy or malformed data) is returned verbatim. Never fails.
pub fn display_value(field_type: FieldType, stored: &str) -> String {
    if field_type == FieldType::Checkbox {
        if let Ok(values) = serde_json::from_str::<Vec<String>>(stored) {
            return values.join(", ");
        }
    }
    stored.to_string()
}

/// Decodes a stored checkbox value back into its selection list.
pub fn decode_selections(stored: &str) -> Option<Vec<String>> {
    serde_json::from_str(stored).ok()
}

/// A value counts as absent when the input omitted it entirely, sent
/// null, an empty string, or an empty selection list.
pub fn is_absent(raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_string_list(raw: &Value) -> Option<Vec<String>> {
    match raw {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        // A lone selection may arrive unwrapped.
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

fn is_plausible_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !text.contains(char::is_whitespace)
        && !domain.contains('@')
}
