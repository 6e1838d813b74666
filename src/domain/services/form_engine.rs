//! Dynamic form engine: materializes a registration form from an event's
//! field schemas, validates a submission against every field at once, and
//! assembles the registration aggregate for a single transactional write.

use crate::domain::models::field::EventField;
use crate::domain::models::registration::{Answer, Registration};
use crate::domain::services::{codec, identity, qr};
use crate::error::AppError;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Public shape of one form input, in render order.
#[derive(Debug, Serialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub name: String,
    pub label: String,
    pub field_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    pub placeholder: String,
    pub help_text: String,
}

pub fn build_descriptors(fields: &[EventField]) -> Vec<FieldDescriptor> {
    fields
        .iter()
        .map(|f| FieldDescriptor {
            id: f.id.clone(),
            name: f.input_name(),
            label: f.field_name.clone(),
            field_type: f.field_type.clone(),
            required: f.is_required,
            choices: if f.kind().has_choices() { f.choice_list() } else { Vec::new() },
            placeholder: f.placeholder.clone(),
            help_text: f.help_text.clone(),
        })
        .collect()
}

/// One validated field value, canonical stored form.
#[derive(Debug, Clone)]
pub struct ValidatedAnswer {
    pub field_id: String,
    pub value: String,
}

/// Validates a submission keyed by input name (`field_<id>`) against the
/// event's fields. Errors accumulate across fields so the caller can
/// report every problem at once. Unknown keys are ignored; a zero-field
/// event validates trivially.
pub fn validate(
    fields: &[EventField],
    values: &HashMap<String, Value>,
) -> Result<Vec<ValidatedAnswer>, AppError> {
    let mut answers = Vec::new();
    let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for field in fields {
        let input_name = field.input_name();
        let raw = values.get(&input_name);

        if codec::is_absent(raw) {
            if field.is_required {
                errors
                    .entry(input_name)
                    .or_default()
                    .push("This field is required.".to_string());
            }
            continue;
        }
        let raw = raw.expect("present by is_absent check");

        match codec::encode(field, raw) {
            Ok(encoded) => {
                if let Err(msg) = check_choice_membership(field, &encoded) {
                    errors.entry(input_name).or_default().push(msg);
                } else {
                    answers.push(ValidatedAnswer { field_id: field.id.clone(), value: encoded });
                }
            }
            Err(msg) => {
                errors.entry(input_name).or_default().push(msg);
            }
        }
    }

    if errors.is_empty() {
        Ok(answers)
    } else {
        Err(AppError::SubmissionInvalid(errors))
    }
}

/// Selections of choice-backed fields must come from the configured set.
fn check_choice_membership(field: &EventField, encoded: &str) -> Result<(), String> {
    if !field.kind().has_choices() {
        return Ok(());
    }
    let allowed = field.choice_list();

    let selections = match codec::decode_selections(encoded) {
        Some(list) => list,
        None => vec![encoded.to_string()],
    };

    for selection in &selections {
        if !allowed.iter().any(|c| c == selection) {
            return Err(format!(
                "Select a valid choice. {} is not one of the available choices.",
                selection
            ));
        }
    }
    Ok(())
}

/// Assembles the full registration aggregate from validated answers:
/// token, QR image and cached identity are all fixed before the first
/// persistence so the repository can commit everything in one
/// transaction.
pub fn assemble_registration(
    event_id: &str,
    fields: &[EventField],
    validated: &[ValidatedAnswer],
) -> Result<(Registration, Vec<Answer>), AppError> {
    let token = qr::issue_token();
    let qr_png = qr::qr_png_base64(&token)?;
    let mut registration = Registration::new(event_id.to_string(), token, qr_png);

    let by_field: HashMap<String, String> = validated
        .iter()
        .map(|v| (v.field_id.clone(), v.value.clone()))
        .collect();

    let resolved = identity::resolve(fields, &by_field);
    registration.participant_name = resolved.name;
    registration.participant_email = resolved.email;
    registration.participant_phone = resolved.phone;

    let answers = validated
        .iter()
        .map(|v| Answer::new(registration.id.clone(), v.field_id.clone(), v.value.clone()))
        .collect();

    Ok((registration, answers))
}
