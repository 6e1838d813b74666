//! Derives the cached participant identity of a registration from the
//! identity-flagged fields of its event. Pure and idempotent: the same
//! fields and answers always produce the same identity.

use crate::domain::models::field::EventField;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParticipantIdentity {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// `fields` must already be in form order; `answers` maps field id to the
/// stored answer value. Name-flagged answers are space-joined in schema
/// order; email and phone take the first flagged field with an answer.
/// Missing flags or answers leave the slot empty, never an error.
pub fn resolve(fields: &[EventField], answers: &HashMap<String, String>) -> ParticipantIdentity {
    let name = fields
        .iter()
        .filter(|f| f.is_participant_name)
        .filter_map(|f| answers.get(&f.id))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let email = fields
        .iter()
        .filter(|f| f.is_participant_email)
        .find_map(|f| answers.get(&f.id))
        .cloned()
        .unwrap_or_default();

    let phone = fields
        .iter()
        .filter(|f| f.is_participant_phone)
        .find_map(|f| answers.get(&f.id))
        .cloned()
        .unwrap_or_default();

    ParticipantIdentity { name, email, phone }
}
