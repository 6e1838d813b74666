use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub is_published: Option<bool>,
    pub registration_open: Option<DateTime<Utc>>,
    pub registration_close: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub is_published: Option<bool>,
    pub registration_open: Option<DateTime<Utc>>,
    pub registration_close: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct CreateFieldRequest {
    pub field_name: String,
    pub field_type: String,
    pub is_required: Option<bool>,
    pub order_index: Option<i32>,
    pub choices: Option<String>,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub is_participant_name: Option<bool>,
    pub is_participant_email: Option<bool>,
    pub is_participant_phone: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateFieldRequest {
    pub field_name: Option<String>,
    pub field_type: Option<String>,
    pub is_required: Option<bool>,
    pub order_index: Option<i32>,
    pub choices: Option<String>,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub is_participant_name: Option<bool>,
    pub is_participant_email: Option<bool>,
    pub is_participant_phone: Option<bool>,
}

#[derive(Deserialize)]
pub struct SubmitRegistrationRequest {
    /// Values keyed by input name (`field_<id>`).
    #[serde(default)]
    pub answers: HashMap<String, Value>,
}

#[derive(Deserialize)]
pub struct ScanRequest {
    pub qr_code: String,
}

#[derive(Deserialize)]
pub struct RegistrationListParams {
    pub search: Option<String>,
    pub status: Option<String>,
}
