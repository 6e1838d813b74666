use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ATTENDED: &str = "attended";
pub const STATUS_CANCELLED: &str = "cancelled";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    /// Globally unique QR payload, immutable once assigned.
    pub token: String,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub attended_at: Option<DateTime<Utc>>,
    /// Base64-encoded PNG of the token QR code, rendered at creation.
    pub qr_code_png: String,
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: String,
}

impl Registration {
    pub fn new(event_id: String, token: String, qr_code_png: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            token,
            status: STATUS_PENDING.to_string(),
            registered_at: Utc::now(),
            attended_at: None,
            qr_code_png,
            participant_name: String::new(),
            participant_email: String::new(),
            participant_phone: String::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Answer {
    pub id: String,
    pub registration_id: String,
    pub field_id: String,
    pub field_value: String,
}

impl Answer {
    pub fn new(registration_id: String, field_id: String, field_value: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            registration_id,
            field_id,
            field_value,
        }
    }
}
