use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub organizer_id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub is_published: bool,
    pub registration_open: Option<DateTime<Utc>>,
    pub registration_close: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub organizer_id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub is_published: bool,
    pub registration_open: Option<DateTime<Utc>>,
    pub registration_close: Option<DateTime<Utc>>,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            organizer_id: params.organizer_id,
            name: params.name,
            slug: params.slug,
            description: params.description,
            start_date: params.start_date,
            end_date: params.end_date,
            start_time: params.start_time,
            end_time: params.end_time,
            location: params.location,
            is_published: params.is_published,
            registration_open: params.registration_open,
            registration_close: params.registration_close,
            created_at: now,
            updated_at: now,
        }
    }

    /// The submission window is open when no bound is configured or the
    /// current time falls between the configured bounds.
    pub fn registration_window_open(&self, now: DateTime<Utc>) -> bool {
        if let Some(open) = self.registration_open
            && now < open {
            return false;
        }
        if let Some(close) = self.registration_close
            && now > close {
            return false;
        }
        true
    }
}
