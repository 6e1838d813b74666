use crate::domain::models::{
    auth::RefreshTokenRecord,
    event::Event,
    field::EventField,
    job::Job,
    registration::{Answer, Registration},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError>;
    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError>;
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, organizer_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait FieldRepository: Send + Sync {
    async fn create(&self, field: &EventField) -> Result<EventField, AppError>;
    async fn find_by_id(&self, event_id: &str, id: &str) -> Result<Option<EventField>, AppError>;
    /// Fields in form order: (order_index, created_at, id).
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<EventField>, AppError>;
    async fn update(&self, field: &EventField) -> Result<EventField, AppError>;
    /// Deletes the field and, via cascade, every answer referencing it.
    async fn delete(&self, event_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Persists the registration, its answers and any queued mail jobs in
    /// one transaction. No partial commit survives a failure.
    async fn create_with_answers(
        &self,
        registration: &Registration,
        answers: &[Answer],
        jobs: Vec<Job>,
    ) -> Result<Registration, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Registration>, AppError>;
    async fn list_by_event(
        &self,
        event_id: &str,
        search: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<Registration>, AppError>;
    async fn list_answers(&self, registration_id: &str) -> Result<Vec<Answer>, AppError>;
    /// Conditional transition to `attended`. Returns the updated row, or
    /// None when the registration was already attended — the guard is
    /// evaluated atomically by the storage layer so two concurrent scans
    /// cannot both succeed.
    async fn mark_attended(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Registration>, AppError>;
    async fn cancel(&self, id: &str) -> Result<Registration, AppError>;
    async fn count_by_status(&self, event_id: &str, status: &str) -> Result<i64, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachment_name: Option<&str>,
        attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError>;
}
