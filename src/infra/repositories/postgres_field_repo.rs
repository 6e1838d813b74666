use crate::domain::{models::field::EventField, ports::FieldRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresFieldRepo {
    pool: PgPool,
}

impl PostgresFieldRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FieldRepository for PostgresFieldRepo {
    async fn create(&self, field: &EventField) -> Result<EventField, AppError> {
        sqlx::query_as::<_, EventField>(
            "INSERT INTO event_fields (id, event_id, field_name, field_type, is_required, order_index, choices, placeholder, help_text, is_participant_name, is_participant_email, is_participant_phone, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *",
        )
            .bind(&field.id).bind(&field.event_id).bind(&field.field_name).bind(&field.field_type)
            .bind(field.is_required).bind(field.order_index).bind(&field.choices)
            .bind(&field.placeholder).bind(&field.help_text)
            .bind(field.is_participant_name).bind(field.is_participant_email).bind(field.is_participant_phone)
            .bind(field.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, event_id: &str, id: &str) -> Result<Option<EventField>, AppError> {
        sqlx::query_as::<_, EventField>("SELECT * FROM event_fields WHERE event_id = $1 AND id = $2")
            .bind(event_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<EventField>, AppError> {
        sqlx::query_as::<_, EventField>(
            "SELECT * FROM event_fields WHERE event_id = $1 ORDER BY order_index ASC, created_at ASC, id ASC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, field: &EventField) -> Result<EventField, AppError> {
        sqlx::query_as::<_, EventField>(
            "UPDATE event_fields SET field_name=$1, field_type=$2, is_required=$3, order_index=$4, choices=$5, placeholder=$6, help_text=$7, is_participant_name=$8, is_participant_email=$9, is_participant_phone=$10
             WHERE id=$11 AND event_id=$12
             RETURNING *",
        )
            .bind(&field.field_name).bind(&field.field_type).bind(field.is_required)
            .bind(field.order_index).bind(&field.choices).bind(&field.placeholder).bind(&field.help_text)
            .bind(field.is_participant_name).bind(field.is_participant_email).bind(field.is_participant_phone)
            .bind(&field.id).bind(&field.event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, event_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM event_fields WHERE id = $1 AND event_id = $2")
            .bind(id)
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Field not found".into()));
        }
        Ok(())
    }
}
