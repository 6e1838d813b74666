use crate::domain::models::job::Job;
use crate::domain::models::registration::{Answer, Registration};
use crate::domain::ports::RegistrationRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteRegistrationRepo {
    pool: SqlitePool,
}

impl SqliteRegistrationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepo {
    async fn create_with_answers(&self, registration: &Registration, answers: &[Answer], jobs: Vec<Job>) -> Result<Registration, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (id, event_id, token, status, registered_at, attended_at, qr_code_png, participant_name, participant_email, participant_phone)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
            .bind(&registration.id).bind(&registration.event_id).bind(&registration.token)
            .bind(&registration.status).bind(registration.registered_at).bind(registration.attended_at)
            .bind(&registration.qr_code_png).bind(&registration.participant_name)
            .bind(&registration.participant_email).bind(&registration.participant_phone)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for answer in answers {
            sqlx::query("INSERT INTO answers (id, registration_id, field_id, field_value) VALUES (?, ?, ?, ?)")
                .bind(&answer.id).bind(&answer.registration_id).bind(&answer.field_id).bind(&answer.field_value)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        for job in jobs {
            sqlx::query("INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)")
                .bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.execute_at)
                .bind(&job.status).bind(&job.error_message).bind(job.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE token = ?")
            .bind(token).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str, search: Option<&str>, status: Option<&str>) -> Result<Vec<Registration>, AppError> {
        let mut sql = String::from("SELECT * FROM registrations WHERE event_id = ?");
        if search.is_some() {
            sql.push_str(" AND (participant_name LIKE ? OR participant_email LIKE ? OR participant_phone LIKE ?)");
        }
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY registered_at DESC");

        let mut query = sqlx::query_as::<_, Registration>(&sql).bind(event_id);
        if let Some(term) = search {
            let pattern = format!("%{}%", term);
            query = query.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
        }
        if let Some(status) = status {
            query = query.bind(status);
        }

        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_answers(&self, registration_id: &str) -> Result<Vec<Answer>, AppError> {
        sqlx::query_as::<_, Answer>("SELECT * FROM answers WHERE registration_id = ?")
            .bind(registration_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn mark_attended(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Registration>, AppError> {
        // Conditional update: the status guard runs inside the storage
        // layer so two concurrent scans cannot both transition the row.
        sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET status = 'attended', attended_at = ? WHERE id = ? AND status != 'attended' RETURNING *",
        )
            .bind(at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel(&self, id: &str) -> Result<Registration, AppError> {
        sqlx::query_as::<_, Registration>("UPDATE registrations SET status = 'cancelled' WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Registration not found".into()))
    }

    async fn count_by_status(&self, event_id: &str, status: &str) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = ? AND status = ?")
            .bind(event_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Registration not found".into()));
        }
        Ok(())
    }
}
