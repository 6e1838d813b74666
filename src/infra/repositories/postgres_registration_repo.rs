use crate::domain::models::job::Job;
use crate::domain::models::registration::{Answer, Registration};
use crate::domain::ports::RegistrationRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresRegistrationRepo {
    pool: PgPool,
}

impl PostgresRegistrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepo {
    async fn create_with_answers(&self, registration: &Registration, answers: &[Answer], jobs: Vec<Job>) -> Result<Registration, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (id, event_id, token, status, registered_at, attended_at, qr_code_png, participant_name, participant_email, participant_phone)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
            .bind(&registration.id).bind(&registration.event_id).bind(&registration.token)
            .bind(&registration.status).bind(registration.registered_at).bind(registration.attended_at)
            .bind(&registration.qr_code_png).bind(&registration.participant_name)
            .bind(&registration.participant_email).bind(&registration.participant_phone)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for answer in answers {
            sqlx::query("INSERT INTO answers (id, registration_id, field_id, field_value) VALUES ($1, $2, $3, $4)")
                .bind(&answer.id).bind(&answer.registration_id).bind(&answer.field_id).bind(&answer.field_value)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        for job in jobs {
            sqlx::query("INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)")
                .bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.execute_at)
                .bind(&job.status).bind(&job.error_message).bind(job.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE token = $1")
            .bind(token).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str, search: Option<&str>, status: Option<&str>) -> Result<Vec<Registration>, AppError> {
        let mut sql = String::from("SELECT * FROM registrations WHERE event_id = $1");
        let mut arg = 1;
        if search.is_some() {
            sql.push_str(&format!(
                " AND (participant_name ILIKE ${0} OR participant_email ILIKE ${0} OR participant_phone ILIKE ${0})",
                arg + 1
            ));
            arg += 1;
        }
        if status.is_some() {
            sql.push_str(&format!(" AND status = ${}", arg + 1));
        }
        sql.push_str(" ORDER BY registered_at DESC");

        let mut query = sqlx::query_as::<_, Registration>(&sql).bind(event_id);
        if let Some(term) = search {
            query = query.bind(format!("%{}%", term));
        }
        if let Some(status) = status {
            query = query.bind(status);
        }

        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_answers(&self, registration_id: &str) -> Result<Vec<Answer>, AppError> {
        sqlx::query_as::<_, Answer>("SELECT * FROM answers WHERE registration_id = $1")
            .bind(registration_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn mark_attended(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Registration>, AppError> {
        // Conditional update: the status guard runs inside the storage
        // layer so two concurrent scans cannot both transition the row.
        sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET status = 'attended', attended_at = $1 WHERE id = $2 AND status != 'attended' RETURNING *",
        )
            .bind(at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel(&self, id: &str) -> Result<Registration, AppError> {
        sqlx::query_as::<_, Registration>("UPDATE registrations SET status = 'cancelled' WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Registration not found".into()))
    }

    async fn count_by_status(&self, event_id: &str, status: &str) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = $2")
            .bind(event_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
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
