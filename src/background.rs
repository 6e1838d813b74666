use std::sync::Arc;
use std::time::Duration;
use base64::{engine::general_purpose, Engine as _};
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::error::AppError;
use crate::state::AppState;

/// Drains pending mail jobs. Job failures are recorded on the job row
/// and logged; the registration they belong to is already committed and
/// is never touched from here.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background job worker...");

    loop {
        match state.job_repo.find_pending(10).await {
            Ok(jobs) => {
                for job in jobs {
                    let job_id = job.id.clone();
                    let job_type = job.job_type.clone();

                    let span = info_span!(
                        "background_job",
                        job_id = %job_id,
                        job_type = %job_type,
                    );

                    let state = state.clone();

                    async move {
                        info!("Processing job: {}", job_type);
                        match process_job(&state, &job).await {
                            Ok(_) => {
                                info!("Job completed successfully");
                                if let Err(e) = state.job_repo.update_status(&job.id, "COMPLETED", None).await {
                                    error!("Failed to mark job as completed: {:?}", e);
                                }
                            },
                            Err(e) => {
                                let err_msg = format!("{}", e);
                                error!("Job failed with error: {}", err_msg);
                                if let Err(up_err) = state.job_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
                                    error!("Failed to mark job as failed: {:?}", up_err);
                                }
                            }
                        }
                    }
                        .instrument(span)
                        .await;
                }
            }
            Err(e) => error!("Failed to fetch pending jobs: {:?}", e),
        }
        sleep(Duration::from_secs(5)).await;
    }
}

async fn process_job(
    state: &Arc<AppState>,
    job: &crate::domain::models::job::Job,
) -> Result<(), AppError> {
    let registration_id = &job.payload.registration_id;

    let registration = state.registration_repo.find_by_id(registration_id).await?
        .ok_or(AppError::NotFound(format!("Registration {} not found", registration_id)))?;

    if registration.participant_email.is_empty() {
        info!("Registration {} has no participant email. Skipping confirmation.", registration.id);
        return Ok(());
    }

    let event = state.event_repo.find_by_id(&registration.event_id).await?
        .ok_or(AppError::NotFound(format!("Event {} not found", registration.event_id)))?;

    let mut context = tera::Context::new();
    context.insert("participant_name", &registration.participant_name);
    context.insert("event_name", &event.name);
    context.insert("event_description", &event.description);
    context.insert("start_date", &event.start_date.format("%Y-%m-%d").to_string());
    context.insert("start_time", &event.start_time.format("%H:%M").to_string());
    context.insert("location", &event.location);
    context.insert("ticket_link", &format!(
        "{}/registrations/{}",
        state.config.site_url.trim_end_matches('/'),
        registration.token
    ));

    let html_body = state.templates.render("confirmation.html", &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Tera render error: {:?}", e)))?;

    let subject = format!("Registration Confirmation - {}", event.name);

    // The QR image is stored base64; the relay expects raw bytes.
    let qr_bytes = general_purpose::STANDARD
        .decode(&registration.qr_code_png)
        .map_err(|e| AppError::InternalWithMsg(format!("Stored QR code is not valid base64: {}", e)))?;

    info!("Sending confirmation email to {}", registration.participant_email);
    state.email_service.send(
        &registration.participant_email,
        &subject,
        &html_body,
        Some("qr_code.png"),
        Some(&qr_bytes),
    ).await?;

    Ok(())
}
