use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::ScanRequest;
use crate::api::dtos::responses::{CheckinResponse, ScanResponse};
use crate::domain::models::registration::Registration;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;
use tracing::info;

/// Resolves a scanned token to its registration, enforcing the scan
/// preconditions: well-formed token, unique lookup, organizer match.
/// Each failure keeps its own error kind so the operator sees the exact
/// rejection reason.
async fn resolve_scan(
    state: &Arc<AppState>,
    organizer_id: &str,
    qr_code: &str,
) -> Result<(Registration, String), AppError> {
    if Uuid::parse_str(qr_code.trim()).is_err() {
        return Err(AppError::MalformedToken);
    }

    let registration = state.registration_repo.find_by_token(qr_code.trim()).await?
        .ok_or(AppError::NotFound("Registration not found".into()))?;

    let event = state.event_repo.find_by_id(&registration.event_id).await?
        .ok_or(AppError::Internal)?;

    if event.organizer_id != organizer_id {
        return Err(AppError::Forbidden("You are not the organizer of this event".into()));
    }

    Ok((registration, event.name))
}

/// Read-only lookup used by the scanner UI before confirming check-in.
pub async fn scan(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ScanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (registration, event_name) = resolve_scan(&state, &user.id, &payload.qr_code).await?;

    Ok(Json(ScanResponse {
        registration_id: registration.id.clone(),
        participant_name: registration.participant_name.clone(),
        participant_email: registration.participant_email.clone(),
        event_name,
        status: registration.status.clone(),
        registered_at: registration.registered_at.to_rfc3339(),
        attended_at: registration.attended_at.map(|at| at.to_rfc3339()),
    }))
}

/// The pending → attended transition. Re-scanning an attended
/// registration is rejected, not silently re-applied: a duplicate scan
/// means a duplicate entry attempt and the operator must see it.
pub async fn checkin(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ScanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (registration, _) = resolve_scan(&state, &user.id, &payload.qr_code).await?;

    let updated = state.registration_repo.mark_attended(&registration.id, Utc::now()).await?
        .ok_or(AppError::AlreadyCheckedIn)?;

    info!("Checked in registration {} ({})", updated.id, updated.participant_name);

    Ok(Json(CheckinResponse {
        success: true,
        message: format!("{} checked in successfully", updated.participant_name),
        attended_at: updated.attended_at.unwrap_or_else(Utc::now).to_rfc3339(),
    }))
}
