use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{RegistrationListParams, SubmitRegistrationRequest};
use crate::api::handlers::event::find_owned_event;
use crate::domain::models::event::Event;
use crate::domain::models::job::Job;
use crate::domain::services::{export, form_engine};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

async fn find_open_event(state: &Arc<AppState>, slug: &str) -> Result<Event, AppError> {
    state.event_repo.find_by_slug(slug).await?
        .filter(|e| e.is_published)
        .ok_or(AppError::NotFound("Event not found".into()))
}

/// Public form descriptors for the registration page, in form order.
pub async fn get_registration_form(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_open_event(&state, &slug).await?;
    let fields = state.field_repo.list_by_event(&event.id).await?;

    Ok(Json(serde_json::json!({
        "event_name": event.name,
        "fields": form_engine::build_descriptors(&fields),
    })))
}

pub async fn submit_registration(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<SubmitRegistrationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_open_event(&state, &slug).await?;

    if !event.registration_window_open(Utc::now()) {
        return Err(AppError::Forbidden("Registration is closed for this event".into()));
    }

    let fields = state.field_repo.list_by_event(&event.id).await?;

    let validated = form_engine::validate(&fields, &payload.answers)?;
    let (registration, answers) = form_engine::assemble_registration(&event.id, &fields, &validated)?;

    // Confirmation mail is queued in the same transaction; the worker
    // picks it up after commit, so a relay outage never blocks the
    // registration itself.
    let jobs = if registration.participant_email.is_empty() {
        Vec::new()
    } else {
        vec![Job::new("CONFIRMATION", registration.id.clone(), Utc::now())]
    };

    let created = state.registration_repo.create_with_answers(&registration, &answers, jobs).await?;

    info!("Registration created: {} for event {}", created.id, slug);
    Ok(Json(created))
}

/// Success-page data, looked up by the opaque registration token.
pub async fn get_registration_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let registration = state.registration_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Registration not found".into()))?;

    let event = state.event_repo.find_by_id(&registration.event_id).await?
        .ok_or(AppError::Internal)?;

    Ok(Json(serde_json::json!({
        "registration": registration,
        "event_name": event.name,
        "event_location": event.location,
        "event_start_date": event.start_date,
    })))
}

pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
    Query(params): Query<RegistrationListParams>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_owned_event(&state, &slug, &user.id).await?;
    let registrations = state.registration_repo
        .list_by_event(&event.id, params.search.as_deref(), params.status.as_deref())
        .await?;
    Ok(Json(registrations))
}

/// Fixed columns plus one column per custom field, in schema order.
pub async fn export_registrations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_owned_event(&state, &slug, &user.id).await?;
    let fields = state.field_repo.list_by_event(&event.id).await?;
    let registrations = state.registration_repo.list_by_event(&event.id, None, None).await?;

    let mut with_answers = Vec::with_capacity(registrations.len());
    for registration in registrations {
        let answers = state.registration_repo.list_answers(&registration.id).await?;
        with_answers.push((registration, answers));
    }

    Ok(Json(export::export_rows(&fields, &with_answers)))
}

pub async fn cancel_registration(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let registration = state.registration_repo.find_by_id(&registration_id).await?
        .ok_or(AppError::NotFound("Registration not found".into()))?;

    let event = state.event_repo.find_by_id(&registration.event_id).await?
        .ok_or(AppError::Internal)?;
    if event.organizer_id != user.id {
        return Err(AppError::Forbidden("You are not the organizer of this event".into()));
    }

    let cancelled = state.registration_repo.cancel(&registration.id).await?;
    info!("Registration cancelled: {}", cancelled.id);
    Ok(Json(cancelled))
}

pub async fn delete_registration(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let registration = state.registration_repo.find_by_id(&registration_id).await?
        .ok_or(AppError::NotFound("Registration not found".into()))?;

    let event = state.event_repo.find_by_id(&registration.event_id).await?
        .ok_or(AppError::Internal)?;
    if event.organizer_id != user.id {
        return Err(AppError::Forbidden("You are not the organizer of this event".into()));
    }

    state.registration_repo.delete(&registration.id).await?;
    info!("Registration deleted: {}", registration.id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
