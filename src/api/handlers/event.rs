use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{CreateEventRequest, UpdateEventRequest},
    responses::EventStatsResponse,
};
use crate::domain::models::event::{Event, NewEventParams};
use crate::domain::models::registration::{STATUS_ATTENDED, STATUS_CANCELLED, STATUS_PENDING};
use crate::domain::services::{qr, slugs};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

/// Loads an event by slug and verifies the acting user owns it.
pub async fn find_owned_event(
    state: &Arc<AppState>,
    slug: &str,
    organizer_id: &str,
) -> Result<Event, AppError> {
    let event = state.event_repo.find_by_slug(slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.organizer_id != organizer_id {
        return Err(AppError::Forbidden("You are not the organizer of this event".into()));
    }
    Ok(event)
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Event name must not be empty".into()));
    }
    if payload.end_date < payload.start_date {
        return Err(AppError::Validation("End date must be after start date".into()));
    }
    if let (Some(open), Some(close)) = (payload.registration_open, payload.registration_close)
        && close < open {
        return Err(AppError::Validation("Registration close must be after registration open".into()));
    }

    // Slug is fixed at creation; collisions get a numeric suffix.
    let slug = slugs::unique_slug(&state.event_repo, &payload.name).await?;

    let event = Event::new(NewEventParams {
        organizer_id: user.id.clone(),
        name: payload.name,
        slug,
        description: payload.description.unwrap_or_default(),
        start_date: payload.start_date,
        end_date: payload.end_date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        is_published: payload.is_published.unwrap_or(false),
        registration_open: payload.registration_open,
        registration_close: payload.registration_close,
    });

    let created = state.event_repo.create(&event).await?;
    info!("Event created: {} ({})", created.name, created.slug);
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_by_organizer(&user.id).await?;
    Ok(Json(events))
}

/// Public event page data: published events only, with the registration
/// link and its QR code for sharing.
pub async fn get_public_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .filter(|e| e.is_published)
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let registration_url = qr::registration_url(&state.config.site_url, &event.slug);
    let registration_qr = qr::qr_png_base64(&registration_url)?;

    Ok(Json(serde_json::json!({
        "event": event,
        "registration_url": registration_url,
        "registration_qr_png": registration_qr,
    })))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = find_owned_event(&state, &slug, &user.id).await?;

    // Renaming never changes the slug.
    if let Some(name) = payload.name { event.name = name; }
    if let Some(description) = payload.description { event.description = description; }
    if let Some(start_date) = payload.start_date { event.start_date = start_date; }
    if let Some(end_date) = payload.end_date { event.end_date = end_date; }
    if let Some(start_time) = payload.start_time { event.start_time = start_time; }
    if let Some(end_time) = payload.end_time { event.end_time = end_time; }
    if let Some(location) = payload.location { event.location = location; }
    if let Some(is_published) = payload.is_published { event.is_published = is_published; }
    if payload.registration_open.is_some() { event.registration_open = payload.registration_open; }
    if payload.registration_close.is_some() { event.registration_close = payload.registration_close; }

    if event.end_date < event.start_date {
        return Err(AppError::Validation("End date must be after start date".into()));
    }

    event.updated_at = Utc::now();
    let updated = state.event_repo.update(&event).await?;
    info!("Event updated: {}", updated.slug);
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_owned_event(&state, &slug, &user.id).await?;
    state.event_repo.delete(&user.id, &event.id).await?;
    info!("Event deleted: {}", slug);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn event_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_owned_event(&state, &slug, &user.id).await?;

    let attended = state.registration_repo.count_by_status(&event.id, STATUS_ATTENDED).await?;
    let cancelled = state.registration_repo.count_by_status(&event.id, STATUS_CANCELLED).await?;
    let pending = state.registration_repo.count_by_status(&event.id, STATUS_PENDING).await?;

    Ok(Json(EventStatsResponse {
        total_registrations: pending + attended + cancelled,
        attended_count: attended,
        cancelled_count: cancelled,
    }))
}
