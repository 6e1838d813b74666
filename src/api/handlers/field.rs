use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateFieldRequest, UpdateFieldRequest};
use crate::api::handlers::event::find_owned_event;
use crate::domain::models::field::{EventField, FieldType, NewFieldParams};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_field(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<CreateFieldRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_owned_event(&state, &slug, &user.id).await?;

    if payload.field_name.trim().is_empty() {
        return Err(AppError::Validation("Field name must not be empty".into()));
    }
    let field_type = FieldType::parse(&payload.field_type)
        .ok_or_else(|| AppError::Validation(format!("Unknown field type: {}", payload.field_type)))?;

    if field_type.has_choices()
        && payload.choices.as_deref().map(str::trim).unwrap_or("").is_empty() {
        return Err(AppError::Validation("Choice fields need at least one choice".into()));
    }

    let field = EventField::new(NewFieldParams {
        event_id: event.id.clone(),
        field_name: payload.field_name,
        field_type,
        is_required: payload.is_required.unwrap_or(true),
        order_index: payload.order_index.unwrap_or(0),
        choices: payload.choices.unwrap_or_default(),
        placeholder: payload.placeholder.unwrap_or_default(),
        help_text: payload.help_text.unwrap_or_default(),
        is_participant_name: payload.is_participant_name.unwrap_or(false),
        is_participant_email: payload.is_participant_email.unwrap_or(false),
        is_participant_phone: payload.is_participant_phone.unwrap_or(false),
    });

    let created = state.field_repo.create(&field).await?;
    info!("Field created: {} on event {}", created.field_name, slug);
    Ok(Json(created))
}

pub async fn list_fields(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_owned_event(&state, &slug, &user.id).await?;
    let fields = state.field_repo.list_by_event(&event.id).await?;
    Ok(Json(fields))
}

pub async fn update_field(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((slug, field_id)): Path<(String, String)>,
    Json(payload): Json<UpdateFieldRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_owned_event(&state, &slug, &user.id).await?;

    let mut field = state.field_repo.find_by_id(&event.id, &field_id).await?
        .ok_or(AppError::NotFound("Field not found".into()))?;

    if let Some(field_name) = payload.field_name {
        if field_name.trim().is_empty() {
            return Err(AppError::Validation("Field name must not be empty".into()));
        }
        field.field_name = field_name;
    }
    if let Some(field_type) = payload.field_type {
        let parsed = FieldType::parse(&field_type)
            .ok_or_else(|| AppError::Validation(format!("Unknown field type: {}", field_type)))?;
        field.field_type = parsed.as_str().to_string();
    }
    if let Some(is_required) = payload.is_required { field.is_required = is_required; }
    if let Some(order_index) = payload.order_index { field.order_index = order_index; }
    if let Some(choices) = payload.choices { field.choices = choices; }
    if let Some(placeholder) = payload.placeholder { field.placeholder = placeholder; }
    if let Some(help_text) = payload.help_text { field.help_text = help_text; }
    if let Some(flag) = payload.is_participant_name { field.is_participant_name = flag; }
    if let Some(flag) = payload.is_participant_email { field.is_participant_email = flag; }
    if let Some(flag) = payload.is_participant_phone { field.is_participant_phone = flag; }

    let updated = state.field_repo.update(&field).await?;
    info!("Field updated: {} on event {}", updated.id, slug);
    Ok(Json(updated))
}

pub async fn delete_field(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((slug, field_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_owned_event(&state, &slug, &user.id).await?;
    state.field_repo.delete(&event.id, &field_id).await?;
    info!("Field deleted: {} on event {}", field_id, slug);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
