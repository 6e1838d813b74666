use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{account, auth, checkin, event, field, health, registration};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Accounts & Auth
        .route("/api/v1/accounts", post(account::create_account))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Events
        .route("/api/v1/events", post(event::create_event).get(event::list_events))
        .route("/api/v1/events/{slug}", get(event::get_public_event).put(event::update_event).delete(event::delete_event))
        .route("/api/v1/events/{slug}/stats", get(event::event_stats))

        // Form builder
        .route("/api/v1/events/{slug}/fields", post(field::create_field).get(field::list_fields))
        .route("/api/v1/events/{slug}/fields/{field_id}", axum::routing::put(field::update_field).delete(field::delete_field))

        // Public Registration Flow
        .route("/api/v1/events/{slug}/form", get(registration::get_registration_form))
        .route("/api/v1/events/{slug}/register", post(registration::submit_registration))
        .route("/api/v1/registrations/{id}", get(registration::get_registration_by_token).delete(registration::delete_registration))

        // Participant administration
        .route("/api/v1/events/{slug}/registrations", get(registration::list_registrations))
        .route("/api/v1/events/{slug}/registrations/export", get(registration::export_registrations))
        .route("/api/v1/registrations/{id}/cancel", post(registration::cancel_registration))

        // Check-in
        .route("/api/v1/scan", post(checkin::scan))
        .route("/api/v1/checkin", post(checkin::checkin))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
