mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use std::collections::HashSet;
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Publishes an event with a name field (identity: name), an email field
/// (identity: email) and returns (auth, slug, name input, email input).
async fn setup_standard_event(app: &TestApp) -> (AuthHeaders, String, String, String) {
    app.signup("orga", "secret-pass").await;
    let auth = app.login("orga", "secret-pass").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Conference",
                "start_date": "2026-09-01", "end_date": "2026-09-02",
                "start_time": "09:00:00", "end_time": "18:00:00",
                "location": "Berlin",
                "is_published": true
            }).to_string())).unwrap()
    ).await.unwrap();
    let slug = parse_body(res).await["slug"].as_str().unwrap().to_string();

    let name_field = add_field(app, &auth, &slug, json!({
        "field_name": "Full Name", "field_type": "text",
        "is_participant_name": true, "order_index": 0
    })).await;
    let email_field = add_field(app, &auth, &slug, json!({
        "field_name": "Email", "field_type": "email",
        "is_participant_email": true, "order_index": 1
    })).await;

    let name_input = format!("field_{}", name_field["id"].as_str().unwrap());
    let email_input = format!("field_{}", email_field["id"].as_str().unwrap());
    (auth, slug, name_input, email_input)
}

async fn add_field(app: &TestApp, auth: &AuthHeaders, slug: &str, payload: Value) -> Value {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/fields", slug))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

async fn submit(app: &TestApp, slug: &str, answers: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/register", slug))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"answers": answers}).to_string())).unwrap()
    ).await.unwrap()
}

async fn list_registrations(app: &TestApp, auth: &AuthHeaders, slug: &str, query: &str) -> Value {
    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/events/{}/registrations{}", slug, query))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

#[tokio::test]
async fn test_submission_caches_identity_and_starts_pending() {
    let app = TestApp::new().await;
    let (_, slug, name_input, email_input) = setup_standard_event(&app).await;

    let res = submit(&app, &slug, json!({
        name_input: "Ada Lovelace",
        email_input: "ada@example.com"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let registration = parse_body(res).await;

    assert_eq!(registration["participant_name"], "Ada Lovelace");
    assert_eq!(registration["participant_email"], "ada@example.com");
    assert_eq!(registration["status"], "pending");
    assert!(registration["attended_at"].is_null());
    assert!(!registration["token"].as_str().unwrap().is_empty());
    assert!(!registration["qr_code_png"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_required_field_missing_creates_nothing() {
    let app = TestApp::new().await;
    let (_, slug, name_input, email_input) = setup_standard_event(&app).await;

    let res = submit(&app, &slug, json!({ name_input: "Ada Lovelace" })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = parse_body(res).await;
    assert!(body["field_errors"][&email_input][0].as_str().unwrap().contains("required"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_all_field_errors_reported_at_once() {
    let app = TestApp::new().await;
    let (_, slug, name_input, email_input) = setup_standard_event(&app).await;

    let res = submit(&app, &slug, json!({
        name_input.clone(): "",
        email_input.clone(): "not-an-email"
    })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = parse_body(res).await;

    let errors = body["field_errors"].as_object().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains_key(&name_input));
    assert!(errors.contains_key(&email_input));
}

#[tokio::test]
async fn test_zero_field_event_accepts_empty_submission() {
    let app = TestApp::new().await;
    app.signup("orga", "secret-pass").await;
    let auth = app.login("orga", "secret-pass").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Walk In",
                "start_date": "2026-09-01", "end_date": "2026-09-01",
                "start_time": "09:00:00", "end_time": "17:00:00",
                "location": "Park",
                "is_published": true
            }).to_string())).unwrap()
    ).await.unwrap();
    let slug = parse_body(res).await["slug"].as_str().unwrap().to_string();

    let res = submit(&app, &slug, json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let registration = parse_body(res).await;
    assert_eq!(registration["participant_name"], "");
    assert_eq!(registration["status"], "pending");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM answers")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_typed_fields_must_parse() {
    let app = TestApp::new().await;
    let (auth, slug, name_input, email_input) = setup_standard_event(&app).await;

    let number_field = add_field(&app, &auth, &slug, json!({
        "field_name": "Guests", "field_type": "number", "order_index": 2
    })).await;
    let date_field = add_field(&app, &auth, &slug, json!({
        "field_name": "Arrival", "field_type": "date", "order_index": 3
    })).await;
    let guests_input = format!("field_{}", number_field["id"].as_str().unwrap());
    let arrival_input = format!("field_{}", date_field["id"].as_str().unwrap());

    let res = submit(&app, &slug, json!({
        name_input.clone(): "Ada",
        email_input.clone(): "ada@example.com",
        guests_input.clone(): "two",
        arrival_input.clone(): "01.09.2026"
    })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let errors = parse_body(res).await["field_errors"].as_object().unwrap().clone();
    assert_eq!(errors.len(), 2);

    let res = submit(&app, &slug, json!({
        name_input: "Ada",
        email_input: "ada@example.com",
        guests_input: 2,
        arrival_input: "2026-09-01"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_one_answer_per_supplied_field() {
    let app = TestApp::new().await;
    let (auth, slug, name_input, email_input) = setup_standard_event(&app).await;

    let note_field = add_field(&app, &auth, &slug, json!({
        "field_name": "Note", "field_type": "textarea", "is_required": false, "order_index": 2
    })).await;
    let note_input = format!("field_{}", note_field["id"].as_str().unwrap());

    // Optional field left empty: no answer row for it.
    let res = submit(&app, &slug, json!({
        name_input: "Ada",
        email_input: "ada@example.com",
        note_input: ""
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let registration = parse_body(res).await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM answers WHERE registration_id = ?")
        .bind(registration["id"].as_str().unwrap())
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_unknown_answer_keys_are_ignored() {
    let app = TestApp::new().await;
    let (_, slug, name_input, email_input) = setup_standard_event(&app).await;

    let res = submit(&app, &slug, json!({
        name_input: "Ada",
        email_input: "ada@example.com",
        "field_does_not_exist": "whatever"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM answers")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_tokens_unique_across_registrations() {
    let app = TestApp::new().await;
    let (_, slug, name_input, email_input) = setup_standard_event(&app).await;

    let mut tokens = HashSet::new();
    for i in 0..10 {
        let res = submit(&app, &slug, json!({
            name_input.clone(): format!("Guest {}", i),
            email_input.clone(): format!("guest{}@example.com", i)
        })).await;
        assert_eq!(res.status(), StatusCode::OK);
        let registration = parse_body(res).await;
        tokens.insert(registration["token"].as_str().unwrap().to_string());
    }
    assert_eq!(tokens.len(), 10);
}

#[tokio::test]
async fn test_checkbox_round_trips_through_export() {
    let app = TestApp::new().await;
    let (auth, slug, name_input, email_input) = setup_standard_event(&app).await;

    let interests_field = add_field(&app, &auth, &slug, json!({
        "field_name": "Interests", "field_type": "checkbox",
        "choices": "AI\nWeb\nCloud", "order_index": 2
    })).await;
    let interests_input = format!("field_{}", interests_field["id"].as_str().unwrap());

    let res = submit(&app, &slug, json!({
        name_input: "Ada",
        email_input: "ada@example.com",
        interests_input: ["AI", "Cloud"]
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/events/{}/registrations/export", slug))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let table = parse_body(res).await;

    let columns: Vec<&str> = table["columns"].as_array().unwrap()
        .iter().map(|c| c.as_str().unwrap()).collect();
    assert_eq!(columns, vec!["Name", "Email", "Phone", "Status", "Registered At", "Attended At", "Full Name", "Email", "Interests"]);

    let row = table["rows"][0].as_array().unwrap();
    assert_eq!(row[0], "Ada");
    assert_eq!(row[8], "AI, Cloud");
}

#[tokio::test]
async fn test_checkbox_selection_outside_choices_rejected() {
    let app = TestApp::new().await;
    let (auth, slug, name_input, email_input) = setup_standard_event(&app).await;

    let interests_field = add_field(&app, &auth, &slug, json!({
        "field_name": "Interests", "field_type": "checkbox",
        "choices": "AI\nWeb\nCloud", "order_index": 2
    })).await;
    let interests_input = format!("field_{}", interests_field["id"].as_str().unwrap());

    let res = submit(&app, &slug, json!({
        name_input: "Ada",
        email_input: "ada@example.com",
        interests_input: ["AI", "Gardening"]
    })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_confirmation_job_queued_only_with_email() {
    let app = TestApp::new().await;
    let (_, slug, name_input, email_input) = setup_standard_event(&app).await;

    let res = submit(&app, &slug, json!({
        name_input: "Ada",
        email_input: "ada@example.com"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let jobs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE job_type = 'CONFIRMATION'")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(jobs, 1);
}

#[tokio::test]
async fn test_list_search_and_cancel() {
    let app = TestApp::new().await;
    let (auth, slug, name_input, email_input) = setup_standard_event(&app).await;

    for (name, email) in [("Ada Lovelace", "ada@example.com"), ("Grace Hopper", "grace@example.com")] {
        let res = submit(&app, &slug, json!({
            name_input.clone(): name,
            email_input.clone(): email
        })).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let all = list_registrations(&app, &auth, &slug, "").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let hits = list_registrations(&app, &auth, &slug, "?search=ada").await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["participant_name"], "Ada Lovelace");

    let registration_id = hits[0]["id"].as_str().unwrap().to_string();
    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/registrations/{}/cancel", registration_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "cancelled");

    let cancelled = list_registrations(&app, &auth, &slug, "?status=cancelled").await;
    assert_eq!(cancelled.as_array().unwrap().len(), 1);
    let pending = list_registrations(&app, &auth, &slug, "?status=pending").await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["participant_name"], "Grace Hopper");
}

#[tokio::test]
async fn test_multiple_name_fields_joined_in_schema_order() {
    let app = TestApp::new().await;
    app.signup("orga", "secret-pass").await;
    let auth = app.login("orga", "secret-pass").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Split Name Event",
                "start_date": "2026-09-01", "end_date": "2026-09-01",
                "start_time": "09:00:00", "end_time": "17:00:00",
                "location": "Berlin",
                "is_published": true
            }).to_string())).unwrap()
    ).await.unwrap();
    let slug = parse_body(res).await["slug"].as_str().unwrap().to_string();

    // Created out of order on purpose; order_index decides.
    let last = add_field(&app, &auth, &slug, json!({
        "field_name": "Last Name", "field_type": "text",
        "is_participant_name": true, "order_index": 2
    })).await;
    let first = add_field(&app, &auth, &slug, json!({
        "field_name": "First Name", "field_type": "text",
        "is_participant_name": true, "order_index": 1
    })).await;

    let res = submit(&app, &slug, json!({
        format!("field_{}", first["id"].as_str().unwrap()): "Ada",
        format!("field_{}", last["id"].as_str().unwrap()): "Lovelace"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let registration = parse_body(res).await;
    assert_eq!(registration["participant_name"], "Ada Lovelace");
}
