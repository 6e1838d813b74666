mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Publishes an event with a single name field and registers one
/// participant. Returns (auth, registration token).
async fn setup_registration(app: &TestApp, username: &str) -> (AuthHeaders, String) {
    app.signup(username, "secret-pass").await;
    let auth = app.login(username, "secret-pass").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": format!("Door Event {}", username),
                "start_date": "2026-09-01", "end_date": "2026-09-01",
                "start_time": "09:00:00", "end_time": "17:00:00",
                "location": "Berlin",
                "is_published": true
            }).to_string())).unwrap()
    ).await.unwrap();
    let slug = parse_body(res).await["slug"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/fields", slug))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "field_name": "Full Name", "field_type": "text", "is_participant_name": true
            }).to_string())).unwrap()
    ).await.unwrap();
    let field = parse_body(res).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/register", slug))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"answers": {
                format!("field_{}", field["id"].as_str().unwrap()): "Grace Hopper"
            }}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let token = parse_body(res).await["token"].as_str().unwrap().to_string();

    (auth, token)
}

async fn post_scan(app: &TestApp, auth: &AuthHeaders, path: &str, qr_code: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(path)
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"qr_code": qr_code}).to_string())).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_scan_previews_without_transition() {
    let app = TestApp::new().await;
    let (auth, token) = setup_registration(&app, "orga").await;

    let res = post_scan(&app, &auth, "/api/v1/scan", &token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["participant_name"], "Grace Hopper");
    assert_eq!(body["status"], "pending");
    assert!(body["attended_at"].is_null());

    // Scanning is read-only.
    let res = post_scan(&app, &auth, "/api/v1/scan", &token).await;
    assert_eq!(parse_body(res).await["status"], "pending");
}

#[tokio::test]
async fn test_checkin_transitions_once_then_rejects() {
    let app = TestApp::new().await;
    let (auth, token) = setup_registration(&app, "orga").await;

    let res = post_scan(&app, &auth, "/api/v1/checkin", &token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["success"], true);
    let first_attended_at = body["attended_at"].as_str().unwrap().to_string();

    // A second scan is an error, not a silent re-accept.
    let res = post_scan(&app, &auth, "/api/v1/checkin", &token).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // The original timestamp is untouched.
    let res = post_scan(&app, &auth, "/api/v1/scan", &token).await;
    let body = parse_body(res).await;
    assert_eq!(body["status"], "attended");
    assert_eq!(body["attended_at"].as_str().unwrap(), first_attended_at);
}

#[tokio::test]
async fn test_malformed_token_rejected() {
    let app = TestApp::new().await;
    let (auth, _) = setup_registration(&app, "orga").await;

    let res = post_scan(&app, &auth, "/api/v1/checkin", "not-a-uuid").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["error"], "Invalid QR code format");
}

#[tokio::test]
async fn test_unknown_token_not_found() {
    let app = TestApp::new().await;
    let (auth, _) = setup_registration(&app, "orga").await;

    let res = post_scan(&app, &auth, "/api/v1/checkin", "7d2a3cc0-5f5a-4c11-9a1b-3b7c2f9e8d10").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_foreign_organizer_cannot_checkin() {
    let app = TestApp::new().await;
    let (_, token) = setup_registration(&app, "orga").await;

    app.signup("other", "secret-pass").await;
    let other = app.login("other", "secret-pass").await;

    let res = post_scan(&app, &other, "/api/v1/checkin", &token).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // And the registration stays pending.
    let auth = app.login("orga", "secret-pass").await;
    let res = post_scan(&app, &auth, "/api/v1/scan", &token).await;
    assert_eq!(parse_body(res).await["status"], "pending");
}

#[tokio::test]
async fn test_checkin_requires_auth() {
    let app = TestApp::new().await;
    let (_, token) = setup_registration(&app, "orga").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/checkin")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"qr_code": token}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_concurrent_checkins_succeed_exactly_once() {
    let app = TestApp::new().await;
    let (auth, token) = setup_registration(&app, "orga").await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let router = app.router.clone();
        let access_token = auth.access_token.clone();
        let csrf_token = auth.csrf_token.clone();
        let token = token.clone();

        handles.push(tokio::spawn(async move {
            let res = router.oneshot(
                Request::builder().method("POST").uri("/api/v1/checkin")
                    .header(header::COOKIE, format!("access_token={}", access_token))
                    .header("X-CSRF-Token", &csrf_token)
                    .header("Content-Type", "application/json")
                    .body(Body::from(json!({"qr_code": token}).to_string())).unwrap()
            ).await.unwrap();
            res.status()
        }));
    }

    let mut ok = 0;
    let mut conflict = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(ok, 1, "exactly one scan must win");
    assert_eq!(conflict, 1, "the loser must see AlreadyCheckedIn");
}
