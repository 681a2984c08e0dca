//! Integration tests for listing, viewing and adding cafes.
//!
//! Run with: cargo test -p cafe-integration-tests

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use cafe_integration_tests::{TestApp, cafe_fields, csrf_token_in};

async fn logged_in_app() -> TestApp {
    let mut app = TestApp::spawn().await;
    app.register("a@b.com", "pass1234", "A")
        .await
        .assert_redirect_to("/");
    app
}

fn with_field<'a>(
    mut fields: Vec<(&'a str, &'a str)>,
    name: &str,
    value: &'a str,
) -> Vec<(&'a str, &'a str)> {
    for field in &mut fields {
        if field.0 == name {
            field.1 = value;
        }
    }
    fields
}

// ============================================================================
// Listing & detail
// ============================================================================

#[tokio::test]
async fn test_empty_list() {
    let mut app = TestApp::spawn().await;

    let resp = app.get("/").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("No cafes yet."));
}

#[tokio::test]
async fn test_missing_cafe_is_404_page() {
    let mut app = TestApp::spawn().await;

    let resp = app.get("/cafe/999").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(resp.body.contains("Cafe not found"));
    assert!(resp.body.contains("There is no cafe with that id."));
}

#[tokio::test]
async fn test_unknown_path_is_404_page() {
    let mut app = TestApp::spawn().await;

    let resp = app.get("/no/such/page").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(resp.body.contains("There is no page at this address."));
}

// ============================================================================
// Adding cafes
// ============================================================================

#[tokio::test]
async fn test_add_requires_login() {
    let mut app = TestApp::spawn().await;

    app.get("/add").await.assert_redirect_to("/login");
    app.post_form("/add", &cafe_fields("Sneaky"))
        .await
        .assert_redirect_to("/login");
    assert_eq!(app.count("cafe").await, 0);
}

#[tokio::test]
async fn test_add_form_renders_for_logged_in_user() {
    let mut app = logged_in_app().await;

    let resp = app.get("/add").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("name=\"can_take_calls\""));
    assert!(resp.body.contains("<option value=\"NO\" selected>"));
}

#[tokio::test]
async fn test_add_valid_cafe_appears_in_list_and_detail() {
    let mut app = logged_in_app().await;

    app.add_cafe(&cafe_fields("Lighthaus"))
        .await
        .assert_redirect_to("/");
    assert_eq!(app.count("cafe").await, 1);

    let list = app.get("/").await;
    assert!(list.body.contains("Lighthaus"));
    assert!(list.body.contains("20-30"));

    let id: i64 = sqlx::query_scalar("SELECT id FROM cafe WHERE name = 'Lighthaus'")
        .fetch_one(app.pool())
        .await
        .unwrap();
    let detail = app.get(&format!("/cafe/{id}")).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Lighthaus"));
    assert!(detail.body.contains("https://images.example.com/cafe.jpg"));
}

#[tokio::test]
async fn test_amenity_flags_follow_submission() {
    let mut app = logged_in_app().await;

    let fields = with_field(cafe_fields("Calls OK"), "can_take_calls", "YES");
    let fields = with_field(fields, "has_toilet", "NO");
    app.add_cafe(&fields).await.assert_redirect_to("/");

    let fields = with_field(cafe_fields("Quiet Please"), "can_take_calls", "NO");
    app.add_cafe(&fields).await.assert_redirect_to("/");

    let rows: Vec<(String, bool, bool, bool, bool)> = sqlx::query_as(
        "SELECT name, has_sockets, has_toilet, has_wifi, can_take_calls FROM cafe ORDER BY id",
    )
    .fetch_all(app.pool())
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![
            ("Calls OK".to_string(), true, false, true, true),
            ("Quiet Please".to_string(), true, false, true, false),
        ]
    );
}

#[tokio::test]
async fn test_invalid_submission_redisplays_form_and_inserts_nothing() {
    let mut app = logged_in_app().await;

    let fields = with_field(cafe_fields("Bad Links"), "map_url", "not a url");
    let fields = with_field(fields, "location", "");
    let resp = app.add_cafe(&fields).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Invalid URL."));
    assert!(resp.body.contains("This field is required."));
    // Submitted values survive the round trip.
    assert!(resp.body.contains("value=\"Bad Links\""));
    assert_eq!(app.count("cafe").await, 0);
}

#[tokio::test]
async fn test_duplicate_cafe_name_is_rejected_without_changes() {
    let mut app = logged_in_app().await;

    app.add_cafe(&cafe_fields("Twin"))
        .await
        .assert_redirect_to("/");

    let fields = with_field(cafe_fields("Twin"), "location", "Elsewhere");
    let resp = app.add_cafe(&fields).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("A cafe with that name already exists."));
    assert_eq!(app.count("cafe").await, 1);

    let location: String = sqlx::query_scalar("SELECT location FROM cafe WHERE name = 'Twin'")
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(location, "Peckham");
}

// ============================================================================
// Anti-forgery token
// ============================================================================

#[tokio::test]
async fn test_add_form_carries_csrf_token() {
    let mut app = logged_in_app().await;

    let resp = app.get("/add").await;
    let token = csrf_token_in(&resp.body).unwrap();
    assert_eq!(token.len(), 32);

    // The token is stable for the session.
    assert_eq!(app.csrf_token().await, token);
}

#[tokio::test]
async fn test_add_without_csrf_token_inserts_nothing() {
    let mut app = logged_in_app().await;

    let resp = app.post_form("/add", &cafe_fields("No Token")).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("The CSRF token is missing."));
    assert!(resp.body.contains("value=\"No Token\""));
    assert!(csrf_token_in(&resp.body).is_some());
    assert_eq!(app.count("cafe").await, 0);
}

#[tokio::test]
async fn test_add_with_forged_csrf_token_inserts_nothing() {
    let mut app = logged_in_app().await;
    app.get("/add").await;

    let mut fields = cafe_fields("Forged");
    fields.push(("csrf_token", "not-the-session-token"));
    let resp = app.post_form("/add", &fields).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("The CSRF token is invalid."));
    assert_eq!(app.count("cafe").await, 0);
}

#[tokio::test]
async fn test_csrf_token_is_bound_to_its_session() {
    let mut app = logged_in_app().await;
    let other_token = app.csrf_token().await;

    app.clear_cookies();
    app.register("c@d.com", "pass1234", "C")
        .await
        .assert_redirect_to("/");

    let mut fields = cafe_fields("Cross Session");
    fields.push(("csrf_token", &other_token));
    let resp = app.post_form("/add", &fields).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("The CSRF token is invalid."));
    assert_eq!(app.count("cafe").await, 0);
}

// ============================================================================
// Operations
// ============================================================================

#[tokio::test]
async fn test_stylesheet_is_served() {
    let mut app = TestApp::spawn().await;

    let resp = app.get("/static/css/main.css").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains(".field-error"));
    assert!(
        resp.headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/css")
    );
}

#[tokio::test]
async fn test_health_endpoints() {
    let mut app = TestApp::spawn().await;

    let live = app.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");

    let ready = app.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let mut app = TestApp::spawn().await;

    let resp = app.get("/").await;
    assert!(resp.headers.contains_key("x-request-id"));
    assert_eq!(resp.headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(resp.headers.get("x-content-type-options").unwrap(), "nosniff");
}
