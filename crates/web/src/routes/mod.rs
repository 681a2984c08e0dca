//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Cafe list
//! GET  /cafe/{id}        - Cafe detail (404 page for unknown ids)
//! GET  /add              - Add-cafe form (requires auth)
//! POST /add              - Add-cafe action (requires auth)
//!
//! # Auth
//! GET  /login            - Login page
//! POST /login            - Login action
//! GET  /register         - Register page
//! POST /register         - Register action
//! GET  /logout           - Logout (requires auth)
//!
//! # Operations
//! GET  /health           - Liveness
//! GET  /health/ready     - Readiness (database ping)
//! GET  /static/*         - Stylesheet and other assets
//! ```

pub mod auth;
pub mod cafes;
pub mod health;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{create_session_layer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Directory served under `/static`, independent of the working directory.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the cafe routes router.
pub fn cafe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cafes::index))
        .route("/cafe/{id}", get(cafes::show))
        .route("/add", get(cafes::add_page).post(cafes::add))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(cafe_routes()).merge(auth_routes())
}

/// Build the complete application: routes, sessions and the middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.pool(), state.config());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(cafes::fallback)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
