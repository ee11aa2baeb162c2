//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//! GET  /                       - Redirect to the ZIP code settings
//!
//! # Auth (shared access token)
//! GET  /auth/login             - Login page
//! POST /auth/login             - Check the access token
//! POST /auth/logout            - Logout
//!
//! # Settings
//! GET  /settings/zipcodes      - Allow-list settings page
//! POST /settings/zipcodes      - Sanitize and save the allow-list
//! ```

pub mod auth;
pub mod settings;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::get,
};

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/", get(|| async { Redirect::to(settings::ZIPCODES_PATH) }))
        .merge(auth::router())
        .merge(settings::router())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
