//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (database)
//!
//! # Checkout
//! GET  /checkout                      - Checkout page
//! POST /checkout                      - Submit order (rate limited)
//! GET  /checkout/payment              - Payment panel fragment (HTMX, input/toggle)
//! GET  /checkout/payment/sync         - Payment panel fragment (HTMX, store sync; 204 if unchanged)
//! GET  /checkout/complete/{order_id}  - Order confirmation
//! ```

pub mod checkout;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, checkout_rate_limiter};
use crate::state::AppState;

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    let fragments = Router::new()
        .route("/payment", get(checkout::payment_fragment))
        .route("/payment/sync", get(checkout::payment_sync))
        .layer(api_rate_limiter());

    Router::new()
        .route(
            "/",
            get(checkout::show).merge(post(checkout::submit).layer(checkout_rate_limiter())),
        )
        .route("/complete/{order_id}", get(checkout::complete))
        .merge(fragments)
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/checkout", checkout_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
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
