//! Integration tests for zipgate.
//!
//! # Running Tests
//!
//! ```bash
//! # Scenarios that need no services
//! cargo test -p zipgate-integration-tests
//!
//! # Database and HTTP tests (migrated database, both servers running)
//! cargo test -p zipgate-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `checkout_scenarios` - Decision, validation and payment panel behaviour
//! - `allow_list_settings` - Sanitization and the shared settings row
//! - `order_records` - The delivery ZIP code written to orders
//! - `checkout_http` - End-to-end flow against running servers

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin panel (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Admin access token used by the HTTP tests.
#[must_use]
pub fn admin_access_token() -> Option<SecretString> {
    std::env::var("ADMIN_ACCESS_TOKEN").ok().map(SecretString::from)
}

/// Connect to the test database.
///
/// # Errors
///
/// Returns an error if no database URL is set or the connection fails.
pub async fn connect_pool() -> Result<PgPool, sqlx::Error> {
    let url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| sqlx::Error::Configuration("ADMIN_DATABASE_URL is not set".into()))?;

    PgPool::connect(url.expose_secret()).await
}

/// HTTP client with a cookie store that does not follow redirects.
///
/// # Errors
///
/// Returns an error if the client cannot be built.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}
