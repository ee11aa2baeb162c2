//! Database operations for storefront `PostgreSQL`.
//!
//! ## Tables
//!
//! - `storefront.checkout_order` - Orders placed through checkout
//! - `storefront.payment_gateway` - Payment methods offered at checkout
//! - `tower_sessions.session` - Tower-sessions storage
//! - `settings.option` - Shared settings, written by the admin binary (read-only here)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p zipgate-cli -- migrate storefront
//! ```
//!
//! The admin migrations must have run against the same database, since they
//! own `settings.option`.

pub mod gateways;
pub mod orders;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use gateways::GatewayRepository;
pub use orders::OrderRepository;
pub use settings::load_allow_list;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
