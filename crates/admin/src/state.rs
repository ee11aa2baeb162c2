//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::AccessTokenVerifier;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    verifier: AccessTokenVerifier,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The access token verifier is keyed by the session secret.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let verifier = AccessTokenVerifier::new(&config.session_secret, &config.access_token);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                verifier,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Access token verifier used by the login form.
    #[must_use]
    pub fn verifier(&self) -> &AccessTokenVerifier {
        &self.inner.verifier
    }
}
