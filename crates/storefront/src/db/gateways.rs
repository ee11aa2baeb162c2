//! Payment gateway repository.

use sqlx::PgPool;
use zipgate_core::checkout::PaymentGateway;

use super::RepositoryError;

/// Repository for payment gateway lookups.
pub struct GatewayRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GatewayRepository<'a> {
    /// Create a new gateway repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List enabled gateways in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_enabled(&self) -> Result<Vec<PaymentGateway>, RepositoryError> {
        let rows: Vec<(String, String, Option<String>)> = sqlx::query_as(
            r"
            SELECT id, title, description
            FROM storefront.payment_gateway
            WHERE enabled
            ORDER BY position, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, description)| PaymentGateway {
                id,
                title,
                description,
            })
            .collect())
    }
}
