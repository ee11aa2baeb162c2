//! Order repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;
use zipgate_core::PostalCode;

use super::RepositoryError;
use crate::models::{NewOrder, Order};

const ORDER_COLUMNS: &str = r"
    id, email, shipping_name, shipping_address, shipping_city,
    shipping_postcode, payment_method, delivery_zipcode, created_at
";

/// Repository for checkout order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order. `delivery_zipcode` starts unset.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, order: &NewOrder<'_>) -> Result<Order, RepositoryError> {
        let query = format!(
            r"
            INSERT INTO storefront.checkout_order
                (id, email, shipping_name, shipping_address, shipping_city,
                 shipping_postcode, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ORDER_COLUMNS}
            "
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(order.email)
            .bind(order.shipping_name)
            .bind(order.shipping_address)
            .bind(order.shipping_city)
            .bind(order.shipping_postcode)
            .bind(order.payment_method)
            .fetch_one(self.pool)
            .await?;

        Ok(order_from_row(&row)?)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM storefront.checkout_order WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.as_ref().map(order_from_row).transpose()?)
    }

    /// Record the accepted delivery postal code on an order.
    ///
    /// Only writes when the order has no value yet; an existing value is never
    /// replaced. Returns `true` if a value was written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn record_delivery_zipcode(
        &self,
        id: Uuid,
        zipcode: &PostalCode,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.checkout_order
            SET delivery_zipcode = $2
            WHERE id = $1 AND delivery_zipcode IS NULL
            ",
        )
        .bind(id)
        .bind(zipcode)
        .execute(self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM storefront.checkout_order WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        if exists {
            Ok(false)
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

fn order_from_row(row: &PgRow) -> Result<Order, sqlx::Error> {
    Ok(Order {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        shipping_name: row.try_get("shipping_name")?,
        shipping_address: row.try_get("shipping_address")?,
        shipping_city: row.try_get("shipping_city")?,
        shipping_postcode: row.try_get("shipping_postcode")?,
        payment_method: row.try_get("payment_method")?,
        delivery_zipcode: row.try_get("delivery_zipcode")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}
