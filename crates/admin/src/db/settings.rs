//! Key/value settings and the allow-list stored in them.

use sqlx::PgPool;
use zipgate_core::{ALLOWED_ZIPCODES_KEY, AllowList};

use super::RepositoryError;

/// Read a setting. Returns `None` if the key has never been written.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_option(pool: &PgPool, key: &str) -> Result<Option<String>, RepositoryError> {
    let value = sqlx::query_scalar("SELECT value FROM settings.option WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value)
}

/// Insert or replace a setting.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the upsert fails.
pub async fn set_option(pool: &PgPool, key: &str, value: &str) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO settings.option (key, value, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (key) DO UPDATE
        SET value = EXCLUDED.value, updated_at = NOW()
        ",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load the stored allow-list. A missing row is an empty list.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_allowed_zipcodes(pool: &PgPool) -> Result<AllowList, RepositoryError> {
    let stored = get_option(pool, ALLOWED_ZIPCODES_KEY).await?;
    Ok(stored
        .as_deref()
        .map_or_else(AllowList::empty, AllowList::from_stored))
}

/// Sanitize raw admin input and persist the result.
///
/// Malformed tokens are dropped silently. Returns the list that was stored.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the write fails.
pub async fn set_allowed_zipcodes(pool: &PgPool, raw: &str) -> Result<AllowList, RepositoryError> {
    let list = AllowList::sanitize(raw);
    set_option(pool, ALLOWED_ZIPCODES_KEY, &list.as_stored()).await?;

    tracing::info!(count = list.len(), "Allowed ZIP codes updated");
    Ok(list)
}
