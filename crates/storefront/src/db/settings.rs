//! Read access to the shared allow-list setting.

use sqlx::PgPool;
use zipgate_core::{ALLOWED_ZIPCODES_KEY, AllowList};

use super::RepositoryError;

/// Load the current allow-list snapshot.
///
/// A missing row is treated as an empty allow-list (every postal code
/// accepted).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn load_allow_list(pool: &PgPool) -> Result<AllowList, RepositoryError> {
    let stored: Option<String> =
        sqlx::query_scalar("SELECT value FROM settings.option WHERE key = $1")
            .bind(ALLOWED_ZIPCODES_KEY)
            .fetch_optional(pool)
            .await?;

    Ok(stored
        .as_deref()
        .map_or_else(AllowList::empty, AllowList::from_stored))
}
