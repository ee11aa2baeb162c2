//! Allow-list management commands.
//!
//! Writes go through the same repository function as the admin settings
//! form, so the stored value is always sanitized.

#![allow(clippy::print_stdout)]

use secrecy::ExposeSecret;
use sqlx::PgPool;
use zipgate_admin::db;
use zipgate_core::AllowList;

use super::{CommandError, database_url};

async fn connect() -> Result<PgPool, CommandError> {
    let url = database_url("ADMIN_DATABASE_URL")?;
    Ok(PgPool::connect(url.expose_secret()).await?)
}

fn describe(list: &AllowList) -> String {
    if list.is_empty() {
        "None (0 total, every ZIP code accepted)".to_string()
    } else {
        format!("{list} ({} total)", list.len())
    }
}

/// Print the stored allow-list.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn show() -> Result<(), CommandError> {
    let pool = connect().await?;
    let list = db::get_allowed_zipcodes(&pool).await?;

    println!("Current allowed ZIP codes: {}", describe(&list));
    Ok(())
}

/// Sanitize `raw` and store it as the allow-list.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the write fails.
pub async fn set(raw: &str) -> Result<(), CommandError> {
    let pool = connect().await?;
    let list = db::set_allowed_zipcodes(&pool, raw).await?;

    println!("Saved allowed ZIP codes: {}", describe(&list));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_empty() {
        assert_eq!(
            describe(&AllowList::empty()),
            "None (0 total, every ZIP code accepted)"
        );
    }

    #[test]
    fn test_describe_sanitized_input() {
        let list = AllowList::sanitize("80902, abc, 809021, 80903");
        assert_eq!(describe(&list), "80902,80903 (2 total)");
    }
}
