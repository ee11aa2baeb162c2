//! CLI command implementations.

pub mod migrate;
pub mod zipcodes;

use secrecy::SecretString;

/// Errors shared by the CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] zipgate_admin::db::RepositoryError),
}

/// Read a database URL, falling back to `DATABASE_URL`.
pub fn database_url(key: &'static str) -> Result<SecretString, CommandError> {
    let _ = dotenvy::dotenv();

    std::env::var(key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar(key))
}
