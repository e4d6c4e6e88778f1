//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! mh-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `MARKETHUB_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection
//!   string

use secrecy::SecretString;
use thiserror::Error;
use tracing::info;

use markethub_api::db;

/// Errors that can occur while running migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Run the embedded migrations against the configured database.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MARKETHUB_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("MARKETHUB_DATABASE_URL"))?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    markethub_api::MIGRATOR.run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
