//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cafe-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CAFE_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://cafes.db`)
//!
//! # Migration Files
//!
//! Schema migrations live in `crates/web/migrations/` and are embedded into
//! the binary. The session table is created by the session store itself.

use cafe_web::{config, db};
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrateCommandError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed.
    #[error(transparent)]
    Migration(#[from] db::MigrationError),
}

/// Apply all pending migrations.
pub async fn run() -> Result<(), MigrateCommandError> {
    let database_url = config::database_url_from_env();

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
