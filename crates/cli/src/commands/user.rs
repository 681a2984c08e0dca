//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! cafe-cli user create -e admin@example.com -n "Admin" -p "long-password"
//! ```
//!
//! # Environment Variables
//!
//! - `CAFE_DATABASE_URL` - `SQLite` connection string
//! - `CAFE_PASSWORD_ROUNDS` - PBKDF2 iteration count for the new hash
//! - `CAFE_USER_PASSWORD` - Password, if not passed with `-p`

use cafe_core::UserId;
use cafe_web::config::{self, ConfigError};
use cafe_web::db;
use cafe_web::services::{AuthError, AuthService, PasswordHasher};
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserCommandError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    /// Registration was rejected.
    #[error(transparent)]
    Auth(AuthError),
}

/// Create a new user account.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create(email: &str, name: &str, password: &str) -> Result<UserId, UserCommandError> {
    let database_url = config::database_url_from_env();
    let hasher = PasswordHasher::new(config::password_rounds_from_env()?);

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating user: {}", email);

    let user = AuthService::new(&pool, hasher)
        .register(email, password, name)
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => UserCommandError::UserExists(email.to_owned()),
            other => UserCommandError::Auth(other),
        })?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id)
}
