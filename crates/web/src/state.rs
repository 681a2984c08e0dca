//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::services::PasswordHasher;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: SqlitePool,
    hasher: PasswordHasher,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `pool` - `SQLite` connection pool
    #[must_use]
    pub fn new(config: AppConfig, pool: SqlitePool) -> Self {
        let hasher = PasswordHasher::new(config.password_rounds);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                hasher,
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Password hasher configured with the deployment's round count.
    #[must_use]
    pub fn hasher(&self) -> PasswordHasher {
        self.inner.hasher
    }
}
