//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions with a signed cookie.

use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use sqlx::SqlitePool;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cafe_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `SQLite` store.
///
/// The session table must already exist (`cafe-cli migrate`).
///
/// # Arguments
///
/// * `pool` - `SQLite` connection pool
/// * `config` - Application configuration (for session secret and base URL)
#[must_use]
pub fn create_session_layer(
    pool: &SqlitePool,
    config: &AppConfig,
) -> SessionManagerLayer<SqliteStore, SignedCookie> {
    let store = SqliteStore::new(pool.clone());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.uses_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config))
}

/// Derive the 64-byte cookie signing key from the session secret.
fn signing_key(config: &AppConfig) -> Key {
    let digest = Sha512::digest(config.session_secret.expose_secret().as_bytes());
    // SHA-512 output is exactly the 64 bytes `Key::from` requires.
    Key::from(digest.as_slice())
}
