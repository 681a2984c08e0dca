//! Session-bound anti-forgery tokens for state-changing forms.
//!
//! One random token is kept per session and rendered into forms as a hidden
//! field. A submission is accepted only if it echoes the token of the session
//! it arrives with. Logging out flushes the session and with it the token.

use rand::Rng;
use rand::distr::Alphanumeric;
use tower_sessions::Session;

use crate::models::session::keys;

/// Name of the hidden form field carrying the token.
pub const CSRF_FIELD: &str = "csrf_token";

/// Shown when a submission carries no token at all.
pub const CSRF_MISSING: &str = "The CSRF token is missing.";

/// Shown when a submission carries a token that does not match the session.
pub const CSRF_INVALID: &str = "The CSRF token is invalid.";

const TOKEN_LENGTH: usize = 32;

/// Generate a random alphanumeric token.
fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// The session's token, creating and storing one if the session has none.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn issue_token(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(token) = session.get::<String>(keys::CSRF_TOKEN).await? {
        return Ok(token);
    }

    let token = generate_token();
    session.insert(keys::CSRF_TOKEN, &token).await?;
    Ok(token)
}

/// Check a submitted token against the session's.
///
/// Returns `Ok(None)` when the token matches, or the message to show when it
/// is missing or wrong.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn check_token(
    session: &Session,
    submitted: &str,
) -> Result<Option<&'static str>, tower_sessions::session::Error> {
    if submitted.is_empty() {
        return Ok(Some(CSRF_MISSING));
    }

    let expected: Option<String> = session.get(keys::CSRF_TOKEN).await?;
    if expected.as_deref() == Some(submitted) {
        Ok(None)
    } else {
        Ok(Some(CSRF_INVALID))
    }
}
