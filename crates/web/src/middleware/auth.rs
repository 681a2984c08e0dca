//! Authentication extractors.
//!
//! The session holds only a [`UserId`]; these extractors resolve it into a
//! [`User`] on every request.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use cafe_core::UserId;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::{User, session_keys};
use crate::state::AppState;

/// Where anonymous visitors are sent when a page needs a login.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a logged-in user.
///
/// If the session is anonymous, the request is redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Error returned when authentication is required but no user is logged in.
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// Resolving the session failed.
    Failed(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Failed(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        match resolve_user(parts, &state).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => Err(AuthRejection::RedirectToLogin),
            Err(err) => Err(AuthRejection::Failed(err)),
        }
    }
}

/// Extractor that optionally gets the logged-in user.
///
/// Unlike `RequireAuth`, this does not reject anonymous requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(user): OptionalAuth,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        resolve_user(parts, &state).await.map(Self)
    }
}

/// Look up the user whose id is stored in the session.
///
/// An id that no longer matches a user is removed from the session and the
/// request is treated as anonymous.
async fn resolve_user(parts: &Parts, state: &AppState) -> Result<Option<User>, AppError> {
    let Some(session) = parts.extensions.get::<Session>() else {
        return Ok(None);
    };

    let Some(user_id) = session.get::<UserId>(session_keys::USER_ID).await? else {
        return Ok(None);
    };

    let user = UserRepository::new(state.pool()).get_by_id(user_id).await?;
    if user.is_none() {
        tracing::warn!(user_id = %user_id, "Session refers to unknown user, clearing");
        session.remove::<UserId>(session_keys::USER_ID).await?;
    }

    Ok(user)
}

/// Log a user in on this session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::USER_ID, user.id).await
}

/// Log out: drop all session data and delete the stored session.
///
/// # Errors
///
/// Returns an error if the session store cannot be updated.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
