//! Authentication route handlers.
//!
//! Handles login, registration and logout with locally stored accounts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{LoginForm, RegisterForm};
use crate::middleware::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
use crate::models::User;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Shown when the email has no account.
pub const UNKNOWN_EMAIL: &str = "That email does not exist, please try again.";

/// Shown when the password does not match.
pub const WRONG_PASSWORD: &str = "Password incorrect, please try again.";

/// Shown when registering an email that already has an account.
pub const ALREADY_REGISTERED: &str = "You've already signed up with that email, log in instead.";

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<User>,
    pub email: String,
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<User>,
    pub email: String,
    pub name: String,
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    LoginTemplate {
        current_user,
        email: String::new(),
        error: None,
    }
}

/// Handle login form submission.
///
/// On success the session is bound to the user and the browser is sent to the
/// cafe list. On failure the session is left untouched.
#[instrument(skip(state, session, current_user, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.pool(), state.hasher());

    let error = match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            tracing::info!(user_id = %user.id, "User logged in");
            return Ok(Redirect::to("/").into_response());
        }
        Err(AuthError::UserNotFound) => UNKNOWN_EMAIL,
        Err(AuthError::InvalidCredentials) => WRONG_PASSWORD,
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Login failed");
    Ok(LoginTemplate {
        current_user,
        email: form.email,
        error: Some(error.to_string()),
    }
    .into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    RegisterTemplate {
        current_user,
        email: String::new(),
        name: String::new(),
        error: None,
    }
}

/// Handle registration form submission.
///
/// A new account is logged in immediately. An email that is already taken
/// sends the visitor to the login form instead.
#[instrument(skip(state, session, current_user, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.pool(), state.hasher());

    let error = match auth.register(&form.email, &form.password, &form.name).await {
        Ok(user) => {
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            return Ok(Redirect::to("/").into_response());
        }
        Err(AuthError::UserAlreadyExists) => {
            return Ok(LoginTemplate {
                current_user,
                email: form.email,
                error: Some(ALREADY_REGISTERED.to_string()),
            }
            .into_response());
        }
        Err(AuthError::InvalidEmail(_)) => "Invalid email address.".to_string(),
        Err(AuthError::WeakPassword(msg) | AuthError::InvalidName(msg)) => capitalize(&msg),
        Err(e) => return Err(e.into()),
    };

    Ok(RegisterTemplate {
        current_user,
        email: form.email,
        name: form.name,
        error: Some(error),
    }
    .into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// Log out and return to the cafe list.
#[instrument(skip(session, user), fields(user_id = %user.id))]
pub async fn logout(RequireAuth(user): RequireAuth, session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    tracing::info!("User logged out");
    Ok(Redirect::to("/"))
}

/// Sentence-case a service message for display.
fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(
            capitalize("password must be at least 8 characters"),
            "Password must be at least 8 characters."
        );
        assert_eq!(capitalize(""), "");
    }
}
