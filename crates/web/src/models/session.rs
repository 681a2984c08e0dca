//! Session-related types.
//!
//! The session stores the logged-in user's id, which every request resolves
//! back into a [`User`](super::User) through the user repository, and the
//! form anti-forgery token.

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user's id.
    pub const USER_ID: &str = "user_id";

    /// Key for the anti-forgery token rendered into forms.
    pub const CSRF_TOKEN: &str = "csrf_token";
}
