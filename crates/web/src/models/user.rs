//! User domain types.

use serde::{Deserialize, Serialize};

use cafe_core::{Email, UserId};

/// A site account (domain type).
///
/// The password hash is not part of this type; it is only
/// loaded alongside the user during login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
}
