//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, login and password hashing
//! - `cafes` - Cafe submission

pub mod auth;
pub mod cafes;

pub use auth::{AuthError, AuthService, PasswordHasher};
pub use cafes::{CafeService, DUPLICATE_NAME, SubmitError};
