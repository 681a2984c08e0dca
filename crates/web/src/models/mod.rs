//! Domain models for the cafe site.
//!
//! These types represent validated domain objects separate from database row types.

pub mod cafe;
pub mod session;
pub mod user;

pub use cafe::{Cafe, NewCafe};
pub use session::keys as session_keys;
pub use user::User;
