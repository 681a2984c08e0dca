//! Core types for the cafe listing site.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod amenity;
pub mod email;
pub mod id;

pub use amenity::Amenity;
pub use email::{Email, EmailError};
pub use id::*;
