//! Cafe Core - Shared types library.
//!
//! This crate provides common types used across the cafe listing components:
//! - `web` - The public site (listing, detail, add form, login/register)
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP. Enabling the `sqlite` feature adds `sqlx` encode/decode impls so the
//! types can be bound and fetched directly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and amenity choices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
