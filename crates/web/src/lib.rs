//! Cafe listing web application library.
//!
//! The binary in `main.rs` only wires configuration, logging and the
//! listener; everything else lives here so the router can be driven from
//! tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;
