//! CIRIS dashboard server.
//!
//! This crate wires the session store into an axum application: it loads
//! configuration, builds the identity backend, exposes the session operations
//! over HTTP, and guards the dashboard pages.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod pages;
