//! Core types shared by the CIRIS session crates.
//!
//! This crate provides the error-handling foundation and the strongly-typed
//! identifiers used by the session store, its backends, and the server.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{IdentityId, ListenerId, ParseIdError};
