//! Errors raised while setting up the Firebase backends.
//!
//! Request-time failures are reported through the session crate's
//! `ProviderError` and `ProfileError`.

use std::fmt;

/// Backend construction errors.
#[derive(Debug)]
pub enum FirebaseError {
    /// The HTTP client could not be built.
    HttpClient { details: String },
}

impl fmt::Display for FirebaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpClient { details } => write!(f, "failed to build HTTP client: {details}"),
        }
    }
}

impl std::error::Error for FirebaseError {}
