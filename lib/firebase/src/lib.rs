//! Firebase backends for the CIRIS session store.
//!
//! - [`IdentityToolkitClient`]: password sign-up and sign-in against the
//!   Identity Toolkit REST API, implementing
//!   [`IdentityProvider`](ciris_session::IdentityProvider)
//! - [`FirestoreProfileStore`]: profile documents in Firestore, implementing
//!   [`ProfileStore`](ciris_session::ProfileStore)
//!
//! Both base URLs come from [`FirebaseConfig`], so the local emulators can
//! stand in for the hosted services.

pub mod config;
pub mod error;
pub mod firestore;
pub mod identity;

#[cfg(test)]
mod stub;

pub use config::FirebaseConfig;
pub use error::FirebaseError;
pub use firestore::FirestoreProfileStore;
pub use identity::{IdTokenSource, IdentityToolkitClient};

use rootcause::Report;
use std::sync::Arc;
use std::time::Duration;

/// A matched identity provider and profile store sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct FirebaseBackend {
    pub identity: Arc<IdentityToolkitClient>,
    pub profiles: Arc<FirestoreProfileStore>,
}

impl FirebaseBackend {
    /// Builds both clients. Profile requests carry the signed-in identity's
    /// id token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn connect(config: &FirebaseConfig) -> Result<Self, Report<FirebaseError>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds()))
            .build()
            .map_err(|e| FirebaseError::HttpClient {
                details: e.to_string(),
            })?;

        let identity = Arc::new(IdentityToolkitClient::with_http(http.clone(), config));
        let profiles = Arc::new(FirestoreProfileStore::with_http(
            http,
            config,
            identity.clone(),
        ));
        Ok(Self { identity, profiles })
    }
}
