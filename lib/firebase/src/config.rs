//! Firebase project configuration.

use serde::Deserialize;

/// Connection settings for a Firebase project.
///
/// Only the API key and project id are required.
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    /// Web API key of the project.
    api_key: String,
    /// Project id, used in Firestore document paths.
    project_id: String,
    /// Identity Toolkit base URL.
    /// Default: "https://identitytoolkit.googleapis.com/v1"
    #[serde(default = "default_auth_base_url")]
    auth_base_url: String,
    /// Firestore REST base URL.
    /// Default: "https://firestore.googleapis.com/v1"
    #[serde(default = "default_firestore_base_url")]
    firestore_base_url: String,
    /// Collection holding one profile document per identity.
    /// Default: "users"
    #[serde(default = "default_profile_collection")]
    profile_collection: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    request_timeout_seconds: u64,
}

fn default_auth_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_firestore_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_profile_collection() -> String {
    "users".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    10
}

impl FirebaseConfig {
    /// Creates a configuration for the hosted services.
    #[must_use]
    pub fn new(api_key: String, project_id: String) -> Self {
        Self {
            api_key,
            project_id,
            auth_base_url: default_auth_base_url(),
            firestore_base_url: default_firestore_base_url(),
            profile_collection: default_profile_collection(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }

    /// Points both clients at other hosts, such as the local emulators.
    #[must_use]
    pub fn with_base_urls(mut self, auth_base_url: String, firestore_base_url: String) -> Self {
        self.auth_base_url = auth_base_url;
        self.firestore_base_url = firestore_base_url;
        self
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Returns the Identity Toolkit base URL without a trailing slash.
    #[must_use]
    pub fn auth_base_url(&self) -> &str {
        self.auth_base_url.trim_end_matches('/')
    }

    /// Returns the Firestore base URL without a trailing slash.
    #[must_use]
    pub fn firestore_base_url(&self) -> &str {
        self.firestore_base_url.trim_end_matches('/')
    }

    #[must_use]
    pub fn profile_collection(&self) -> &str {
        &self.profile_collection
    }

    #[must_use]
    pub fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }
}
