//! Centralized server configuration.
//!
//! Loaded via the `config` crate from an optional file named by
//! `CIRIS_CONFIG`, then from environment variables (`__` separates nested
//! keys, e.g. `FIREBASE__API_KEY`).

use ciris_firebase::FirebaseConfig;
use ciris_session::guard::DEFAULT_LOGIN_PATH;
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::pages::PAGES;

/// Environment variable naming an optional configuration file.
pub const CONFIG_FILE_VAR: &str = "CIRIS_CONFIG";

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Which identity backend to use.
    #[serde(default)]
    pub backend: Backend,

    /// Firebase project settings. Required when `backend` is `firebase`.
    #[serde(default)]
    pub firebase: Option<FirebaseConfig>,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Identity and profile backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local accounts and profiles.
    #[default]
    Memory,
    /// Identity Toolkit and Firestore.
    Firebase,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Where unauthenticated visitors are sent.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `CIRIS_CONFIG` (if set) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a value is invalid, or
    /// the login path collides with another route.
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_FILE_VAR).ok();
        Self::load(file.as_deref().map(Path::new), None)
    }

    /// Loads configuration from an optional file, then from `env` or, when
    /// `None`, the process environment.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn load(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config: Self = builder
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let login_path = self.session.login_path.as_str();
        if !login_path.starts_with('/') {
            return Err(ConfigError::Message(format!(
                "session.login_path must start with '/': {login_path}"
            )));
        }
        if login_path.starts_with("/auth/") || PAGES.iter().any(|page| page.path == login_path) {
            return Err(ConfigError::Message(format!(
                "session.login_path collides with an existing route: {login_path}"
            )));
        }
        if self.backend == Backend::Firebase && self.firebase.is_none() {
            return Err(ConfigError::Message(
                "backend 'firebase' requires firebase.api_key and firebase.project_id".to_string(),
            ));
        }
        Ok(())
    }
}
