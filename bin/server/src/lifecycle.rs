//! Process bootstrap and teardown.
//!
//! Builds the configured backend, starts the session store (which subscribes
//! to the provider at once), and registers the transition log. Teardown
//! releases the provider subscription.

use ciris_firebase::FirebaseBackend;
use ciris_session::{
    InMemoryIdentityProvider, InMemoryProfileStore, IdentityProvider, ProfileStore, RouteGuard,
    SessionStore, Subscription,
};
use rootcause::Report;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

use crate::config::{Backend, ServerConfig};
use crate::error::BootstrapError;

/// Shared application state.
pub struct AppState {
    /// The process-wide session store.
    pub store: SessionStore,
    /// Gate for protected pages.
    pub guard: RouteGuard,
    transition_log: Mutex<Option<Subscription>>,
}

impl AppState {
    /// Starts the session store over the given backends.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        guard: RouteGuard,
    ) -> Self {
        let store = SessionStore::start(provider, profiles);
        let transition_log = store.subscribe(|state| match state.user() {
            Some(user) => info!(
                state = state.label(),
                identity = %user.id(),
                "session transition"
            ),
            None => info!(state = state.label(), "session transition"),
        });
        Self {
            store,
            guard,
            transition_log: Mutex::new(Some(transition_log)),
        }
    }

    /// Stops the transition log and releases the provider subscription.
    pub async fn shutdown(&self) {
        let transition_log = self
            .transition_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(transition_log) = transition_log {
            info!(listener = %transition_log.id(), "transition log stopped");
        }
        self.store.shutdown().await;
        info!("session layer shut down");
    }
}

/// Builds the identity provider and profile store named by the config.
///
/// # Errors
///
/// Returns an error if the Firebase backend is selected but cannot be built.
pub fn build_backend(
    config: &ServerConfig,
) -> Result<(Arc<dyn IdentityProvider>, Arc<dyn ProfileStore>), Report<BootstrapError>> {
    match (config.backend, config.firebase.as_ref()) {
        (Backend::Memory, _) => {
            info!("using in-memory identity backend");
            let provider: Arc<dyn IdentityProvider> = Arc::new(InMemoryIdentityProvider::new());
            let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
            Ok((provider, profiles))
        }
        (Backend::Firebase, Some(firebase)) => {
            let backend = FirebaseBackend::connect(firebase).map_err(|e| {
                BootstrapError::Backend {
                    details: e.to_string(),
                }
            })?;
            info!(project = firebase.project_id(), "using firebase identity backend");
            let provider: Arc<dyn IdentityProvider> = backend.identity;
            let profiles: Arc<dyn ProfileStore> = backend.profiles;
            Ok((provider, profiles))
        }
        (Backend::Firebase, None) => Err(BootstrapError::Config {
            details: "firebase backend selected without firebase settings".to_string(),
        }
        .into()),
    }
}

/// Builds the backend and starts the session layer.
///
/// # Errors
///
/// See [`build_backend`].
pub fn bootstrap(config: &ServerConfig) -> Result<Arc<AppState>, Report<BootstrapError>> {
    let (provider, profiles) = build_backend(config)?;
    let guard = RouteGuard::new(config.session.login_path.clone());
    Ok(Arc::new(AppState::new(provider, profiles, guard)))
}
