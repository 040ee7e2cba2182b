//! Seams to the external identity provider and profile store.
//!
//! Both collaborators are black boxes to the session store. Backends live in
//! [`crate::memory`] and in the `ciris-firebase` crate.

use async_trait::async_trait;
use ciris_core::IdentityId;
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

use crate::error::{ProfileError, ProviderError};
use crate::identity::{Identity, IdentityEvent, Secret};
use crate::profile::Profile;

/// Client for the service that owns accounts and credentials.
///
/// Operations report only success or failure. Identity changes, including
/// the ones these calls cause, arrive on the stream from
/// [`observe_identity`](Self::observe_identity).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and returns its identity.
    async fn create_identity(
        &self,
        email: &str,
        secret: &Secret,
    ) -> Result<Identity, ProviderError>;

    /// Submits a credential for sign-in.
    async fn sign_in(&self, email: &str, secret: &Secret) -> Result<(), ProviderError>;

    /// Signs the current identity out. Completes once sign-out is confirmed.
    async fn sign_out(&self);

    /// Opens a stream of identity changes.
    ///
    /// The current identity is delivered first as soon as the provider knows
    /// it. Dropping the returned receiver unsubscribes.
    fn observe_identity(&self) -> IdentityEvents;
}

/// Keyed store of profile records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetches the profile for an identity. `Ok(None)` means no record.
    async fn get(&self, id: &IdentityId) -> Result<Option<Profile>, ProfileError>;

    /// Writes (creating or replacing) the profile for an identity.
    async fn put(&self, id: &IdentityId, profile: &Profile) -> Result<(), ProfileError>;
}

/// Receiving end of an identity subscription.
#[derive(Debug)]
pub struct IdentityEvents {
    rx: mpsc::UnboundedReceiver<IdentityEvent>,
}

impl IdentityEvents {
    /// Waits for the next event. `None` once the provider has gone away.
    pub async fn next(&mut self) -> Option<IdentityEvent> {
        self.rx.recv().await
    }
}

/// Fan-out of identity changes for provider implementations.
///
/// Remembers the current identity so late subscribers start from it, and
/// prunes subscribers whose receiver was dropped.
#[derive(Debug)]
pub struct IdentityBroadcaster {
    inner: Mutex<BroadcastState>,
}

#[derive(Debug)]
struct BroadcastState {
    current: Option<Identity>,
    /// False until the provider knows the current identity.
    known: bool,
    observers: Vec<mpsc::UnboundedSender<IdentityEvent>>,
}

impl IdentityBroadcaster {
    /// A broadcaster that already knows nobody is signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::with_known(true)
    }

    /// A broadcaster that withholds the first event until
    /// [`publish`](Self::publish) is called, as while restoring a persisted
    /// session.
    #[must_use]
    pub fn pending() -> Self {
        Self::with_known(false)
    }

    fn with_known(known: bool) -> Self {
        Self {
            inner: Mutex::new(BroadcastState {
                current: None,
                known,
                observers: Vec::new(),
            }),
        }
    }

    /// Registers a subscriber, replaying the current identity if known.
    pub fn subscribe(&self) -> IdentityEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if state.known {
            // A fresh receiver cannot be closed yet.
            let _ = tx.send(IdentityEvent::from(state.current.clone()));
        }
        state.observers.push(tx);
        IdentityEvents { rx }
    }

    /// Records a new current identity and delivers it to every subscriber.
    pub fn publish(&self, identity: Option<Identity>) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let event = IdentityEvent::from(identity.clone());
        state.current = identity;
        state.known = true;
        state
            .observers
            .retain(|observer| observer.send(event.clone()).is_ok());
    }

    /// Returns the current identity.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    /// Returns true once the current identity is known.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .known
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.observers.retain(|observer| !observer.is_closed());
        state.observers.len()
    }
}

impl Default for IdentityBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
