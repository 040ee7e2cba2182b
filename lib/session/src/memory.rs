//! In-process identity provider and profile store.
//!
//! Used by the test suites and by the server's `memory` backend for local
//! development. The provider follows the hosted provider's observable rules:
//! creating an account leaves it signed out, secrets need at least
//! [`MIN_SECRET_CHARS`] characters, and sign-out always succeeds. Both
//! backends can be switched unreachable to exercise failure paths.

use async_trait::async_trait;
use ciris_core::IdentityId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;
use ulid::Ulid;

use crate::error::{ProfileError, ProviderError};
use crate::identity::{Identity, Secret};
use crate::profile::Profile;
use crate::provider::{IdentityBroadcaster, IdentityEvents, IdentityProvider, ProfileStore};

/// Shortest secret the in-memory provider accepts.
pub const MIN_SECRET_CHARS: usize = 6;

#[derive(Debug)]
struct Account {
    identity: Identity,
    secret: Secret,
    disabled: bool,
}

/// Identity provider backed by a process-local account table.
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    /// Accounts keyed by normalized address.
    accounts: Mutex<HashMap<String, Account>>,
    broadcaster: IdentityBroadcaster,
    reachable: AtomicBool,
}

impl InMemoryIdentityProvider {
    /// Creates a provider that knows nobody is signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::with_broadcaster(IdentityBroadcaster::new())
    }

    /// Creates a provider that is still restoring a persisted session.
    ///
    /// No identity event is emitted until [`finish_restore`](Self::finish_restore).
    #[must_use]
    pub fn restoring() -> Self {
        Self::with_broadcaster(IdentityBroadcaster::pending())
    }

    fn with_broadcaster(broadcaster: IdentityBroadcaster) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            broadcaster,
            reachable: AtomicBool::new(true),
        }
    }

    /// Completes session restore, signing in the given account if it exists.
    pub fn finish_restore(&self, signed_in_email: Option<&str>) {
        let identity = signed_in_email.and_then(|email| {
            self.accounts()
                .get(&normalize(email))
                .filter(|account| !account.disabled)
                .map(|account| account.identity.clone())
        });
        self.broadcaster.publish(identity);
    }

    /// Registers an account without signing it in or emitting an event.
    ///
    /// Used to pre-populate the table, e.g. with demo accounts.
    pub fn seed_account(&self, email: &str, secret: Secret) -> Identity {
        let identity = Identity::new(
            IdentityId::new(Ulid::new().to_string()),
            Some(email.trim().to_string()),
        );
        self.accounts().insert(
            normalize(email),
            Account {
                identity: identity.clone(),
                secret,
                disabled: false,
            },
        );
        identity
    }

    /// Makes every subsequent call succeed or fail with `Unreachable`.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Disables an account. A live session for it is ended by the provider.
    ///
    /// Returns false when no such account exists.
    pub fn disable_account(&self, email: &str) -> bool {
        let identity = {
            let mut accounts = self.accounts();
            let Some(account) = accounts.get_mut(&normalize(email)) else {
                return false;
            };
            account.disabled = true;
            account.identity.clone()
        };

        if self.broadcaster.current().as_ref() == Some(&identity) {
            debug!(identity = %identity.id(), "disabled account was signed in; ending session");
            self.broadcaster.publish(None);
        }
        true
    }

    /// Returns the identity currently signed in.
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        self.broadcaster.current()
    }

    /// Number of live identity subscriptions.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.broadcaster.observer_count()
    }

    fn accounts(&self) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_reachable(&self) -> Result<(), ProviderError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProviderError::Unreachable {
                reason: "in-memory provider switched offline".to_string(),
            })
        }
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        secret: &Secret,
    ) -> Result<Identity, ProviderError> {
        self.ensure_reachable()?;
        if !is_valid_email(email) {
            return Err(ProviderError::InvalidEmail);
        }
        if secret.char_count() < MIN_SECRET_CHARS {
            return Err(ProviderError::WeakSecret);
        }

        let identity = {
            let mut accounts = self.accounts();
            let key = normalize(email);
            if accounts.contains_key(&key) {
                return Err(ProviderError::EmailAlreadyInUse);
            }
            let identity = Identity::new(
                IdentityId::new(Ulid::new().to_string()),
                Some(email.trim().to_string()),
            );
            accounts.insert(
                key,
                Account {
                    identity: identity.clone(),
                    secret: secret.clone(),
                    disabled: false,
                },
            );
            identity
        };

        debug!(identity = %identity.id(), "account created");
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, secret: &Secret) -> Result<(), ProviderError> {
        self.ensure_reachable()?;
        let identity = {
            let accounts = self.accounts();
            let account = accounts
                .get(&normalize(email))
                .filter(|account| account.secret == *secret)
                .ok_or(ProviderError::InvalidCredential)?;
            if account.disabled {
                return Err(ProviderError::AccountDisabled);
            }
            account.identity.clone()
        };

        debug!(identity = %identity.id(), "signed in");
        self.broadcaster.publish(Some(identity));
        Ok(())
    }

    async fn sign_out(&self) {
        self.broadcaster.publish(None);
    }

    fn observe_identity(&self) -> IdentityEvents {
        self.broadcaster.subscribe()
    }
}

/// Profile store backed by a process-local map.
#[derive(Debug)]
pub struct InMemoryProfileStore {
    records: Mutex<HashMap<IdentityId, Profile>>,
    reachable: AtomicBool,
}

impl InMemoryProfileStore {
    /// Creates an empty, reachable store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            reachable: AtomicBool::new(true),
        }
    }

    /// Makes every subsequent call succeed or fail with `Unreachable`.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Returns true if a record exists for the identity.
    #[must_use]
    pub fn contains(&self, id: &IdentityId) -> bool {
        self.records().contains_key(id)
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<IdentityId, Profile>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_reachable(&self) -> Result<(), ProfileError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProfileError::Unreachable {
                reason: "in-memory profile store switched offline".to_string(),
            })
        }
    }
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, id: &IdentityId) -> Result<Option<Profile>, ProfileError> {
        self.ensure_reachable()?;
        Ok(self.records().get(id).cloned())
    }

    async fn put(&self, id: &IdentityId, profile: &Profile) -> Result<(), ProfileError> {
        self.ensure_reachable()?;
        self.records().insert(id.clone(), profile.clone());
        Ok(())
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
