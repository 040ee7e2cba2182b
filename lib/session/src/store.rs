//! The session store: the single source of truth for who is signed in.
//!
//! The store owns exactly one subscription to the identity provider. A
//! background task (the pump) consumes that subscription strictly in receipt
//! order: for each event it looks up the profile, resolves the next
//! [`AuthenticationState`], publishes it, and fans it out to listeners.
//!
//! Operations never write state. `login`, `signup`, and `logout` only talk to
//! the provider; the resulting transitions arrive through the pump, possibly
//! after the operation has already returned to its caller.

use ciris_core::{IdentityId, ListenerId};
use rootcause::Report;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::{AuthError, ProviderError};
use crate::identity::{IdentityEvent, Secret};
use crate::profile::{Profile, ProfileLookup};
use crate::provider::{IdentityEvents, IdentityProvider, ProfileStore};
use crate::state::AuthenticationState;

type Listener = Arc<dyn Fn(&AuthenticationState) + Send + Sync>;

/// Process-wide authentication state and the operations that drive it.
pub struct SessionStore {
    shared: Arc<Shared>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    provider: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    state: watch::Sender<AuthenticationState>,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
}

impl SessionStore {
    /// Creates the store and subscribes to the provider immediately.
    ///
    /// The store starts `Initializing` and leaves it when the provider's
    /// first event has been resolved. Must be called inside a tokio runtime.
    #[must_use]
    pub fn start(provider: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        let (state, _) = watch::channel(AuthenticationState::Initializing);
        let events = provider.observe_identity();
        let shared = Arc::new(Shared {
            provider,
            profiles,
            state,
            listeners: RwLock::new(Vec::new()),
        });
        let pump = tokio::spawn(Arc::clone(&shared).pump(events));
        info!("session store started");

        Self {
            shared,
            pump: Mutex::new(Some(pump)),
        }
    }

    /// Submits a credential to the provider.
    ///
    /// Success means the provider accepted the credential; the store becomes
    /// `Authenticated` once the provider's event has been resolved. A failure
    /// leaves the state untouched. Nothing is retried.
    ///
    /// # Errors
    ///
    /// `InvalidCredential`, `AccountDisabled`, `InvalidEmail`,
    /// `NetworkUnavailable`, or `ProviderRejected`.
    #[instrument(skip(self, email, secret), fields(email = %email))]
    pub async fn login(&self, email: &str, secret: &Secret) -> ciris_core::Result<(), AuthError> {
        self.shared
            .provider
            .sign_in(email, secret)
            .await
            .map_err(provider_failure)?;
        debug!("credential accepted; waiting for provider confirmation");
        Ok(())
    }

    /// Provisions an account and its profile without signing in.
    ///
    /// Creates the identity, writes its profile, then signs the new identity
    /// back out. The caller logs in separately. Sign-out happens even when
    /// the profile write fails, which leaves an identity without a profile;
    /// later logins fall back to the bare identity.
    ///
    /// # Errors
    ///
    /// `EmailAlreadyInUse`, `WeakSecret`, `InvalidEmail`, or
    /// `NetworkUnavailable` (including a failed profile write).
    #[instrument(skip(self, email, secret), fields(email = %email))]
    pub async fn signup(
        &self,
        display_name: &str,
        email: &str,
        secret: &Secret,
    ) -> ciris_core::Result<(), AuthError> {
        let identity = self
            .shared
            .provider
            .create_identity(email, secret)
            .await
            .map_err(provider_failure)?;

        let address = identity
            .email()
            .map_or_else(|| email.trim().to_string(), str::to_string);
        let profile = Profile::new(display_name, Some(address));
        let written = self.shared.profiles.put(identity.id(), &profile).await;

        self.shared.provider.sign_out().await;

        if let Err(err) = written {
            warn!(identity = %identity.id(), error = %err, "profile write failed; identity has no profile");
            return Err(Report::new(err)
                .context(AuthError::ProfileUnreachable)
                .context(AuthError::NetworkUnavailable));
        }

        info!(identity = %identity.id(), "account provisioned");
        Ok(())
    }

    /// Signs the current identity out.
    ///
    /// Returns once the provider has confirmed. The transition to
    /// `Unauthenticated` is applied when the provider's event is resolved.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        self.shared.provider.sign_out().await;
        debug!("sign-out confirmed by provider");
    }

    /// Returns the latest resolved state.
    #[must_use]
    pub fn current_state(&self) -> AuthenticationState {
        self.shared.state.borrow().clone()
    }

    /// Registers a listener invoked on every transition, in provider order.
    ///
    /// Listeners run on the pump task and must not block. The listener is
    /// removed when the returned [`Subscription`] is dropped, or as soon as
    /// it panics.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(&AuthenticationState) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        self.shared
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(on_change)));
        debug!(listener = %id, "listener registered");

        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Returns a watch receiver tracking the latest state.
    ///
    /// Intermediate states may be skipped by a slow receiver; use
    /// [`subscribe`](Self::subscribe) to see every transition.
    #[must_use]
    pub fn changes(&self) -> watch::Receiver<AuthenticationState> {
        self.shared.state.subscribe()
    }

    /// Waits until the state satisfies `predicate` and returns that state.
    pub async fn wait_for<P>(&self, mut predicate: P) -> AuthenticationState
    where
        P: FnMut(&AuthenticationState) -> bool,
    {
        let mut changes = self.changes();
        // The sender lives in `self`, so the channel cannot close here.
        match changes.wait_for(|state| predicate(state)).await {
            Ok(state) => state.clone(),
            Err(_) => self.current_state(),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.shared
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true while the provider subscription is held.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.pump
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|pump| !pump.is_finished())
    }

    /// Releases the provider subscription. Idempotent.
    ///
    /// The last resolved state stays readable afterwards.
    pub async fn shutdown(&self) {
        let pump = self
            .pump
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pump) = pump {
            pump.abort();
            // Cancellation is the expected outcome.
            let _ = pump.await;
            info!("session store stopped; provider subscription released");
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        if let Some(pump) = self
            .pump
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pump.abort();
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.shared.state.borrow().label())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl Shared {
    async fn pump(self: Arc<Self>, mut events: IdentityEvents) {
        while let Some(event) = events.next().await {
            let lookup = match &event {
                IdentityEvent::SignedIn(identity) => self.lookup(identity.id()).await,
                // Not consulted for sign-outs.
                IdentityEvent::SignedOut => ProfileLookup::Missing,
            };
            self.apply(AuthenticationState::resolve(&event, &lookup));
        }
        debug!("identity stream closed by provider");
    }

    async fn lookup(&self, id: &IdentityId) -> ProfileLookup {
        match self.profiles.get(id).await {
            Ok(Some(profile)) => ProfileLookup::Found(profile),
            Ok(None) => {
                debug!(identity = %id, "no profile record for identity");
                ProfileLookup::Missing
            }
            Err(err) => {
                let report: Report<AuthError> =
                    Report::new(err).context(AuthError::ProfileUnreachable);
                warn!(identity = %id, error = %report, "profile lookup failed; using bare identity");
                ProfileLookup::Failed
            }
        }
    }

    fn apply(&self, next: AuthenticationState) {
        let previous = self.state.send_replace(next.clone());
        debug!(from = previous.label(), to = next.label(), "session state applied");

        let listeners: Vec<(ListenerId, Listener)> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();
        for (id, listener) in listeners {
            // A panicking listener must not take the pump down with it.
            if panic::catch_unwind(AssertUnwindSafe(|| listener(&next))).is_err() {
                warn!(listener = %id, "listener panicked; removing it");
                self.remove_listener(id);
            }
        }
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(existing, _)| *existing != id);
        debug!(listener = %id, "listener removed");
    }
}

fn provider_failure(err: ProviderError) -> Report<AuthError> {
    let kind = AuthError::from(&err);
    debug!(error = %err, "provider refused the request");
    Report::new(err).context(kind)
}

/// Capability to deregister a listener. Dropping it deregisters.
#[must_use = "dropping a Subscription removes its listener"]
pub struct Subscription {
    id: ListenerId,
    shared: Weak<Shared>,
}

impl Subscription {
    /// Returns the listener's id.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Removes the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.remove_listener(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryIdentityProvider, InMemoryProfileStore};
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(2);

    struct Harness {
        provider: Arc<InMemoryIdentityProvider>,
        profiles: Arc<InMemoryProfileStore>,
        store: SessionStore,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_provider(InMemoryIdentityProvider::new())
        }

        fn with_provider(provider: InMemoryIdentityProvider) -> Self {
            let provider = Arc::new(provider);
            let profiles = Arc::new(InMemoryProfileStore::new());
            let store = SessionStore::start(provider.clone(), profiles.clone());
            Self {
                provider,
                profiles,
                store,
            }
        }

        async fn wait_for(
            &self,
            predicate: impl FnMut(&AuthenticationState) -> bool,
        ) -> AuthenticationState {
            tokio::time::timeout(WAIT, self.store.wait_for(predicate))
                .await
                .expect("state reached in time")
        }

        async fn settled_unauthenticated(&self) {
            self.wait_for(|s| *s == AuthenticationState::Unauthenticated)
                .await;
        }
    }

    fn secret() -> Secret {
        Secret::from("Secret123!")
    }

    fn recorder(store: &SessionStore) -> (Arc<Mutex<Vec<AuthenticationState>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |state| {
            sink.lock().expect("recorder lock").push(state.clone());
        });
        (seen, subscription)
    }

    #[tokio::test]
    async fn starts_initializing_then_resolves_unauthenticated() {
        let harness = Harness::new();
        assert!(harness.store.current_state().is_initializing());

        harness.settled_unauthenticated().await;
        assert_eq!(
            harness.store.current_state(),
            AuthenticationState::Unauthenticated
        );
    }

    #[tokio::test]
    async fn stays_initializing_until_provider_knows_identity() {
        let harness = Harness::with_provider(InMemoryIdentityProvider::restoring());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(harness.store.current_state().is_initializing());

        harness.provider.finish_restore(None);
        harness.settled_unauthenticated().await;
    }

    #[tokio::test]
    async fn restored_session_resolves_with_profile() {
        let provider = InMemoryIdentityProvider::restoring();
        let identity = provider.seed_account("jane@x.test", secret());
        let harness = Harness::with_provider(provider);
        harness
            .profiles
            .put(identity.id(), &Profile::new("Jane Doe", None))
            .await
            .expect("seed profile");

        harness.provider.finish_restore(Some("jane@x.test"));
        let state = harness.wait_for(AuthenticationState::is_authenticated).await;
        let user = state.user().expect("authenticated");
        assert_eq!(user.id(), identity.id());
        assert_eq!(user.display_name(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn signup_then_login_scenario() {
        let harness = Harness::new();
        harness.settled_unauthenticated().await;
        let (seen, _subscription) = recorder(&harness.store);

        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup succeeds");
        assert!(harness.provider.current_identity().is_none());
        harness.settled_unauthenticated().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(
            seen.lock()
                .expect("recorder lock")
                .iter()
                .all(|state| !state.is_authenticated())
        );

        harness
            .store
            .login("jane@x.test", &secret())
            .await
            .expect("login succeeds");
        let state = harness
            .wait_for(|s| s.user().and_then(|u| u.display_name()) == Some("Jane Doe"))
            .await;

        let user = state.user().expect("authenticated");
        assert_eq!(user.email(), Some("jane@x.test"));
        assert_eq!(
            Some(user.id()),
            harness.provider.current_identity().as_ref().map(|i| i.id())
        );
    }

    #[tokio::test]
    async fn signup_never_leaves_the_new_identity_signed_in() {
        let harness = Harness::new();
        harness.settled_unauthenticated().await;
        let (seen, _subscription) = recorder(&harness.store);

        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup");
        harness.settled_unauthenticated().await;
        // Let the pump drain the signup sign-out event.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let seen = seen.lock().expect("recorder lock");
        assert_eq!(seen.last(), Some(&AuthenticationState::Unauthenticated));
        assert!(seen.iter().all(|state| !state.is_authenticated()), "{seen:?}");
    }

    #[tokio::test]
    async fn signup_reports_provider_failures() {
        let harness = Harness::new();
        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("first signup");

        let err = harness
            .store
            .signup("Other", "jane@x.test", &secret())
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &AuthError::EmailAlreadyInUse);

        let err = harness
            .store
            .signup("Weak", "weak@x.test", &Secret::from("123"))
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &AuthError::WeakSecret);

        harness.provider.set_reachable(false);
        let err = harness
            .store
            .signup("Offline", "offline@x.test", &secret())
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &AuthError::NetworkUnavailable);
    }

    #[tokio::test]
    async fn orphaned_identity_logs_in_with_bare_identity() {
        let harness = Harness::new();
        harness.profiles.set_reachable(false);

        let err = harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &AuthError::NetworkUnavailable);
        assert!(harness.provider.current_identity().is_none());
        harness.settled_unauthenticated().await;

        harness.profiles.set_reachable(true);
        harness
            .store
            .login("jane@x.test", &secret())
            .await
            .expect("identity exists despite missing profile");
        let state = harness.wait_for(AuthenticationState::is_authenticated).await;
        let user = state.user().expect("authenticated");
        assert!(user.display_name().is_none());
        assert_eq!(user.email(), Some("jane@x.test"));
    }

    #[tokio::test]
    async fn unreachable_profile_store_degrades_to_bare_identity() {
        let harness = Harness::new();
        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup");
        harness.settled_unauthenticated().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        harness.profiles.set_reachable(false);
        harness
            .store
            .login("jane@x.test", &secret())
            .await
            .expect("login");

        let state = harness.wait_for(AuthenticationState::is_authenticated).await;
        let user = state.user().expect("authenticated, not stuck");
        let expected = harness.provider.current_identity().expect("signed in");
        assert_eq!(user.id(), expected.id());
        assert!(user.display_name().is_none());
    }

    #[tokio::test]
    async fn failed_login_leaves_state_unchanged() {
        let harness = Harness::new();
        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup");
        harness.settled_unauthenticated().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        let before = harness.store.current_state();

        let err = harness
            .store
            .login("jane@x.test", &Secret::from("wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &AuthError::InvalidCredential);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(harness.store.current_state(), before);
    }

    #[tokio::test]
    async fn failed_login_does_not_disturb_an_active_session() {
        let harness = Harness::new();
        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup");
        harness
            .store
            .login("jane@x.test", &secret())
            .await
            .expect("login");
        harness
            .wait_for(|s| s.user().and_then(|u| u.display_name()).is_some())
            .await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        let before = harness.store.current_state();
        assert!(before.is_authenticated());

        harness.provider.set_reachable(false);
        let err = harness
            .store
            .login("jane@x.test", &secret())
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &AuthError::NetworkUnavailable);
        assert_eq!(harness.store.current_state(), before);
    }

    #[tokio::test]
    async fn logout_resolves_unauthenticated_for_every_listener() {
        let harness = Harness::new();
        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup");
        harness
            .store
            .login("jane@x.test", &secret())
            .await
            .expect("login");
        harness.wait_for(AuthenticationState::is_authenticated).await;

        let recorders: Vec<_> = (0..3).map(|_| recorder(&harness.store)).collect();
        assert_eq!(harness.provider.observer_count(), 1);

        harness.store.logout().await;
        harness.settled_unauthenticated().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(
            harness.store.current_state(),
            AuthenticationState::Unauthenticated
        );
        for (seen, _subscription) in &recorders {
            let seen = seen.lock().expect("recorder lock");
            assert_eq!(seen.last(), Some(&AuthenticationState::Unauthenticated));
        }
    }

    #[tokio::test]
    async fn initializing_is_never_reentered() {
        let harness = Harness::with_provider(InMemoryIdentityProvider::restoring());
        let (seen, _subscription) = recorder(&harness.store);

        harness.provider.finish_restore(None);
        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup");
        harness
            .store
            .login("jane@x.test", &secret())
            .await
            .expect("login");
        harness.wait_for(AuthenticationState::is_authenticated).await;
        harness.store.logout().await;
        harness.settled_unauthenticated().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        let seen = seen.lock().expect("recorder lock");
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|state| !state.is_initializing()));
    }

    #[tokio::test]
    async fn transitions_follow_provider_order() {
        let harness = Harness::new();
        harness.settled_unauthenticated().await;
        let (seen, _subscription) = recorder(&harness.store);

        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup");
        harness
            .store
            .login("jane@x.test", &secret())
            .await
            .expect("login");
        harness.store.logout().await;
        harness
            .store
            .login("jane@x.test", &secret())
            .await
            .expect("second login");
        harness
            .wait_for(|s| s.user().and_then(|u| u.display_name()).is_some())
            .await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        // signup sign-out, login, logout, login
        let labels: Vec<&str> = seen
            .lock()
            .expect("recorder lock")
            .iter()
            .map(AuthenticationState::label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "unauthenticated",
                "authenticated",
                "unauthenticated",
                "authenticated",
            ]
        );
    }

    #[tokio::test]
    async fn provider_side_disablement_ends_the_session() {
        let harness = Harness::new();
        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup");
        harness
            .store
            .login("jane@x.test", &secret())
            .await
            .expect("login");
        harness.wait_for(AuthenticationState::is_authenticated).await;

        assert!(harness.provider.disable_account("jane@x.test"));
        harness.settled_unauthenticated().await;

        let err = harness
            .store
            .login("jane@x.test", &secret())
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &AuthError::AccountDisabled);
    }

    #[tokio::test]
    async fn one_provider_subscription_regardless_of_listeners() {
        let harness = Harness::new();
        let subscriptions: Vec<Subscription> =
            (0..5).map(|_| harness.store.subscribe(|_| {})).collect();

        assert_eq!(harness.store.listener_count(), 5);
        assert_eq!(harness.provider.observer_count(), 1);

        drop(subscriptions);
        assert_eq!(harness.store.listener_count(), 0);
        assert_eq!(harness.provider.observer_count(), 1);
    }

    #[tokio::test]
    async fn unsubscribed_listener_stops_receiving() {
        let harness = Harness::new();
        harness.settled_unauthenticated().await;
        let (seen, subscription) = recorder(&harness.store);
        subscription.unsubscribe();

        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup");
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(seen.lock().expect("recorder lock").is_empty());
    }

    #[tokio::test]
    async fn panicking_listener_is_dropped_and_the_pump_keeps_running() {
        let harness = Harness::new();
        harness.settled_unauthenticated().await;
        let _faulty = harness.store.subscribe(|state| {
            assert!(state.is_authenticated(), "listener rejects {}", state.label());
        });
        let (seen, _subscription) = recorder(&harness.store);
        assert_eq!(harness.store.listener_count(), 2);

        harness
            .store
            .signup("Jane Doe", "jane@x.test", &secret())
            .await
            .expect("signup");
        harness
            .store
            .login("jane@x.test", &secret())
            .await
            .expect("login");

        let state = harness
            .wait_for(|s| s.user().and_then(|u| u.display_name()) == Some("Jane Doe"))
            .await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(state.is_authenticated());
        assert!(harness.store.is_running());
        assert_eq!(harness.store.listener_count(), 1);
        assert_eq!(seen.lock().expect("recorder lock").last(), Some(&state));
    }

    #[tokio::test]
    async fn shutdown_releases_the_provider_subscription() {
        let harness = Harness::new();
        harness.settled_unauthenticated().await;
        assert!(harness.store.is_running());

        harness.store.shutdown().await;
        harness.store.shutdown().await;

        assert!(!harness.store.is_running());
        assert_eq!(harness.provider.observer_count(), 0);
        assert_eq!(
            harness.store.current_state(),
            AuthenticationState::Unauthenticated
        );
    }
}
