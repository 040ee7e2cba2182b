//! The process-wide authentication state and its transition function.

use serde::Serialize;

use crate::identity::IdentityEvent;
use crate::profile::ProfileLookup;
use crate::user::SessionUser;

/// Who, if anyone, is using the system.
///
/// `Initializing` only exists until the provider's first event has been
/// resolved; [`AuthenticationState::resolve`] never produces it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthenticationState {
    /// No determination has been made yet.
    #[default]
    Initializing,
    /// No identity is signed in.
    Unauthenticated,
    /// An identity is signed in and resolved.
    Authenticated(SessionUser),
}

impl AuthenticationState {
    /// Computes the state that follows a provider event.
    ///
    /// Pure and total: the result depends only on the event and the outcome
    /// of the profile lookup made for it. The lookup is ignored for
    /// sign-outs. A failed lookup still authenticates, with the bare identity.
    #[must_use]
    pub fn resolve(event: &IdentityEvent, lookup: &ProfileLookup) -> Self {
        match event {
            IdentityEvent::SignedOut => Self::Unauthenticated,
            IdentityEvent::SignedIn(identity) => {
                Self::Authenticated(SessionUser::merge(identity, lookup.profile()))
            }
        }
    }

    /// Returns true until the first provider event has been resolved.
    #[must_use]
    pub fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    /// Returns true when an identity is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Returns the signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Initializing | Self::Unauthenticated => None,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated(_) => "authenticated",
        }
    }
}
