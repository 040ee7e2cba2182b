//! Provider-issued identities and the credentials used to obtain them.

use ciris_core::IdentityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An account as the identity provider reports it.
///
/// The provider is authoritative for both fields. Identities are never
/// mutated after the provider hands them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: IdentityId,
    email: Option<String>,
}

impl Identity {
    /// Creates an identity from provider-reported values.
    #[must_use]
    pub fn new(id: IdentityId, email: Option<String>) -> Self {
        Self { id, email }
    }

    /// Returns the provider's id for this account.
    #[must_use]
    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    /// Returns the verified contact address, if the provider has one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// A password or other shared secret.
///
/// `Debug` is redacted so secrets never reach logs through `{:?}` or
/// `#[instrument]` fields.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wraps a plaintext secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the plaintext. Only provider clients should call this.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Number of characters in the secret.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One change reported on a provider's identity stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// An identity is now signed in.
    SignedIn(Identity),
    /// No identity is signed in.
    SignedOut,
}

impl From<Option<Identity>> for IdentityEvent {
    fn from(identity: Option<Identity>) -> Self {
        match identity {
            Some(identity) => Self::SignedIn(identity),
            None => Self::SignedOut,
        }
    }
}
