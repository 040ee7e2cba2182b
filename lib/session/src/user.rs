//! The view-facing session user.
//!
//! A `SessionUser` merges an [`Identity`] with its [`Profile`]. The identity
//! is authoritative for the id and contact address; the profile only
//! contributes display attributes. Only the session store builds these.

use chrono::{DateTime, Utc};
use ciris_core::IdentityId;
use serde::Serialize;

use crate::identity::Identity;
use crate::profile::Profile;

/// The identity the UI shows for the active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    id: IdentityId,
    email: Option<String>,
    display_name: Option<String>,
    member_since: Option<DateTime<Utc>>,
}

impl SessionUser {
    /// Merges an identity with its profile, if one exists.
    ///
    /// The profile's own address never overrides the identity's.
    #[must_use]
    pub(crate) fn merge(identity: &Identity, profile: Option<&Profile>) -> Self {
        Self {
            id: identity.id().clone(),
            email: identity.email().map(str::to_string),
            display_name: profile.and_then(|p| p.display_name().map(str::to_string)),
            member_since: profile.and_then(Profile::created_at),
        }
    }

    /// Returns the provider's id for this user.
    #[must_use]
    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    /// Returns the contact address, if the provider has one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the profile display name, if a profile was found.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns when the profile was created, if known.
    #[must_use]
    pub fn member_since(&self) -> Option<DateTime<Utc>> {
        self.member_since
    }
}
