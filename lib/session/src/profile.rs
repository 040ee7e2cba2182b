//! Application-owned profile records keyed by identity id.
//!
//! A profile may be missing for a perfectly valid identity: signup writes it
//! after the identity already exists, and that write can fail. Every field is
//! optional on read for the same reason.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display attributes stored alongside an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    display_name: Option<String>,
    email: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Creates the record written at signup, stamped with the current time.
    #[must_use]
    pub fn new(display_name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            email,
            created_at: Some(Utc::now()),
        }
    }

    /// Reconstitutes a record from storage.
    #[must_use]
    pub fn from_parts(
        display_name: Option<String>,
        email: Option<String>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            display_name,
            email,
            created_at,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the address recorded at signup.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns when the record was created.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Outcome of looking up the profile for a signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLookup {
    /// A record exists.
    Found(Profile),
    /// The store answered and holds no record (orphaned identity).
    Missing,
    /// The store could not answer.
    Failed,
}

impl ProfileLookup {
    /// Returns the profile when one was found.
    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Found(profile) => Some(profile),
            Self::Missing | Self::Failed => None,
        }
    }
}
