//! Read-only views of the session for UI chrome.

use serde::Serialize;

use crate::state::AuthenticationState;

/// Shown in the header when the profile has no display name.
pub const FALLBACK_NAME: &str = "Admin User";

/// Shown under the name when the identity has no contact address.
pub const FALLBACK_SUBTITLE: &str = "System Admin";

/// Identity block rendered in the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderIdentity {
    pub name: String,
    pub subtitle: String,
}

impl HeaderIdentity {
    /// Returns the header identity, or `None` unless someone is signed in.
    #[must_use]
    pub fn from_state(state: &AuthenticationState) -> Option<Self> {
        let user = state.user()?;
        Some(Self {
            name: user.display_name().unwrap_or(FALLBACK_NAME).to_string(),
            subtitle: user.email().unwrap_or(FALLBACK_SUBTITLE).to_string(),
        })
    }
}
