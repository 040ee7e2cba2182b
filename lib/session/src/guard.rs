//! Gate for protected routes.

use crate::state::AuthenticationState;
use crate::user::SessionUser;

/// Default login entry point.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// What to do with a navigation to a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision<'a> {
    /// Show a neutral waiting indicator. No redirect, no protected content.
    Wait,
    /// Send the visitor to the login entry point. The attempted destination
    /// is not preserved.
    Redirect {
        /// Path of the login entry point.
        to: &'a str,
    },
    /// Render the protected content for this user.
    Render(&'a SessionUser),
}

/// Decides per navigation whether protected content may be shown.
///
/// The decision depends only on the latest [`AuthenticationState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    login_path: String,
}

impl RouteGuard {
    /// Creates a guard that redirects to `login_path`.
    #[must_use]
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    /// Returns the login entry point.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn decide<'a>(&'a self, state: &'a AuthenticationState) -> GuardDecision<'a> {
        match state {
            AuthenticationState::Initializing => GuardDecision::Wait,
            AuthenticationState::Unauthenticated => GuardDecision::Redirect {
                to: &self.login_path,
            },
            AuthenticationState::Authenticated(user) => GuardDecision::Render(user),
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH)
    }
}
