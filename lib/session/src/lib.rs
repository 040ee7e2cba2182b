//! Session management for the CIRIS dashboard.
//!
//! This crate holds the process-wide answer to "who is using the system":
//!
//! - **Session Store**: subscribes once to the identity provider, merges each
//!   identity with its profile, and publishes an [`AuthenticationState`]
//! - **Route Guard**: maps the latest state to wait, redirect, or render
//! - **Consumers**: read-only views such as the header identity block
//! - **Seams**: [`IdentityProvider`] and [`ProfileStore`] traits, with
//!   in-memory backends in [`memory`]
//!
//! ```
//! use ciris_session::{AuthenticationState, GuardDecision, RouteGuard};
//!
//! let guard = RouteGuard::default();
//! assert_eq!(guard.decide(&AuthenticationState::Initializing), GuardDecision::Wait);
//! assert_eq!(
//!     guard.decide(&AuthenticationState::Unauthenticated),
//!     GuardDecision::Redirect { to: "/login" }
//! );
//! ```

pub mod consumer;
pub mod error;
pub mod guard;
pub mod identity;
pub mod memory;
pub mod profile;
pub mod provider;
pub mod state;
pub mod store;
pub mod user;

pub use consumer::HeaderIdentity;
pub use error::{AuthError, ProfileError, ProviderError};
pub use guard::{GuardDecision, RouteGuard};
pub use identity::{Identity, IdentityEvent, Secret};
pub use memory::{InMemoryIdentityProvider, InMemoryProfileStore};
pub use profile::{Profile, ProfileLookup};
pub use provider::{IdentityBroadcaster, IdentityEvents, IdentityProvider, ProfileStore};
pub use state::AuthenticationState;
pub use store::{SessionStore, Subscription};
pub use user::SessionUser;
