//! Authentication surface for the dashboard.
//!
//! - Route handlers for login, signup, logout, and the session snapshot
//! - The [`RequireSession`] extractor, which applies the route guard
//!
//! All of it goes through the process-wide session store in
//! [`AppState`](crate::lifecycle::AppState).

pub mod middleware;
pub mod routes;

pub use middleware::{GuardRejection, RequireSession};
pub use routes::{login, login_page, logout, session, signup};
