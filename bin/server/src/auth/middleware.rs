//! Route guard extractor for Axum.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use ciris_session::{GuardDecision, SessionUser};
use std::sync::Arc;

use crate::error::ErrorBody;
use crate::lifecycle::AppState;

/// Extractor for requiring an authenticated session.
///
/// While the session is initializing the request is answered with a waiting
/// response; without a session the visitor is redirected to the login page.
pub struct RequireSession(pub SessionUser);

impl<S> FromRequestParts<S> for RequireSession
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let current = app_state.store.current_state();

        match app_state.guard.decide(&current) {
            GuardDecision::Wait => Err(GuardRejection::Initializing),
            GuardDecision::Redirect { to } => Err(GuardRejection::NotAuthenticated {
                login_path: to.to_string(),
            }),
            GuardDecision::Render(user) => Ok(RequireSession(user.clone())),
        }
    }
}

/// Rejection type for [`RequireSession`].
#[derive(Debug)]
pub enum GuardRejection {
    Initializing,
    NotAuthenticated { login_path: String },
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Initializing => (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::RETRY_AFTER, "1")],
                Json(ErrorBody::new("initializing", "session is still initializing")),
            )
                .into_response(),
            Self::NotAuthenticated { login_path } => Redirect::to(&login_path).into_response(),
        }
    }
}
