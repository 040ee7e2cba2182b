//! Authentication routes for login, signup, logout, and the session snapshot.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use ciris_session::{AuthenticationState, HeaderIdentity, Secret};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::lifecycle::AppState;

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: Secret,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    name: String,
    email: String,
    password: Secret,
}

/// Body of `GET /auth/session`.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub state: AuthenticationState,
    pub header: Option<HeaderIdentity>,
}

/// Submits credentials. The session becomes authenticated once the provider
/// confirms; poll `/auth/session` to observe it.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<StatusCode, ApiError> {
    state.store.login(&request.email, &request.password).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates an account and its profile. Does not sign in.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .signup(&request.name, &request.email, &request.password)
        .await?;
    Ok(StatusCode::CREATED)
}

/// Signs out and sends the visitor to the login page.
pub async fn logout(State(state): State<Arc<AppState>>) -> Redirect {
    state.store.logout().await;
    Redirect::to(state.guard.login_path())
}

/// Returns the current session state and the header identity block.
pub async fn session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let current = state.store.current_state();
    Json(SessionView {
        header: HeaderIdentity::from_state(&current),
        state: current,
    })
}

/// Login entry point. Never guarded.
pub async fn login_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "page": "login",
        "title": "Sign in",
        "path": state.guard.login_path(),
        "actions": {
            "login": "/auth/login",
            "signup": "/auth/signup",
        },
    }))
}
