//! Router assembly.

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::error::ErrorBody;
use crate::lifecycle::AppState;
use crate::pages;

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let login_path = state.guard.login_path().to_string();

    Router::new()
        // Auth routes
        .route("/auth/login", post(auth::login))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        .route(&login_path, get(auth::login_page))
        // Guarded pages
        .merge(pages::routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new(
            "not_found",
            format!("no route for {}", uri.path()),
        )),
    )
}
