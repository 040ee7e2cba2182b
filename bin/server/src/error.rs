//! Server error types and their HTTP rendering.
//!
//! Session failures arrive as `Report<AuthError>`; handlers return them as
//! [`ApiError`], which picks a status from the current context, logs the full
//! report, and answers `{ "error": code, "message": text }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ciris_session::AuthError;
use rootcause::Report;
use serde::Serialize;
use std::fmt;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }
}

/// A failed session operation, ready to render.
#[derive(Debug)]
pub struct ApiError(Report<AuthError>);

impl ApiError {
    /// Status code for the error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        status_for(self.0.current_context())
    }
}

impl From<Report<AuthError>> for ApiError {
    fn from(report: Report<AuthError>) -> Self {
        Self(report)
    }
}

/// Maps an authentication failure onto an HTTP status.
#[must_use]
pub fn status_for(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidCredential => StatusCode::UNAUTHORIZED,
        AuthError::AccountDisabled => StatusCode::FORBIDDEN,
        AuthError::EmailAlreadyInUse => StatusCode::CONFLICT,
        AuthError::WeakSecret | AuthError::InvalidEmail => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::NetworkUnavailable | AuthError::ProfileUnreachable => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AuthError::ProviderRejected { .. } => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let context = self.0.current_context();
        if status.is_server_error() {
            tracing::warn!(error = %self.0, "session operation failed");
        } else {
            tracing::debug!(error = %self.0, "session operation refused");
        }

        let body = ErrorBody::new(context.code(), context.to_string());
        (status, Json(body)).into_response()
    }
}

/// Errors raised while starting the server.
#[derive(Debug)]
pub enum BootstrapError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// The identity backend could not be built.
    Backend { details: String },
    /// The listener could not be bound.
    Bind { addr: String, details: String },
    /// The server stopped with an I/O error.
    Serve { details: String },
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "invalid configuration: {details}"),
            Self::Backend { details } => write!(f, "failed to build identity backend: {details}"),
            Self::Bind { addr, details } => write!(f, "failed to bind '{addr}': {details}"),
            Self::Serve { details } => write!(f, "server error: {details}"),
        }
    }
}

impl std::error::Error for BootstrapError {}
