use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dine_auth::AuthError;
use dine_core::errors::DineError;
use serde_json::json;
use thiserror::Error;

/// Failures of the platform functions, answered as `{error}`.
#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("Not authenticated")]
    AuthenticationFailed,
    #[error("Forbidden")]
    AuthorizationDenied,
    /// A backend read or write failed; its message is passed through.
    #[error("{0}")]
    UpstreamQueryFailed(#[source] anyhow::Error),
}

impl FunctionError {
    pub fn status(&self) -> StatusCode {
        match self {
            FunctionError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            FunctionError::AuthorizationDenied => StatusCode::FORBIDDEN,
            FunctionError::UpstreamQueryFailed(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> String {
        match self {
            FunctionError::UpstreamQueryFailed(err) => upstream_message(err),
            other => other.to_string(),
        }
    }
}

/// The plain message of a service error, without the kind prefix.
pub fn upstream_message(err: &anyhow::Error) -> String {
    DineError::from_anyhow(err)
        .map(|e| e.message.clone())
        .unwrap_or_else(|| err.to_string())
}

impl From<AuthError> for FunctionError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated | AuthError::InvalidCredential(_) => {
                FunctionError::AuthenticationFailed
            }
            AuthError::Forbidden => FunctionError::AuthorizationDenied,
            AuthError::Upstream(e) => FunctionError::UpstreamQueryFailed(e),
        }
    }
}

impl From<anyhow::Error> for FunctionError {
    fn from(err: anyhow::Error) -> Self {
        FunctionError::UpstreamQueryFailed(err)
    }
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        if let FunctionError::UpstreamQueryFailed(err) = &self {
            tracing::warn!(error = %err, "function upstream failure");
        }
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
