use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dine_core::errors::DineError;

#[derive(Debug)]
pub struct DineAxumError(pub anyhow::Error);

impl From<anyhow::Error> for DineAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<DineError> for DineAxumError {
    fn from(e: DineError) -> Self {
        Self(e.into_anyhow())
    }
}

impl IntoResponse for DineAxumError {
    fn into_response(self) -> Response {
        let safe = match DineError::from_anyhow(&self.0) {
            Some(dine) => dine.sanitize_for_client(),
            None => {
                tracing::error!(error = %self.0, "unhandled error");
                DineError::general_error(self.0.to_string())
            }
        };

        let status =
            StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}
