//! Proxy error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quizlens_protocols::ProviderError;
use thiserror::Error;

/// Errors returned by the analysis endpoint as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON payload.")]
    InvalidJson,

    #[error("Missing question text or answers.")]
    MissingInput,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::MissingInput => StatusCode::BAD_REQUEST,
            Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
