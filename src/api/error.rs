// src/api/error.rs
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::ArsipError;

/// HTTP-facing wrapper that maps domain errors onto status codes and
/// the `{success: false, error}` envelope.
pub struct ApiError(pub ArsipError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<ArsipError> for ApiError {
    fn from(err: ArsipError) -> Self {
        ApiError(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError(ArsipError::Validation(format!("Invalid upload: {}", err)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ArsipError::Validation(_) => StatusCode::BAD_REQUEST,
            ArsipError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(json!({
            "success": false,
            "error": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
