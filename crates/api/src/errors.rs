use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use schoolhub_core::DomainError;

/// HTTP projection of [`DomainError`].
///
/// Decision denials never reach this type (the guard answers those with a
/// redirect); this covers the registry's mutation paths.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::Validation(_) | DomainError::InvalidId(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Unauthorized => StatusCode::FORBIDDEN,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
