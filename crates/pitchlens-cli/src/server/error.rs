//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pitchlens::PitchlensError;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// Internal server error.
    Internal(String),
    /// Error from the pitchlens library.
    Pitchlens(PitchlensError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
            ApiError::Pitchlens(e) => {
                let (status, error) = match &e {
                    PitchlensError::PlayerNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                    PitchlensError::NotLoaded(_) => (StatusCode::CONFLICT, "not_loaded"),
                    PitchlensError::MissingColumn { .. }
                    | PitchlensError::InvalidValue { .. }
                    | PitchlensError::EmptyData(_)
                    | PitchlensError::Csv(_) => (StatusCode::BAD_REQUEST, "invalid_upload"),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
                };
                (status, error, e.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<PitchlensError> for ApiError {
    fn from(err: PitchlensError) -> Self {
        ApiError::Pitchlens(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Pitchlens(e) => write!(f, "Pitchlens error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
