pub mod import;
pub mod patients;

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use opsched_core::ImportError;

use crate::state::AppState;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-aborting errors, mapped to HTTP status codes.
#[derive(Debug)]
pub enum AppError {
    /// Rejected before any parsing: wrong file type, oversized body, bad options.
    BadRequest(String),
    /// Missing or wrong bearer token.
    Unauthorized,
    /// Everything else; detail goes to the log, not the caller.
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Internal(err) => {
                log::error!("request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            // Caller-safe by construction; the upload itself is at fault
            ImportError::FeedParse(_) => AppError::BadRequest(err.to_string()),
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

/// Check the caller's bearer token against the configured one.
pub fn require_auth(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == state.api_token => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}
