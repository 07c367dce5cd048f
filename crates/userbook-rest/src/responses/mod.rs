//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};
use userbook_core::{ErrorResponse, UserbookError};

/// Application error type for Axum.
///
/// Server-side failures are logged here and reach the client only as a
/// generic message.
#[derive(Debug)]
pub struct AppError(pub UserbookError);

impl From<UserbookError> for AppError {
    fn from(err: UserbookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_server_error() {
            error!(code = self.0.error_code(), "Request failed: {}", self.0);
        } else if status == StatusCode::CONFLICT {
            warn!("Request conflicted: {}", self.0);
        }

        (status, Json(ErrorResponse::from_error(&self.0))).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Wraps a body in a 200 response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

/// Wraps a body in a 201 response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

/// Empty 204 response.
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// The 404 body used when a user id matches nothing.
pub fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found()))
}
