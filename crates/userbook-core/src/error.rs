//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Userbook.
///
/// "Not found" is deliberately absent from the read/write contracts of the
/// repository and service layers; those return `Option`. The `NotFound`
/// variant exists for the HTTP boundary, which turns an absent value into a
/// 404 response.
#[derive(Error, Debug)]
pub enum UserbookError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Field-level validation failure
    #[error("Validation error: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl UserbookError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 422,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error for a single field.
    #[must_use]
    pub fn field<F, M>(field: F, code: &str, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Self::Validation(vec![FieldError {
            field: field.into(),
            message: message.into(),
            code: code.to_string(),
        }])
    }

    /// Creates the validation error reported when an email is already registered.
    #[must_use]
    pub fn email_taken() -> Self {
        Self::field("email", "unique", "The email has already been taken.")
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true for errors whose details must not reach API clients.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for UserbookError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Conflict(db_err.message().to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for UserbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error body returned by the API.
///
/// Validation failures carry an `errors` map of field name to messages;
/// every other failure only has a `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
    /// Field-level validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a plain message body.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    /// Creates the body for a missing resource.
    #[must_use]
    pub fn not_found() -> Self {
        Self::message("Not found")
    }

    /// Creates a new error response from a `UserbookError`.
    #[must_use]
    pub fn from_error(error: &UserbookError) -> Self {
        match error {
            UserbookError::NotFound { .. } => Self::not_found(),
            UserbookError::Validation(fields) => Self::message("The given data was invalid.")
                .with_details(fields),
            UserbookError::Conflict(message) => Self::message(message.clone()),
            _ => Self::message("Server Error"),
        }
    }

    /// Sets field-level validation errors, grouped by field.
    #[must_use]
    pub fn with_details(mut self, details: &[FieldError]) -> Self {
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for detail in details {
            errors
                .entry(detail.field.clone())
                .or_default()
                .push(detail.message.clone());
        }
        self.errors = Some(errors);
        self
    }
}

impl From<&UserbookError> for ErrorResponse {
    fn from(error: &UserbookError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(UserbookError::not_found("User", 1).status_code(), 404);
        assert_eq!(UserbookError::email_taken().status_code(), 422);
        assert_eq!(UserbookError::conflict("duplicate").status_code(), 409);
        assert_eq!(UserbookError::Database("db error".to_string()).status_code(), 500);
        assert_eq!(UserbookError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(UserbookError::not_found("User", 1).error_code(), "NOT_FOUND");
        assert_eq!(UserbookError::email_taken().error_code(), "VALIDATION_ERROR");
        assert_eq!(UserbookError::Database("db".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(UserbookError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = UserbookError::Validation(vec![
            FieldError {
                field: "email".to_string(),
                message: "bad email".to_string(),
                code: "email".to_string(),
            },
            FieldError {
                field: "city".to_string(),
                message: "required".to_string(),
                code: "required".to_string(),
            },
        ]);
        let text = err.to_string();
        assert!(text.contains("email: bad email"));
        assert!(text.contains("city: required"));
    }

    #[test]
    fn test_not_found_body_is_exact() {
        let response = ErrorResponse::from_error(&UserbookError::not_found("User", 7));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Not found" }));
    }

    #[test]
    fn test_validation_body_groups_messages_by_field() {
        let err = UserbookError::Validation(vec![
            FieldError {
                field: "password".to_string(),
                message: "too short".to_string(),
                code: "length".to_string(),
            },
            FieldError {
                field: "password".to_string(),
                message: "required".to_string(),
                code: "required".to_string(),
            },
        ]);
        let response = ErrorResponse::from_error(&err);
        let errors = response.errors.unwrap();
        assert_eq!(errors["password"].len(), 2);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = UserbookError::Database("connection refused to 10.0.0.3".to_string());
        assert!(err.is_server_error());
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.message, "Server Error");
        assert!(response.errors.is_none());
    }
}
