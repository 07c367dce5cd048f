//! Validated JSON extractor.
//!
//! Deserializes the body and runs its `validator` rules. Every failure,
//! including a body that is not JSON at all, becomes a 422 response in the
//! `{message, errors}` shape.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use userbook_core::{field_errors, UserbookError};
use validator::{Validate, ValidationErrors};

/// JSON extractor that validates the deserialized value.
///
/// ```ignore
/// async fn create_user(ValidatedJson(request): ValidatedJson<CreateUserRequest>) {
///     // every field rule already passed
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// The body could not be read or deserialized.
    JsonError(JsonRejection),
    /// One or more field rules failed.
    ValidationError(ValidationErrors),
}

impl From<ValidatedJsonRejection> for UserbookError {
    fn from(rejection: ValidatedJsonRejection) -> Self {
        match rejection {
            ValidatedJsonRejection::JsonError(rejection) => {
                UserbookError::field("body", "json", rejection.body_text())
            }
            ValidatedJsonRejection::ValidationError(errors) => {
                UserbookError::Validation(field_errors(&errors))
            }
        }
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        AppError(self.into()).into_response()
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!("Rejected request body: {}", rejection);
            ValidatedJsonRejection::JsonError(rejection)
        })?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct NameRequest {
        #[validate(length(min = 3, message = "The name field must be at least 3 characters."))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let ValidatedJson(request) =
            ValidatedJson::<NameRequest>::from_request(json_request(r#"{"name":"Ada"}"#), &())
                .await
                .unwrap();
        assert_eq!(request.name, "Ada");
    }

    #[tokio::test]
    async fn test_rule_failure_keeps_field_message() {
        let rejection =
            ValidatedJson::<NameRequest>::from_request(json_request(r#"{"name":"Al"}"#), &())
                .await
                .unwrap_err();
        match UserbookError::from(rejection) {
            UserbookError::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "name");
                assert_eq!(fields[0].message, "The name field must be at least 3 characters.");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_unprocessable() {
        let rejection = ValidatedJson::<NameRequest>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        let response = rejection.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}
