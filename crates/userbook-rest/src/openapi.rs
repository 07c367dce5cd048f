//! OpenAPI document for the REST API.

use crate::controllers::health_controller::{HealthResponse, ReadinessResponse};
use userbook_core::{ErrorResponse, FieldError, PageInfo, SortDirection, SortField, UserId};
use userbook_service::{
    AddressResponse, CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Userbook API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Userbook API",
        description = "Users with a postal address: search, pagination and transactional writes",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::user_controller::list_users,
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::create_user,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            PageInfo,
            SortField,
            SortDirection,
            ErrorResponse,
            FieldError,
            CreateUserRequest,
            UpdateUserRequest,
            AddressResponse,
            UserResponse,
            UserListResponse,
            HealthResponse,
            ReadinessResponse,
        )
    ),
    tags(
        (name = "users", description = "Users and their addresses"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_user_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/users"));
        assert!(doc.paths.paths.contains_key("/v1/users/{id}"));
        assert!(doc.paths.paths.contains_key("/ready"));
    }
}
