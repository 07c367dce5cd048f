//! User and address controller.

use crate::{
    extractors::{ListUsersQuery, ValidatedJson},
    responses::{created, no_content, not_found, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::debug;
use userbook_core::{ErrorResponse, UserId, UserbookError};
use userbook_service::{CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse};

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List users with their addresses.
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse),
        (status = 422, description = "Invalid query parameters", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> ApiResult<UserListResponse> {
    let Query(query) = query
        .map_err(|rejection| UserbookError::field("query", "query", rejection.body_text()))?;
    debug!("List users request: {:?}", query);

    let (page, search) = query.into_criteria(&state.pagination)?;
    let users = state.user_service.get_users(page, search).await?;

    ok(UserListResponse::from(users))
}

/// Get a user with its address.
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Invalid id", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    debug!("Get user request: {}", id);

    let user_id = UserId::parse(&id)?;
    match state.user_service.get_user(user_id).await? {
        Some(user) => Ok(Json(UserResponse::from(user)).into_response()),
        None => Ok(not_found().into_response()),
    }
}

/// Create a user with its address.
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<Response, AppError> {
    debug!("Create user request: {}", request.email);

    if state.user_service.email_taken(&request.email, None).await? {
        return Err(UserbookError::email_taken().into());
    }

    let user = state.user_service.create_user(request).await?;
    Ok(created(UserResponse::from(user)).into_response())
}

/// Update a user and its address.
///
/// An omitted or empty password keeps the current one.
#[utoipa::path(
    put,
    path = "/v1/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Response, AppError> {
    debug!("Update user request: {}", id);

    let user_id = UserId::parse(&id)?;
    if state
        .user_service
        .email_taken(&request.email, Some(user_id))
        .await?
    {
        return Err(UserbookError::email_taken().into());
    }

    match state.user_service.update_user(user_id, request).await? {
        Some(user) => Ok(Json(UserResponse::from(user)).into_response()),
        None => Ok(not_found().into_response()),
    }
}

/// Delete a user and its address.
#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Id is not an integer", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    debug!("Delete user request: {}", id);

    // No row can have a non-positive id, so deleting one is a miss.
    if id.trim().parse::<i64>().is_ok_and(|n| n <= 0) {
        return Ok(not_found().into_response());
    }

    let user_id = UserId::parse(&id)?;
    if state.user_service.delete_user(user_id).await? {
        Ok(no_content().into_response())
    } else {
        Ok(not_found().into_response())
    }
}
