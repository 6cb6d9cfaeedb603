use crate::errors::ServiceError;
use crate::models::User;
use crate::services::users::{CreateUserInput, UpdateUserInput, UserFilter};
use crate::{ApiResponse, AppState};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

/// List directory users with optional search/role/status filtering
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserFilter),
    responses((status = 200, description = "Users returned")),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let users = state.services.users.list_users(&filter).await?;
    Ok(Json(ApiResponse::success(users)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "Unknown user id", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.get_user(&id).await?;
    Ok(Json(ApiResponse::success(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input or duplicate email", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    request_body = UpdateUserInput,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "Unknown user id", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.update_user(&id, input).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// Deactivate a user; directory records are never deleted
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/deactivate",
    responses(
        (status = 200, description = "User deactivated", body = User),
        (status = 404, description = "Unknown user id", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.deactivate_user(&id).await?;
    Ok(Json(ApiResponse::success(user)))
}
