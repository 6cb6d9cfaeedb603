use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::models::Part;
use crate::services::catalog::{CreatePartInput, PartFilter, UpdatePartInput};
use crate::{ApiResponse, AppState};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

/// List catalog parts with optional search/category filtering
#[utoipa::path(
    get,
    path = "/api/v1/parts",
    params(PartFilter),
    responses(
        (status = 200, description = "Parts returned in catalog order"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    tag = "parts"
)]
pub async fn list_parts(
    State(state): State<AppState>,
    Query(filter): Query<PartFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let parts = state.services.catalog.list_parts(&filter).await?;
    Ok(Json(ApiResponse::success(parts)))
}

/// Parts at or below their minimum stock threshold
#[utoipa::path(
    get,
    path = "/api/v1/parts/low-stock",
    responses((status = 200, description = "Low stock parts")),
    tag = "parts"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let parts = state.services.catalog.list_low_stock().await?;
    Ok(Json(ApiResponse::success(parts)))
}

#[utoipa::path(
    get,
    path = "/api/v1/parts/{part_number}",
    responses(
        (status = 200, description = "Part found", body = Part),
        (status = 404, description = "Unknown part number", body = crate::errors::ErrorResponse)
    ),
    tag = "parts"
)]
pub async fn get_part(
    State(state): State<AppState>,
    Path(part_number): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let part = state.services.catalog.get_part(&part_number).await?;
    Ok(Json(ApiResponse::success(part)))
}

#[utoipa::path(
    post,
    path = "/api/v1/parts",
    request_body = CreatePartInput,
    responses(
        (status = 201, description = "Part created", body = Part),
        (status = 409, description = "Duplicate part number", body = crate::errors::ErrorResponse)
    ),
    tag = "parts"
)]
pub async fn create_part(
    State(state): State<AppState>,
    Json(input): Json<CreatePartInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let part = state.services.catalog.create_part(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(part))))
}

#[utoipa::path(
    put,
    path = "/api/v1/parts/{part_number}",
    request_body = UpdatePartInput,
    responses(
        (status = 200, description = "Part updated", body = Part),
        (status = 404, description = "Unknown part number", body = crate::errors::ErrorResponse)
    ),
    tag = "parts"
)]
pub async fn update_part(
    State(state): State<AppState>,
    Path(part_number): Path<String>,
    Json(input): Json<UpdatePartInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let part = state
        .services
        .catalog
        .update_part(&part_number, input)
        .await?;
    Ok(Json(ApiResponse::success(part)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parts/{part_number}",
    responses(
        (status = 204, description = "Part deleted"),
        (status = 403, description = "Capability missing", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown part number", body = crate::errors::ErrorResponse)
    ),
    tag = "parts"
)]
pub async fn delete_part(
    State(state): State<AppState>,
    Path(part_number): Path<String>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .catalog
        .delete_part(&part_number, &user)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
