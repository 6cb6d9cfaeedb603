use crate::auth::{consts, AuthUser};
use crate::errors::ServiceError;
use crate::export;
use crate::models::StaffRequest;
use crate::services::requests::{DecideRequestInput, RequestFilter, SubmitRequestInput};
use crate::{ApiResponse, AppState};
use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};

/// Applies the viewer's request scope: the whole queue for `requests.read`,
/// own submissions for `requests.read.own`.
fn scope_filter(mut filter: RequestFilter, user: &AuthUser) -> Result<RequestFilter, ServiceError> {
    if user.has_capability(consts::REQUESTS_READ) {
        Ok(filter)
    } else if user.has_capability(consts::REQUESTS_READ_OWN) {
        filter.staff_id = Some(user.id.clone());
        Ok(filter)
    } else {
        Err(ServiceError::Forbidden(format!(
            "role {} cannot read requests",
            user.role
        )))
    }
}

/// Submit a part request for manager review
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body = SubmitRequestInput,
    responses(
        (status = 201, description = "Request submitted", body = StaffRequest),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown part", body = crate::errors::ErrorResponse)
    ),
    tag = "requests"
)]
pub async fn submit_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SubmitRequestInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let request = state.services.requests.submit_request(&user, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(request))))
}

/// List requests, newest first, scoped to the viewer
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    params(RequestFilter),
    responses((status = 200, description = "Requests returned")),
    tag = "requests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<RequestFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = scope_filter(filter, &user)?;
    let requests = state.services.requests.list_requests(&filter).await?;
    Ok(Json(ApiResponse::success(requests)))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/{id}",
    responses(
        (status = 200, description = "Request found", body = StaffRequest),
        (status = 404, description = "Unknown request id", body = crate::errors::ErrorResponse)
    ),
    tag = "requests"
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let request = state.services.requests.get_request(&id).await?;
    if !user.has_capability(consts::REQUESTS_READ) && request.staff_id != user.id {
        return Err(ServiceError::Forbidden(
            "request belongs to another staff member".into(),
        ));
    }
    Ok(Json(ApiResponse::success(request)))
}

/// Approve or reject a pending request
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/decision",
    request_body = DecideRequestInput,
    responses(
        (status = 200, description = "Decision recorded", body = StaffRequest),
        (status = 400, description = "Rejection without a reason", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown request id", body = crate::errors::ErrorResponse),
        (status = 409, description = "Request already decided", body = crate::errors::ErrorResponse)
    ),
    tag = "requests"
)]
pub async fn decide_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
    Json(input): Json<DecideRequestInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let request = state
        .services
        .requests
        .decide_request(&id, input, &user)
        .await?;
    Ok(Json(ApiResponse::success(request)))
}

/// Resubmit a rejected request as a fresh pending one
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/resubmit",
    responses(
        (status = 201, description = "New pending request created", body = StaffRequest),
        (status = 400, description = "Request is not rejected", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown request id", body = crate::errors::ErrorResponse)
    ),
    tag = "requests"
)]
pub async fn resubmit_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let request = state.services.requests.resubmit(&id, &user).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(request))))
}

/// Export the viewer's request listing as CSV
#[utoipa::path(
    get,
    path = "/api/v1/requests/export",
    params(RequestFilter),
    responses((status = 200, description = "CSV document", content_type = "text/csv")),
    tag = "requests"
)]
pub async fn export_requests(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<RequestFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = scope_filter(filter, &user)?;
    let requests = state.services.requests.list_requests(&filter).await?;
    let csv = export::requests_to_csv(&requests);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"requests.csv\"",
            ),
        ],
        csv,
    ))
}
