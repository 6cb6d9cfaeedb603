use crate::auth::{consts, AuthUser};
use crate::errors::ServiceError;
use crate::export;
use crate::models::{Part, StockTransaction};
use crate::services::stock::{StockCommitInput, TransactionFilter};
use crate::{ApiResponse, AppState};
use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;

/// Applies the viewer's transaction scope: full history for
/// `transactions.read`, own history for `transactions.read.own`.
fn scope_filter(mut filter: TransactionFilter, user: &AuthUser) -> Result<TransactionFilter, ServiceError> {
    if user.has_capability(consts::TRANSACTIONS_READ) {
        Ok(filter)
    } else if user.has_capability(consts::TRANSACTIONS_READ_OWN) {
        filter.performed_by_id = Some(user.id.clone());
        Ok(filter)
    } else {
        Err(ServiceError::Forbidden(format!(
            "role {} cannot read transactions",
            user.role
        )))
    }
}

/// Commit a stock in/out transaction against a catalog part
#[utoipa::path(
    post,
    path = "/api/v1/stock/transactions",
    request_body = StockCommitInput,
    responses(
        (status = 201, description = "Transaction committed", body = StockTransaction),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown part", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn commit_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<StockCommitInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let transaction = state
        .services
        .stock
        .commit_stock_transaction(input, &user)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(transaction))))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Scanned QR/barcode payload or manual entry
    pub code: String,
}

/// Resolve a scanned code to a catalog part for draft pre-selection
#[utoipa::path(
    post,
    path = "/api/v1/stock/scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Part matched", body = Part),
        (status = 404, description = "No part matches the code", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn resolve_scan(
    State(state): State<AppState>,
    Json(scan): Json<ScanRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let part = state
        .services
        .stock
        .resolve_scan_code(state.services.code_resolver.as_ref(), &scan.code)
        .await?;
    Ok(Json(ApiResponse::success(part)))
}

/// List stock transactions, newest first, scoped to the viewer
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    params(TransactionFilter),
    responses((status = 200, description = "Transactions returned")),
    tag = "stock"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<TransactionFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = scope_filter(filter, &user)?;
    let transactions = state.services.stock.list_transactions(&filter).await?;
    Ok(Json(ApiResponse::success(transactions)))
}

/// Export the viewer's transaction listing as CSV
#[utoipa::path(
    get,
    path = "/api/v1/transactions/export",
    params(TransactionFilter),
    responses((status = 200, description = "CSV document", content_type = "text/csv")),
    tag = "stock"
)]
pub async fn export_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<TransactionFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = scope_filter(filter, &user)?;
    let transactions = state.services.stock.list_transactions(&filter).await?;
    let csv = export::transactions_to_csv(&transactions);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv,
    ))
}
