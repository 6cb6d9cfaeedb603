use crate::errors::ServiceError;
use crate::{ApiResponse, AppState};
use axum::{extract::State, response::Json};
use serde_json::{json, Value};

/// Build/version status, independent of application state
pub async fn api_status() -> Result<Json<ApiResponse<Value>>, ServiceError> {
    let status = json!({
        "status": "ok",
        "service": "fleetparts-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    Ok(Json(ApiResponse::success(status)))
}

/// Liveness probe: reports the in-memory store sizes so a flat-lined
/// store after a seed run is visible at a glance.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, ServiceError> {
    let parts = state.services.catalog.list_low_stock().await.map(|p| p.len());
    let health = json!({
        "status": "healthy",
        "checks": {
            "store": if parts.is_ok() { "healthy" } else { "unhealthy" },
        },
        "low_stock_parts": parts.unwrap_or(0),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    Ok(Json(ApiResponse::success(health)))
}
