//! FleetParts API Library
//!
//! Ship-parts inventory tracking for a ferry fleet: part catalog, stock
//! in/out transactions, staff part requests with manager approval, and a
//! user directory with role-scoped capabilities.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod errors;
pub mod events;
pub mod export;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod seed;
pub mod services;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::consts as cap;
use crate::auth::AuthRouterExt;

/// Shared application state threaded through every handler
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Standard success envelope for JSON responses
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// The full `/api/v1` tree, one sub-router per capability.
///
/// Listing routes for transactions and requests carry auth only; the
/// handler narrows the result to the viewer's own records unless the role
/// holds the full read capability.
pub fn api_v1_routes() -> Router<AppState> {
    let parts_read = Router::new()
        .route("/parts", get(handlers::parts::list_parts))
        .route("/parts/low-stock", get(handlers::parts::list_low_stock))
        .route("/parts/:part_number", get(handlers::parts::get_part))
        .with_capability(cap::INVENTORY_READ);

    let parts_write = Router::new()
        .route("/parts", post(handlers::parts::create_part))
        .route("/parts/:part_number", put(handlers::parts::update_part))
        .with_capability(cap::INVENTORY_WRITE);

    let parts_delete = Router::new()
        .route("/parts/:part_number", delete(handlers::parts::delete_part))
        .with_capability(cap::INVENTORY_DELETE);

    // stock commits are inventory mutations
    let stock_write = Router::new()
        .route(
            "/stock/transactions",
            post(handlers::stock::commit_transaction),
        )
        .route("/stock/scan", post(handlers::stock::resolve_scan))
        .with_capability(cap::INVENTORY_WRITE);

    let transactions_read = Router::new()
        .route("/transactions", get(handlers::stock::list_transactions))
        .route(
            "/transactions/export",
            get(handlers::stock::export_transactions),
        )
        .with_auth();

    let requests_create = Router::new()
        .route("/requests", post(handlers::requests::submit_request))
        .route(
            "/requests/:id/resubmit",
            post(handlers::requests::resubmit_request),
        )
        .with_capability(cap::REQUESTS_CREATE);

    let requests_read = Router::new()
        .route("/requests", get(handlers::requests::list_requests))
        .route("/requests/export", get(handlers::requests::export_requests))
        .route("/requests/:id", get(handlers::requests::get_request))
        .with_auth();

    let requests_decide = Router::new()
        .route(
            "/requests/:id/decision",
            post(handlers::requests::decide_request),
        )
        .with_capability(cap::REQUESTS_DECIDE);

    let staff_manage = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route("/users", post(handlers::users::create_user))
        .route("/users/:id", get(handlers::users::get_user))
        .route("/users/:id", put(handlers::users::update_user))
        .route(
            "/users/:id/deactivate",
            post(handlers::users::deactivate_user),
        )
        .with_capability(cap::STAFF_MANAGE);

    Router::new()
        .route("/status", get(handlers::health::api_status))
        .route("/health", get(handlers::health::health_check))
        .merge(parts_read)
        .merge(parts_write)
        .merge(parts_delete)
        .merge(stock_write)
        .merge(transactions_read)
        .merge(requests_create)
        .merge(requests_read)
        .merge(requests_decide)
        .merge(staff_manage)
}
