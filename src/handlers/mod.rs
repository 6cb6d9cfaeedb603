//! HTTP handlers: thin translation between the wire and the workflow
//! services. No business logic lives here; every mutation routes through a
//! service and every route carries its capability gate in `api_v1_routes`.

pub mod health;
pub mod parts;
pub mod requests;
pub mod stock;
pub mod users;

use crate::events::EventSender;
use crate::repositories::{
    PartRepository, RequestRepository, TransactionRepository, UserRepository,
};
use crate::services::{
    catalog::CatalogService, requests::RequestService, stock::StockService, users::UserService,
};
use crate::services::stock::{CatalogCodeResolver, CodeResolver};
use std::sync::Arc;

/// Aggregated services shared through the app state.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
    pub stock: StockService,
    pub requests: RequestService,
    pub users: UserService,
    pub code_resolver: Arc<dyn CodeResolver>,
}

impl AppServices {
    pub fn new(
        parts: Arc<dyn PartRepository>,
        requests: Arc<dyn RequestRepository>,
        transactions: Arc<dyn TransactionRepository>,
        users: Arc<dyn UserRepository>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            catalog: CatalogService::new(parts.clone(), event_sender.clone()),
            stock: StockService::new(parts.clone(), transactions, event_sender.clone()),
            requests: RequestService::new(requests, parts.clone(), event_sender.clone()),
            users: UserService::new(users, event_sender),
            code_resolver: Arc::new(CatalogCodeResolver::new(parts)),
        }
    }
}
