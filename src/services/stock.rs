//! Stock transaction workflow: two-direction quantity adjustments against
//! the catalog, with a scan-to-select shortcut.
//!
//! A draft lives client-side; cancelling is discarding it. `commit` is the
//! only entry point that mutates stock, and commits are serialized so a
//! reader immediately after a commit sees both the adjusted quantity and
//! the appended transaction record, never one without the other.

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{
    Part, StockDestination, StockSource, StockTransaction, TransactionStatus, TransactionType,
};
use crate::repositories::{PartRepository, TransactionRepository};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

/// Resolves a scanned QR/barcode payload to a catalog part.
///
/// How the code was obtained (camera, wedge scanner, manual entry) is the
/// caller's business; the workflow only needs the lookup.
#[async_trait]
pub trait CodeResolver: Send + Sync {
    async fn resolve(&self, code: &str) -> Result<Option<Part>, ServiceError>;
}

/// Default resolver: exact case-insensitive part-number match, falling back
/// to a substring match on the part name.
pub struct CatalogCodeResolver {
    parts: Arc<dyn PartRepository>,
}

impl CatalogCodeResolver {
    pub fn new(parts: Arc<dyn PartRepository>) -> Self {
        Self { parts }
    }
}

#[async_trait]
impl CodeResolver for CatalogCodeResolver {
    async fn resolve(&self, code: &str) -> Result<Option<Part>, ServiceError> {
        let needle = code.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }
        let parts = self.parts.list().await?;
        if let Some(exact) = parts
            .iter()
            .find(|p| p.part_number.to_lowercase() == needle)
        {
            return Ok(Some(exact.clone()));
        }
        Ok(parts
            .into_iter()
            .find(|p| p.name.to_lowercase().contains(&needle)))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockCommitInput {
    pub part_number: String,
    pub direction: TransactionType,
    pub quantity: u32,
    /// Required for Stock In
    pub source: Option<StockSource>,
    /// Required for Stock Out
    pub destination: Option<StockDestination>,
    pub notes: Option<String>,
    /// Client-generated idempotency key; a repeated commit with the same
    /// reference returns the original transaction without re-applying.
    pub reference: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TransactionFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub txn_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    /// Restrict to transactions performed by this user id (staff see their
    /// own). Keyed on the directory id, not the display name, so two users
    /// sharing a name never see each other's history.
    #[serde(skip)]
    pub performed_by_id: Option<String>,
}

/// Service for committing and listing stock transactions
#[derive(Clone)]
pub struct StockService {
    parts: Arc<dyn PartRepository>,
    transactions: Arc<dyn TransactionRepository>,
    event_sender: EventSender,
    // serializes commits: quantity adjustment + record append stay atomic
    // from the perspective of concurrent readers
    commit_lock: Arc<Mutex<()>>,
}

impl StockService {
    pub fn new(
        parts: Arc<dyn PartRepository>,
        transactions: Arc<dyn TransactionRepository>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            parts,
            transactions,
            event_sender,
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    fn validate(input: &StockCommitInput) -> Result<(), ServiceError> {
        if input.quantity == 0 {
            return Err(ServiceError::InvalidInput(
                "quantity must be greater than zero".into(),
            ));
        }
        match input.direction {
            TransactionType::StockIn if input.source.is_none() => Err(
                ServiceError::InvalidInput("source is required for stock in".into()),
            ),
            TransactionType::StockOut if input.destination.is_none() => Err(
                ServiceError::InvalidInput("destination is required for stock out".into()),
            ),
            _ => Ok(()),
        }
    }

    /// Commits a stock transaction: adjusts the part quantity and appends a
    /// Completed transaction record. A failed commit leaves no trace.
    #[instrument(skip(self, input, acting_user), fields(part = %input.part_number, user = %acting_user.id))]
    pub async fn commit_stock_transaction(
        &self,
        input: StockCommitInput,
        acting_user: &AuthUser,
    ) -> Result<StockTransaction, ServiceError> {
        Self::validate(&input)?;

        let _guard = self.commit_lock.lock().await;

        if let Some(reference) = input.reference.as_deref() {
            if let Some(existing) = self.transactions.find_by_reference(reference).await? {
                info!(reference, id = %existing.id, "duplicate commit reference, returning original");
                return Ok(existing);
            }
        }

        let part = self
            .parts
            .find(&input.part_number)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Part {} not found", input.part_number))
            })?;

        let delta = match input.direction {
            TransactionType::StockIn => i64::from(input.quantity),
            TransactionType::StockOut => -i64::from(input.quantity),
        };
        let old_quantity = part.quantity;
        let adjusted = self.parts.adjust_quantity(&part.part_number, delta).await?;

        let transaction = StockTransaction {
            id: self.transactions.next_id(),
            txn_type: input.direction,
            part_number: part.part_number.clone(),
            part_name: part.name.clone(),
            quantity: input.quantity,
            ship: part.ship.clone(),
            performed_by_id: acting_user.id.clone(),
            performed_by: acting_user.name.clone(),
            timestamp: Utc::now(),
            status: TransactionStatus::Completed,
            source: input.source,
            destination: input.destination,
            notes: input.notes,
            reference: input.reference,
        };
        let transaction = self.transactions.insert(transaction).await?;

        info!(
            id = %transaction.id,
            old_quantity,
            new_quantity = adjusted.quantity,
            "stock transaction committed"
        );
        self.event_sender
            .send(Event::StockCommitted {
                transaction_id: transaction.id.clone(),
                part_number: part.part_number.clone(),
                txn_type: transaction.txn_type,
                quantity: transaction.quantity,
                old_quantity,
                new_quantity: adjusted.quantity,
            })
            .await;
        if adjusted.is_low_stock() {
            self.event_sender
                .send(Event::LowStockDetected {
                    part_number: adjusted.part_number.clone(),
                    quantity: adjusted.quantity,
                    min_quantity: adjusted.min_quantity,
                })
                .await;
        }

        Ok(transaction)
    }

    /// Scan-assist lookup used to pre-select a part in a draft. Never
    /// bypasses commit validation.
    #[instrument(skip(self, resolver))]
    pub async fn resolve_scan_code(
        &self,
        resolver: &dyn CodeResolver,
        code: &str,
    ) -> Result<Part, ServiceError> {
        resolver
            .resolve(code)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no part matches code {code}")))
    }

    /// Lists transactions newest-first, filtered by substring search across
    /// id, part name/number, ship and acting user, then by exact type/status.
    #[instrument(skip(self))]
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<StockTransaction>, ServiceError> {
        let mut transactions = self.transactions.list().await?;

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            transactions.retain(|t| {
                t.id.to_lowercase().contains(&needle)
                    || t.part_name.to_lowercase().contains(&needle)
                    || t.part_number.to_lowercase().contains(&needle)
                    || t.ship.to_lowercase().contains(&needle)
                    || t.performed_by.to_lowercase().contains(&needle)
            });
        }
        if let Some(txn_type) = filter.txn_type {
            transactions.retain(|t| t.txn_type == txn_type);
        }
        if let Some(status) = filter.status {
            transactions.retain(|t| t.status == status);
        }
        if let Some(performed_by_id) = filter.performed_by_id.as_deref() {
            transactions.retain(|t| t.performed_by_id == performed_by_id);
        }

        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(transactions)
    }
}
