use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum TransactionType {
    #[serde(rename = "Stock In")]
    #[strum(serialize = "Stock In")]
    StockIn,
    #[serde(rename = "Stock Out")]
    #[strum(serialize = "Stock Out")]
    StockOut,
}

/// Status of a stock movement. Distinct from [`super::RequestStatus`]:
/// approvals belong to the request workflow, not to stock movements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

/// Where stock came from on a Stock In.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum StockSource {
    Supplier,
    Transfer,
    Return,
    Other,
}

/// Where stock went on a Stock Out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum StockDestination {
    Maintenance,
    Repair,
    Transfer,
    Disposal,
    Other,
}

/// A quantity-adjusting event against a part.
///
/// The quantity is stored unsigned; the sign is applied at presentation
/// time via [`StockTransaction::signed_quantity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockTransaction {
    /// Transaction id, e.g. "TXN-001"
    pub id: String,
    #[serde(rename = "type")]
    pub txn_type: TransactionType,
    pub part_number: String,
    /// Part name cached at commit time
    pub part_name: String,
    pub quantity: u32,
    pub ship: String,
    /// Directory id of the acting user; own-record scoping keys on this
    pub performed_by_id: String,
    /// Display name cached at commit time
    pub performed_by: String,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<StockSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<StockDestination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Client-generated idempotency key, if the caller supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl StockTransaction {
    /// Display quantity: positive for Stock In, negative for Stock Out.
    pub fn signed_quantity(&self) -> i64 {
        match self.txn_type {
            TransactionType::StockIn => i64::from(self.quantity),
            TransactionType::StockOut => -i64::from(self.quantity),
        }
    }
}
