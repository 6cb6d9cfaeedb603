use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stocked physical item tracked by number, quantity and location.
///
/// The part number is the identity; it is unique across the catalog and
/// referenced by stock transactions and staff requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Part {
    /// Unique part number, e.g. "EF-2024"
    pub part_number: String,
    pub name: String,
    pub description: String,
    /// Free-form category tag, e.g. "Engine", "Electrical"
    pub category: String,
    /// Assigned vessel, or "All Vessels"
    pub ship: String,
    pub quantity: u32,
    pub min_quantity: u32,
    /// Storage location code, e.g. "A1-B2"
    pub location: String,
    pub supplier: String,
    pub unit_price: Decimal,
    /// Caller-assigned flag; independent of the low-stock check
    #[serde(default)]
    pub critical: bool,
    pub last_updated: DateTime<Utc>,
}

impl Part {
    /// A part is low on stock when quantity is at or below the minimum threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}
