use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Status of a staff part request.
///
/// Transitions are one-way and terminal: Pending -> Approved or
/// Pending -> Rejected. Kept distinct from [`super::TransactionStatus`];
/// the two lifecycles share no states.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum RequestPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// A staff-initiated ask for parts, requiring a manager decision.
///
/// Requests are append-only history: a rejected request is never mutated
/// back to Pending, resubmission creates a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StaffRequest {
    /// Request id, e.g. "REQ-001"
    pub id: String,
    pub staff_id: String,
    pub staff_name: String,
    pub part_number: String,
    /// Part name cached at submission time
    pub part_name: String,
    pub quantity: u32,
    pub ship: String,
    pub priority: RequestPriority,
    pub reason: String,
    /// Manager decision notes; required for rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl StaffRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn priority_parses_from_display_form() {
        assert_eq!(
            RequestPriority::from_str("High").unwrap(),
            RequestPriority::High
        );
        assert_eq!(RequestStatus::Pending.to_string(), "Pending");
        assert!(RequestPriority::from_str("urgent").is_err());
    }
}
