use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Flat role enum; the sole axis controlling a user's capability set.
/// There are no per-user permission overrides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum UserStatus {
    Active,
    Inactive,
}

/// A directory entry for a crew member or shore-side staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// User id, e.g. "USR-001"
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub department: String,
    /// Assigned vessel
    pub ship: String,
    pub status: UserStatus,
    pub last_login: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}
