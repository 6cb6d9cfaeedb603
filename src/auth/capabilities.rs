//! Role-to-capability table.
//!
//! A capability is a named permission checked before a mutating operation
//! executes. The table is flat: Admin matches everything, the other roles
//! require exact membership. Screens decide what to render from the same
//! names, but enforcement happens here, server-side.

use crate::models::Role;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

pub mod consts {
    pub const INVENTORY_READ: &str = "inventory.read";
    pub const INVENTORY_WRITE: &str = "inventory.write";
    pub const INVENTORY_DELETE: &str = "inventory.delete";
    pub const TRANSACTIONS_READ: &str = "transactions.read";
    pub const TRANSACTIONS_READ_OWN: &str = "transactions.read.own";
    pub const REQUESTS_CREATE: &str = "requests.create";
    pub const REQUESTS_READ: &str = "requests.read";
    pub const REQUESTS_READ_OWN: &str = "requests.read.own";
    pub const REQUESTS_DECIDE: &str = "requests.decide";
    pub const STAFF_MANAGE: &str = "staff.manage";
}

use consts::*;

lazy_static! {
    static ref ROLE_CAPABILITIES: HashMap<Role, HashSet<&'static str>> = {
        let mut table = HashMap::new();

        table.insert(
            Role::Manager,
            [
                INVENTORY_READ,
                INVENTORY_WRITE,
                INVENTORY_DELETE,
                TRANSACTIONS_READ,
                REQUESTS_READ,
                REQUESTS_DECIDE,
                STAFF_MANAGE,
            ]
            .into_iter()
            .collect(),
        );

        table.insert(
            Role::Staff,
            [
                INVENTORY_READ,
                REQUESTS_CREATE,
                REQUESTS_READ_OWN,
                TRANSACTIONS_READ_OWN,
            ]
            .into_iter()
            .collect(),
        );

        table
    };
}

/// Checks whether `role` holds `capability`. Admin matches any capability;
/// other roles require exact membership in their set. Unknown combinations
/// deny.
pub fn has_capability(role: Role, capability: &str) -> bool {
    if role == Role::Admin {
        return true;
    }
    ROLE_CAPABILITIES
        .get(&role)
        .map(|caps| caps.contains(capability))
        .unwrap_or(false)
}
