//! Storage seams for the workflow core.
//!
//! Services depend only on these traits. The in-memory implementations in
//! [`memory`] back the running service today; a persistent store slots in
//! behind the same traits without touching workflow code.

pub mod memory;

use crate::errors::ServiceError;
use crate::models::{Part, StaffRequest, StockTransaction, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait PartRepository: Send + Sync {
    /// All parts in stable insertion order.
    async fn list(&self) -> Result<Vec<Part>, ServiceError>;

    async fn find(&self, part_number: &str) -> Result<Option<Part>, ServiceError>;

    /// Inserts a new part; fails with `DuplicatePartNumber` when the part
    /// number is already taken.
    async fn insert(&self, part: Part) -> Result<Part, ServiceError>;

    /// Replaces an existing part record; fails with `NotFound`.
    async fn update(&self, part: Part) -> Result<Part, ServiceError>;

    async fn delete(&self, part_number: &str) -> Result<(), ServiceError>;

    /// Applies a signed quantity delta. Fails with `InsufficientStock` when
    /// the delta would drive the quantity negative, leaving the part
    /// untouched. The check and the write happen under one lock.
    async fn adjust_quantity(&self, part_number: &str, delta: i64)
        -> Result<Part, ServiceError>;
}

#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Issues the next request id, e.g. "REQ-003".
    fn next_id(&self) -> String;

    async fn list(&self) -> Result<Vec<StaffRequest>, ServiceError>;

    async fn find(&self, id: &str) -> Result<Option<StaffRequest>, ServiceError>;

    async fn insert(&self, request: StaffRequest) -> Result<StaffRequest, ServiceError>;

    /// Replaces an existing request record; fails with `NotFound`.
    /// Requests are never deleted, history is append-only.
    async fn update(&self, request: StaffRequest) -> Result<StaffRequest, ServiceError>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Issues the next transaction id, e.g. "TXN-004".
    fn next_id(&self) -> String;

    async fn list(&self) -> Result<Vec<StockTransaction>, ServiceError>;

    async fn find(&self, id: &str) -> Result<Option<StockTransaction>, ServiceError>;

    /// Finds a committed transaction by its client idempotency key.
    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<StockTransaction>, ServiceError>;

    async fn insert(
        &self,
        transaction: StockTransaction,
    ) -> Result<StockTransaction, ServiceError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Issues the next user id, e.g. "USR-006".
    fn next_id(&self) -> String;

    async fn list(&self) -> Result<Vec<User>, ServiceError>;

    async fn find(&self, id: &str) -> Result<Option<User>, ServiceError>;

    /// Case-insensitive email lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;

    /// Inserts a new directory entry; fails with `InvalidInput` on a
    /// duplicate email.
    async fn insert(&self, user: User) -> Result<User, ServiceError>;

    /// Replaces an existing directory entry; fails with `NotFound`.
    async fn update(&self, user: User) -> Result<User, ServiceError>;

    async fn touch_last_login(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<User, ServiceError>;
}
