//! In-memory repository implementations.
//!
//! Collections live in `RwLock<Vec<_>>` so listings keep stable insertion
//! order. Id sequences are monotonic counters; seeding with explicit ids
//! (e.g. "REQ-002") advances the counter past the numeric suffix so issued
//! ids never collide with seeded ones.

use super::{PartRepository, RequestRepository, TransactionRepository, UserRepository};
use crate::errors::ServiceError;
use crate::models::{Part, StaffRequest, StockTransaction, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

fn lock_poisoned() -> ServiceError {
    ServiceError::InternalError("repository lock poisoned".into())
}

/// Extracts the numeric suffix of ids shaped like "REQ-001".
fn id_sequence(id: &str) -> Option<u64> {
    id.rsplit('-').next().and_then(|s| s.parse().ok())
}

struct IdSequence {
    prefix: &'static str,
    counter: AtomicU64,
}

impl IdSequence {
    fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            counter: AtomicU64::new(0),
        }
    }

    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{:03}", self.prefix, n)
    }

    /// Keeps the counter ahead of an externally supplied id.
    fn observe(&self, id: &str) {
        if let Some(n) = id_sequence(id) {
            self.counter.fetch_max(n, Ordering::SeqCst);
        }
    }
}

#[derive(Default)]
pub struct InMemoryPartRepository {
    parts: RwLock<Vec<Part>>,
}

#[async_trait]
impl PartRepository for InMemoryPartRepository {
    async fn list(&self) -> Result<Vec<Part>, ServiceError> {
        Ok(self.parts.read().map_err(|_| lock_poisoned())?.clone())
    }

    async fn find(&self, part_number: &str) -> Result<Option<Part>, ServiceError> {
        Ok(self
            .parts
            .read()
            .map_err(|_| lock_poisoned())?
            .iter()
            .find(|p| p.part_number == part_number)
            .cloned())
    }

    async fn insert(&self, part: Part) -> Result<Part, ServiceError> {
        let mut parts = self.parts.write().map_err(|_| lock_poisoned())?;
        if parts.iter().any(|p| p.part_number == part.part_number) {
            return Err(ServiceError::DuplicatePartNumber(part.part_number));
        }
        parts.push(part.clone());
        Ok(part)
    }

    async fn update(&self, part: Part) -> Result<Part, ServiceError> {
        let mut parts = self.parts.write().map_err(|_| lock_poisoned())?;
        let slot = parts
            .iter_mut()
            .find(|p| p.part_number == part.part_number)
            .ok_or_else(|| ServiceError::NotFound(format!("Part {} not found", part.part_number)))?;
        *slot = part.clone();
        Ok(part)
    }

    async fn delete(&self, part_number: &str) -> Result<(), ServiceError> {
        let mut parts = self.parts.write().map_err(|_| lock_poisoned())?;
        let before = parts.len();
        parts.retain(|p| p.part_number != part_number);
        if parts.len() == before {
            return Err(ServiceError::NotFound(format!(
                "Part {part_number} not found"
            )));
        }
        Ok(())
    }

    async fn adjust_quantity(
        &self,
        part_number: &str,
        delta: i64,
    ) -> Result<Part, ServiceError> {
        let mut parts = self.parts.write().map_err(|_| lock_poisoned())?;
        let part = parts
            .iter_mut()
            .find(|p| p.part_number == part_number)
            .ok_or_else(|| ServiceError::NotFound(format!("Part {part_number} not found")))?;

        let adjusted = i64::from(part.quantity) + delta;
        if adjusted < 0 {
            return Err(ServiceError::InsufficientStock(format!(
                "part {}: requested {}, have {}",
                part_number,
                delta.unsigned_abs(),
                part.quantity
            )));
        }
        // failed adjustments must leave the part untouched, so the bounds
        // check happens before any write
        part.quantity = u32::try_from(adjusted).map_err(|_| {
            ServiceError::InvalidInput(format!(
                "part {part_number}: adjustment overflows the stock counter"
            ))
        })?;
        part.last_updated = Utc::now();
        Ok(part.clone())
    }
}

pub struct InMemoryRequestRepository {
    requests: RwLock<Vec<StaffRequest>>,
    seq: IdSequence,
}

impl Default for InMemoryRequestRepository {
    fn default() -> Self {
        Self {
            requests: RwLock::new(Vec::new()),
            seq: IdSequence::new("REQ"),
        }
    }
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    fn next_id(&self) -> String {
        self.seq.next()
    }

    async fn list(&self) -> Result<Vec<StaffRequest>, ServiceError> {
        Ok(self.requests.read().map_err(|_| lock_poisoned())?.clone())
    }

    async fn find(&self, id: &str) -> Result<Option<StaffRequest>, ServiceError> {
        Ok(self
            .requests
            .read()
            .map_err(|_| lock_poisoned())?
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn insert(&self, request: StaffRequest) -> Result<StaffRequest, ServiceError> {
        let mut requests = self.requests.write().map_err(|_| lock_poisoned())?;
        if requests.iter().any(|r| r.id == request.id) {
            return Err(ServiceError::InvalidInput(format!(
                "request id {} already exists",
                request.id
            )));
        }
        self.seq.observe(&request.id);
        requests.push(request.clone());
        Ok(request)
    }

    async fn update(&self, request: StaffRequest) -> Result<StaffRequest, ServiceError> {
        let mut requests = self.requests.write().map_err(|_| lock_poisoned())?;
        let slot = requests
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or_else(|| ServiceError::NotFound(format!("Request {} not found", request.id)))?;
        *slot = request.clone();
        Ok(request)
    }
}

pub struct InMemoryTransactionRepository {
    transactions: RwLock<Vec<StockTransaction>>,
    seq: IdSequence,
}

impl Default for InMemoryTransactionRepository {
    fn default() -> Self {
        Self {
            transactions: RwLock::new(Vec::new()),
            seq: IdSequence::new("TXN"),
        }
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    fn next_id(&self) -> String {
        self.seq.next()
    }

    async fn list(&self) -> Result<Vec<StockTransaction>, ServiceError> {
        Ok(self
            .transactions
            .read()
            .map_err(|_| lock_poisoned())?
            .clone())
    }

    async fn find(&self, id: &str) -> Result<Option<StockTransaction>, ServiceError> {
        Ok(self
            .transactions
            .read()
            .map_err(|_| lock_poisoned())?
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<StockTransaction>, ServiceError> {
        Ok(self
            .transactions
            .read()
            .map_err(|_| lock_poisoned())?
            .iter()
            .find(|t| t.reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn insert(
        &self,
        transaction: StockTransaction,
    ) -> Result<StockTransaction, ServiceError> {
        let mut transactions = self.transactions.write().map_err(|_| lock_poisoned())?;
        self.seq.observe(&transaction.id);
        transactions.push(transaction.clone());
        Ok(transaction)
    }
}

pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
    seq: IdSequence,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            seq: IdSequence::new("USR"),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    fn next_id(&self) -> String {
        self.seq.next()
    }

    async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.read().map_err(|_| lock_poisoned())?.clone())
    }

    async fn find(&self, id: &str) -> Result<Option<User>, ServiceError> {
        Ok(self
            .users
            .read()
            .map_err(|_| lock_poisoned())?
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        Ok(self
            .users
            .read()
            .map_err(|_| lock_poisoned())?
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User, ServiceError> {
        let mut users = self.users.write().map_err(|_| lock_poisoned())?;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(ServiceError::InvalidInput(format!(
                "email {} already registered",
                user.email
            )));
        }
        self.seq.observe(&user.id);
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, ServiceError> {
        let mut users = self.users.write().map_err(|_| lock_poisoned())?;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user.id)))?;
        *slot = user.clone();
        Ok(user)
    }

    async fn touch_last_login(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<User, ServiceError> {
        let mut users = self.users.write().map_err(|_| lock_poisoned())?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("User {id} not found")))?;
        user.last_login = at;
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn part(number: &str, quantity: u32) -> Part {
        Part {
            part_number: number.into(),
            name: "Engine Filter".into(),
            description: "filter".into(),
            category: "Engine".into(),
            ship: "FastCat M1".into(),
            quantity,
            min_quantity: 5,
            location: "A1-B2".into(),
            supplier: "Marine Parts Co.".into(),
            unit_price: dec!(45.99),
            critical: false,
            last_updated: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_part_number() {
        let repo = InMemoryPartRepository::default();
        repo.insert(part("EF-2024", 15)).await.unwrap();
        assert_matches!(
            repo.insert(part("EF-2024", 3)).await,
            Err(ServiceError::DuplicatePartNumber(_))
        );
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let repo = InMemoryPartRepository::default();
        for number in ["EF-2024", "NL-LED", "HP-150"] {
            repo.insert(part(number, 1)).await.unwrap();
        }
        let numbers: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.part_number)
            .collect();
        assert_eq!(numbers, ["EF-2024", "NL-LED", "HP-150"]);
    }

    #[tokio::test]
    async fn adjust_quantity_refuses_to_go_negative() {
        let repo = InMemoryPartRepository::default();
        repo.insert(part("EF-2024", 15)).await.unwrap();

        assert_matches!(
            repo.adjust_quantity("EF-2024", -20).await,
            Err(ServiceError::InsufficientStock(_))
        );
        // failed adjustment leaves the quantity untouched
        assert_eq!(repo.find("EF-2024").await.unwrap().unwrap().quantity, 15);

        let adjusted = repo.adjust_quantity("EF-2024", -5).await.unwrap();
        assert_eq!(adjusted.quantity, 10);
    }

    #[tokio::test]
    async fn adjust_quantity_rejects_overflow_past_counter_range() {
        let repo = InMemoryPartRepository::default();
        repo.insert(part("EF-2024", u32::MAX - 5)).await.unwrap();

        assert_matches!(
            repo.adjust_quantity("EF-2024", 10).await,
            Err(ServiceError::InvalidInput(_))
        );
        // failed adjustment leaves the quantity untouched
        assert_eq!(
            repo.find("EF-2024").await.unwrap().unwrap().quantity,
            u32::MAX - 5
        );

        let adjusted = repo.adjust_quantity("EF-2024", 5).await.unwrap();
        assert_eq!(adjusted.quantity, u32::MAX);
    }

    #[tokio::test]
    async fn id_sequence_skips_past_seeded_ids() {
        let repo = InMemoryRequestRepository::default();
        let mut seeded = sample_request("REQ-002");
        seeded.id = "REQ-002".into();
        repo.insert(seeded).await.unwrap();
        assert_eq!(repo.next_id(), "REQ-003");
    }

    fn sample_request(id: &str) -> StaffRequest {
        StaffRequest {
            id: id.into(),
            staff_id: "USR-003".into(),
            staff_name: "Mike Johnson".into(),
            part_number: "EF-2024".into(),
            part_name: "Engine Filter".into(),
            quantity: 5,
            ship: "FastCat M1".into(),
            priority: crate::models::RequestPriority::High,
            reason: "Emergency maintenance".into(),
            notes: None,
            requested_at: Utc::now(),
            status: crate::models::RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
        }
    }

    #[tokio::test]
    async fn user_insert_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::default();
        let user = User {
            id: "USR-001".into(),
            name: "John Doe".into(),
            email: "john.doe@fastcat.com".into(),
            phone: "+63 912 345 6789".into(),
            role: crate::models::Role::Admin,
            department: "Operations".into(),
            ship: "FastCat M1".into(),
            status: crate::models::UserStatus::Active,
            last_login: Utc::now(),
            created_at: Utc::now(),
        };
        repo.insert(user.clone()).await.unwrap();

        let mut dup = user;
        dup.id = "USR-002".into();
        dup.email = "John.Doe@fastcat.com".into();
        assert_matches!(repo.insert(dup).await, Err(ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn transaction_reference_lookup() {
        let repo = InMemoryTransactionRepository::default();
        let txn = StockTransaction {
            id: repo.next_id(),
            txn_type: crate::models::TransactionType::StockIn,
            part_number: "EF-2024".into(),
            part_name: "Engine Filter".into(),
            quantity: 5,
            ship: "FastCat M1".into(),
            performed_by_id: "USR-001".into(),
            performed_by: "John Doe".into(),
            timestamp: Utc::now(),
            status: crate::models::TransactionStatus::Completed,
            source: Some(crate::models::StockSource::Supplier),
            destination: None,
            notes: None,
            reference: Some("client-key-1".into()),
        };
        repo.insert(txn.clone()).await.unwrap();
        let found = repo.find_by_reference("client-key-1").await.unwrap();
        assert_eq!(found.map(|t| t.id), Some(txn.id));
        assert!(repo.find_by_reference("other").await.unwrap().is_none());
    }
}
