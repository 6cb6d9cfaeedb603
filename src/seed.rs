//! Demo fleet data so a fresh instance is explorable immediately.
//!
//! Every seeded user logs in with the password `fleetparts-demo`. Seeded
//! ids (`USR-004`, `REQ-002`, `TXN-003`) advance the repository id
//! sequences, so newly created records never collide with the fixtures.

use crate::auth::AuthService;
use crate::errors::ServiceError;
use crate::models::{
    Part, RequestPriority, RequestStatus, Role, StaffRequest, StockSource, StockTransaction,
    TransactionStatus, TransactionType, User, UserStatus,
};
use crate::repositories::{
    PartRepository, RequestRepository, TransactionRepository, UserRepository,
};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::info;

pub const DEMO_PASSWORD: &str = "fleetparts-demo";

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn user(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    role: Role,
    department: &str,
    ship: &str,
    status: UserStatus,
    last_login: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        phone: phone.into(),
        role,
        department: department.into(),
        ship: ship.into(),
        status,
        last_login,
        created_at,
    }
}

#[allow(clippy::too_many_arguments)]
fn part(
    part_number: &str,
    name: &str,
    description: &str,
    category: &str,
    ship: &str,
    quantity: u32,
    min_quantity: u32,
    location: &str,
    supplier: &str,
    unit_price: Decimal,
    critical: bool,
) -> Part {
    Part {
        part_number: part_number.into(),
        name: name.into(),
        description: description.into(),
        category: category.into(),
        ship: ship.into(),
        quantity,
        min_quantity,
        location: location.into(),
        supplier: supplier.into(),
        unit_price,
        critical,
        last_updated: at(2024, 1, 15, 10, 0),
    }
}

/// Loads the demo fleet: five directory users, the catalog, sample
/// transaction history and two pending requests.
pub async fn load_demo_data(
    parts: &Arc<dyn PartRepository>,
    requests: &Arc<dyn RequestRepository>,
    transactions: &Arc<dyn TransactionRepository>,
    users: &Arc<dyn UserRepository>,
    auth: &AuthService,
) -> Result<(), ServiceError> {
    let directory = [
        user(
            "USR-001",
            "John Doe",
            "john.doe@fastcat.com",
            "+63 912 345 6789",
            Role::Admin,
            "Operations",
            "FastCat M1",
            UserStatus::Active,
            at(2024, 1, 17, 8, 30),
            at(2023, 6, 15, 10, 0),
        ),
        user(
            "USR-002",
            "Jane Smith",
            "jane.smith@fastcat.com",
            "+63 912 345 6790",
            Role::Manager,
            "Maintenance",
            "FastCat M2",
            UserStatus::Active,
            at(2024, 1, 17, 9, 15),
            at(2023, 7, 20, 14, 30),
        ),
        user(
            "USR-003",
            "Mike Johnson",
            "mike.johnson@fastcat.com",
            "+63 912 345 6791",
            Role::Staff,
            "Inventory",
            "FastCat M3",
            UserStatus::Active,
            at(2024, 1, 16, 16, 45),
            at(2023, 8, 10, 11, 20),
        ),
        user(
            "USR-004",
            "Sarah Wilson",
            "sarah.wilson@fastcat.com",
            "+63 912 345 6792",
            Role::Staff,
            "Operations",
            "FastCat M1",
            UserStatus::Inactive,
            at(2024, 1, 10, 12, 0),
            at(2023, 9, 5, 9, 45),
        ),
        user(
            "USR-005",
            "Tom Brown",
            "tom.brown@fastcat.com",
            "+63 912 345 6793",
            Role::Manager,
            "Engineering",
            "FastCat M2",
            UserStatus::Active,
            at(2024, 1, 17, 7, 20),
            at(2023, 10, 12, 13, 15),
        ),
    ];
    for u in directory {
        auth.register_credential(&u.email, DEMO_PASSWORD)?;
        users.insert(u).await?;
    }

    let catalog = [
        part(
            "EF-2024",
            "Engine Filter",
            "High-performance engine filter for marine diesel engines",
            "Engine",
            "FastCat M1",
            15,
            5,
            "A1-B2",
            "Marine Parts Co.",
            dec!(45.99),
            false,
        ),
        part(
            "NL-LED",
            "Navigation Light LED",
            "LED navigation light for marine vessels",
            "Electrical",
            "FastCat M3",
            8,
            3,
            "C3-D4",
            "Maritime Electrics Ltd.",
            dec!(89.50),
            false,
        ),
        part(
            "HP-150",
            "Hydraulic Pump",
            "Heavy-duty hydraulic pump for steering systems",
            "Hydraulic",
            "All Vessels",
            3,
            2,
            "E5-F6",
            "HydroMarine Supply",
            dec!(1250.00),
            true,
        ),
        part(
            "CB-12V",
            "Circuit Breaker 12V",
            "12V Circuit Breaker",
            "Electrical",
            "All Vessels",
            12,
            4,
            "G7-H8",
            "Maritime Electrics Ltd.",
            dec!(24.75),
            false,
        ),
        part(
            "FH-STD",
            "Fire Hose Standard",
            "Standard Fire Hose",
            "Safety",
            "All Vessels",
            6,
            2,
            "I9-J10",
            "SafeSea Equipment",
            dec!(156.00),
            true,
        ),
        part(
            "PV-25",
            "Pressure Valve 25mm",
            "25mm Pressure Valve",
            "Hydraulic",
            "FastCat M2",
            9,
            3,
            "K11-L12",
            "HydroMarine Supply",
            dec!(67.25),
            false,
        ),
        part(
            "ENG-001",
            "Engine Oil Filter",
            "Spin-on oil filter for main engines",
            "Engine",
            "FastCat M1",
            50,
            10,
            "A2-B1",
            "Marine Parts Co.",
            dec!(12.50),
            false,
        ),
    ];
    for p in catalog {
        parts.insert(p).await?;
    }

    let history = [
        StockTransaction {
            id: "TXN-001".into(),
            txn_type: TransactionType::StockIn,
            part_number: "ENG-001".into(),
            part_name: "Engine Oil Filter".into(),
            quantity: 50,
            ship: "FastCat M1".into(),
            performed_by_id: "USR-001".into(),
            performed_by: "John Doe".into(),
            timestamp: at(2024, 1, 15, 10, 30),
            status: TransactionStatus::Completed,
            source: Some(StockSource::Supplier),
            destination: None,
            notes: Some("Regular maintenance stock replenishment".into()),
            reference: None,
        },
        StockTransaction {
            id: "TXN-002".into(),
            txn_type: TransactionType::StockOut,
            part_number: "NL-LED".into(),
            part_name: "Navigation Light LED".into(),
            quantity: 2,
            ship: "FastCat M3".into(),
            performed_by_id: "USR-002".into(),
            performed_by: "Jane Smith".into(),
            timestamp: at(2024, 1, 15, 14, 45),
            status: TransactionStatus::Completed,
            source: None,
            destination: Some(crate::models::StockDestination::Maintenance),
            notes: Some("Emergency navigation light replacement".into()),
            reference: None,
        },
        StockTransaction {
            id: "TXN-003".into(),
            txn_type: TransactionType::StockIn,
            part_number: "HP-150".into(),
            part_name: "Hydraulic Pump".into(),
            quantity: 2,
            ship: "All Vessels".into(),
            performed_by_id: "USR-003".into(),
            performed_by: "Mike Johnson".into(),
            timestamp: at(2024, 1, 16, 9, 15),
            status: TransactionStatus::Pending,
            source: Some(StockSource::Supplier),
            destination: None,
            notes: Some("Scheduled delivery from supplier".into()),
            reference: None,
        },
    ];
    for t in history {
        transactions.insert(t).await?;
    }

    let queue = [
        StaffRequest {
            id: "REQ-001".into(),
            staff_id: "USR-003".into(),
            staff_name: "Mike Johnson".into(),
            part_number: "ENG-001".into(),
            part_name: "Engine Oil Filter".into(),
            quantity: 5,
            ship: "FastCat M1".into(),
            priority: RequestPriority::High,
            reason: "Emergency maintenance - oil leak detected".into(),
            notes: None,
            requested_at: at(2024, 1, 15, 10, 30),
            status: RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
        },
        StaffRequest {
            id: "REQ-002".into(),
            staff_id: "USR-004".into(),
            staff_name: "Sarah Wilson".into(),
            part_number: "CB-12V".into(),
            part_name: "Circuit Breaker 12V".into(),
            quantity: 2,
            ship: "FastCat M2".into(),
            priority: RequestPriority::Medium,
            reason: "Scheduled maintenance replacement".into(),
            notes: None,
            requested_at: at(2024, 1, 15, 14, 45),
            status: RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
        },
    ];
    for r in queue {
        requests.insert(r).await?;
    }

    info!("demo fleet data loaded");
    Ok(())
}
