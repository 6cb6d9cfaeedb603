mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{read_json, TestApp};

#[tokio::test]
async fn insufficient_stock_leaves_no_trace() {
    let app = TestApp::new().await;
    let manager = app.login("jane.smith@fastcat.com").await;

    // EF-2024 is seeded with 15 on hand
    let response = app
        .request(
            Method::POST,
            "/api/v1/stock/transactions",
            Some(json!({
                "part_number": "EF-2024",
                "direction": "Stock Out",
                "quantity": 20,
                "destination": "Maintenance",
            })),
            Some(&manager),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .request(Method::GET, "/api/v1/parts/EF-2024", None, Some(&manager))
        .await;
    let body = read_json(response).await;
    assert_eq!(body["data"]["quantity"], 15);

    // drawing down to the threshold succeeds
    let response = app
        .request(
            Method::POST,
            "/api/v1/stock/transactions",
            Some(json!({
                "part_number": "EF-2024",
                "direction": "Stock Out",
                "quantity": 10,
                "destination": "Maintenance",
                "notes": "engine room overhaul",
            })),
            Some(&manager),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(Method::GET, "/api/v1/parts/EF-2024", None, Some(&manager))
        .await;
    let body = read_json(response).await;
    assert_eq!(body["data"]["quantity"], 5);

    let response = app
        .request(
            Method::GET,
            "/api/v1/parts/low-stock",
            None,
            Some(&manager),
        )
        .await;
    let body = read_json(response).await;
    let numbers: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["part_number"].as_str().unwrap().to_string())
        .collect();
    assert!(numbers.contains(&"EF-2024".to_string()));
}

#[tokio::test]
async fn repeated_reference_returns_the_original_commit() {
    let app = TestApp::new().await;
    let manager = app.login("jane.smith@fastcat.com").await;

    let commit = json!({
        "part_number": "CB-12V",
        "direction": "Stock Out",
        "quantity": 4,
        "destination": "Repair",
        "reference": "work-order-7781",
    });

    let response = app
        .request(
            Method::POST,
            "/api/v1/stock/transactions",
            Some(commit.clone()),
            Some(&manager),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = read_json(response).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/stock/transactions",
            Some(commit),
            Some(&manager),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let second = read_json(response).await;
    assert_eq!(first["data"]["id"], second["data"]["id"]);

    // applied exactly once: 12 - 4
    let response = app
        .request(Method::GET, "/api/v1/parts/CB-12V", None, Some(&manager))
        .await;
    let body = read_json(response).await;
    assert_eq!(body["data"]["quantity"], 8);
}

#[tokio::test]
async fn scan_resolves_part_number_and_name_fragments() {
    let app = TestApp::new().await;
    let manager = app.login("jane.smith@fastcat.com").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/stock/scan",
            Some(json!({ "code": "hp-150" })),
            Some(&manager),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["part_number"], "HP-150");

    let response = app
        .request(
            Method::POST,
            "/api/v1/stock/scan",
            Some(json!({ "code": "fire hose" })),
            Some(&manager),
        )
        .await;
    let body = read_json(response).await;
    assert_eq!(body["data"]["part_number"], "FH-STD");

    let response = app
        .request(
            Method::POST,
            "/api/v1/stock/scan",
            Some(json!({ "code": "no-such-code" })),
            Some(&manager),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_endpoint_fields_are_rejected() {
    let app = TestApp::new().await;
    let manager = app.login("jane.smith@fastcat.com").await;

    // stock in without a source
    let response = app
        .request(
            Method::POST,
            "/api/v1/stock/transactions",
            Some(json!({
                "part_number": "EF-2024",
                "direction": "Stock In",
                "quantity": 5,
            })),
            Some(&manager),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // zero quantity
    let response = app
        .request(
            Method::POST,
            "/api/v1/stock/transactions",
            Some(json!({
                "part_number": "EF-2024",
                "direction": "Stock In",
                "quantity": 0,
                "source": "Supplier",
            })),
            Some(&manager),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

mod quantity_arithmetic {
    use fleetparts_api::auth::AuthUser;
    use fleetparts_api::events::EventSender;
    use fleetparts_api::models::{
        Part, Role, StockDestination, StockSource, TransactionType,
    };
    use fleetparts_api::repositories::memory::{
        InMemoryPartRepository, InMemoryTransactionRepository,
    };
    use fleetparts_api::repositories::PartRepository;
    use fleetparts_api::services::stock::{StockCommitInput, StockService};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    enum Move {
        In(u32),
        Out(u32),
    }

    fn moves() -> impl Strategy<Value = Vec<Move>> {
        prop::collection::vec(
            prop_oneof![
                (1u32..50).prop_map(Move::In),
                (1u32..50).prop_map(Move::Out),
            ],
            1..20,
        )
    }

    proptest! {
        /// Applying any sequence of in/out commits keeps the on-hand
        /// quantity equal to the initial stock plus the signed sum of the
        /// commits that succeeded, and never below zero.
        #[test]
        fn committed_moves_balance(initial in 0u32..100, seq in moves()) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let parts = Arc::new(InMemoryPartRepository::default());
                parts
                    .insert(Part {
                        part_number: "EF-2024".into(),
                        name: "Engine Filter".into(),
                        description: "filter".into(),
                        category: "Engine".into(),
                        ship: "FastCat M1".into(),
                        quantity: initial,
                        min_quantity: 5,
                        location: "A1-B2".into(),
                        supplier: "Marine Parts Co.".into(),
                        unit_price: dec!(45.99),
                        critical: false,
                        last_updated: chrono::Utc::now(),
                    })
                    .await
                    .unwrap();

                let (tx, _rx) = tokio::sync::mpsc::channel(256);
                let stock = StockService::new(
                    parts.clone(),
                    Arc::new(InMemoryTransactionRepository::default()),
                    EventSender::new(tx),
                );
                let user = AuthUser {
                    id: "USR-002".into(),
                    name: "Jane Smith".into(),
                    role: Role::Manager,
                };

                let mut expected = i64::from(initial);
                for mv in seq {
                    let (direction, quantity, source, destination) = match mv {
                        Move::In(q) => (
                            TransactionType::StockIn,
                            q,
                            Some(StockSource::Supplier),
                            None,
                        ),
                        Move::Out(q) => (
                            TransactionType::StockOut,
                            q,
                            None,
                            Some(StockDestination::Maintenance),
                        ),
                    };
                    let result = stock
                        .commit_stock_transaction(
                            StockCommitInput {
                                part_number: "EF-2024".into(),
                                direction,
                                quantity,
                                source,
                                destination,
                                notes: None,
                                reference: None,
                            },
                            &user,
                        )
                        .await;

                    let delta = match direction {
                        TransactionType::StockIn => i64::from(quantity),
                        TransactionType::StockOut => -i64::from(quantity),
                    };
                    if expected + delta < 0 {
                        prop_assert!(result.is_err(), "overdraw must fail");
                    } else {
                        prop_assert!(result.is_ok(), "in-bounds commit must succeed");
                        expected += delta;
                    }
                }

                let part = parts.find("EF-2024").await.unwrap().unwrap();
                prop_assert_eq!(i64::from(part.quantity), expected);
                prop_assert!(expected >= 0);
                Ok(())
            })?;
        }
    }
}
