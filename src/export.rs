//! CSV export for transaction and request listings.
//!
//! Pure formatting: takes a slice of records, produces delimited text with a
//! header row. Every field is quoted; embedded quotes are doubled.

use crate::models::{StaffRequest, StockTransaction};
use std::fmt::Write;

const TRANSACTION_HEADERS: [&str; 10] = [
    "Transaction ID",
    "Type",
    "Part Name",
    "Part Number",
    "Quantity",
    "Ship",
    "User",
    "Date",
    "Status",
    "Notes",
];

const REQUEST_HEADERS: [&str; 11] = [
    "Request ID",
    "Staff",
    "Part Name",
    "Part Number",
    "Quantity",
    "Ship",
    "Priority",
    "Status",
    "Requested",
    "Reason",
    "Notes",
];

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn write_row(out: &mut String, fields: &[String]) {
    let row = fields
        .iter()
        .map(|f| quote(f))
        .collect::<Vec<_>>()
        .join(",");
    let _ = writeln!(out, "{row}");
}

pub fn transactions_to_csv(transactions: &[StockTransaction]) -> String {
    let mut out = String::new();
    write_row(
        &mut out,
        &TRANSACTION_HEADERS.map(str::to_string),
    );
    for txn in transactions {
        write_row(
            &mut out,
            &[
                txn.id.clone(),
                txn.txn_type.to_string(),
                txn.part_name.clone(),
                txn.part_number.clone(),
                txn.signed_quantity().to_string(),
                txn.ship.clone(),
                txn.performed_by.clone(),
                txn.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                txn.status.to_string(),
                txn.notes.clone().unwrap_or_default(),
            ],
        );
    }
    out
}

pub fn requests_to_csv(requests: &[StaffRequest]) -> String {
    let mut out = String::new();
    write_row(&mut out, &REQUEST_HEADERS.map(str::to_string));
    for request in requests {
        write_row(
            &mut out,
            &[
                request.id.clone(),
                request.staff_name.clone(),
                request.part_name.clone(),
                request.part_number.clone(),
                request.quantity.to_string(),
                request.ship.clone(),
                request.priority.to_string(),
                request.status.to_string(),
                request.requested_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                request.reason.clone(),
                request.notes.clone().unwrap_or_default(),
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        RequestPriority, RequestStatus, StockDestination, TransactionStatus, TransactionType,
    };
    use chrono::TimeZone;

    fn txn() -> StockTransaction {
        StockTransaction {
            id: "TXN-001".into(),
            txn_type: TransactionType::StockOut,
            part_number: "EF-2024".into(),
            part_name: "Engine Filter".into(),
            quantity: 2,
            ship: "FastCat M1".into(),
            performed_by_id: "USR-002".into(),
            performed_by: "Jane Smith".into(),
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 1, 15, 14, 45, 0).unwrap(),
            status: TransactionStatus::Completed,
            source: None,
            destination: Some(StockDestination::Maintenance),
            notes: Some(r#"for the "spare" locker"#.into()),
            reference: None,
        }
    }

    #[test]
    fn transaction_csv_header_and_signed_quantity() {
        let csv = transactions_to_csv(&[txn()]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            r#""Transaction ID","Type","Part Name","Part Number","Quantity","Ship","User","Date","Status","Notes""#
        );
        let row = lines.next().unwrap();
        assert!(row.contains(r#""Stock Out""#));
        assert!(row.contains(r#""-2""#));
        assert!(row.contains(r#""2024-01-15 14:45:00""#));
        assert!(lines.next().is_none());
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = transactions_to_csv(&[txn()]);
        assert!(csv.contains(r#""for the ""spare"" locker""#));
    }

    #[test]
    fn empty_listing_is_just_the_header() {
        let csv = requests_to_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with(r#""Request ID""#));
    }

    #[test]
    fn request_csv_row_fields() {
        let request = StaffRequest {
            id: "REQ-001".into(),
            staff_id: "USR-003".into(),
            staff_name: "Mike Johnson".into(),
            part_number: "ENG-001".into(),
            part_name: "Engine Oil Filter".into(),
            quantity: 5,
            ship: "FastCat M1".into(),
            priority: RequestPriority::High,
            reason: "Emergency maintenance".into(),
            notes: None,
            requested_at: chrono::Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            status: RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
        };
        let csv = requests_to_csv(&[request]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            r#""REQ-001","Mike Johnson","Engine Oil Filter","ENG-001","5","FastCat M1","High","Pending","2024-01-15 10:30:00","Emergency maintenance","""#
        );
    }
}
