//! Domain events emitted by the workflow services.
//!
//! Events are fire-and-forget over an mpsc channel; the consumer task logs
//! them. Notification delivery (e.g. telling a staff member their request
//! was decided) hangs off this seam and stays out of the workflow core.

use crate::models::{RequestPriority, TransactionType};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Catalog events
    PartCreated {
        part_number: String,
    },
    PartUpdated {
        part_number: String,
    },
    PartDeleted {
        part_number: String,
    },
    LowStockDetected {
        part_number: String,
        quantity: u32,
        min_quantity: u32,
    },

    // Stock transaction events
    StockCommitted {
        transaction_id: String,
        part_number: String,
        txn_type: TransactionType,
        quantity: u32,
        old_quantity: u32,
        new_quantity: u32,
    },

    // Request workflow events
    RequestSubmitted {
        request_id: String,
        staff_id: String,
        part_number: String,
        priority: RequestPriority,
    },
    RequestApproved {
        request_id: String,
        decided_by: String,
    },
    RequestRejected {
        request_id: String,
        decided_by: String,
        reason: String,
    },
    RequestResubmitted {
        original_id: String,
        request_id: String,
    },

    // Directory events
    UserCreated {
        user_id: String,
    },
    UserUpdated {
        user_id: String,
    },
    UserDeactivated {
        user_id: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event; a full or closed channel is logged, never propagated.
    /// Event delivery is advisory and must not fail the workflow operation.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!("failed to publish event: {}", e);
        }
    }
}

/// Consumes events from the channel and logs them. Spawned once at startup.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::LowStockDetected {
                part_number,
                quantity,
                min_quantity,
            } => {
                warn!(
                    part = %part_number,
                    quantity,
                    min_quantity,
                    "low stock threshold reached"
                );
            }
            Event::RequestRejected {
                request_id,
                decided_by,
                reason,
            } => {
                info!(request = %request_id, by = %decided_by, %reason, "request rejected");
            }
            other => {
                info!(event = ?other, "domain event");
            }
        }
    }
}
