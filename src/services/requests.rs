//! Staff request workflow: Pending -> Approved | Rejected, both terminal.
//!
//! Requests are append-only history. A rejected request is resubmitted by
//! creating a brand-new Pending record; the original is never mutated.

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{RequestPriority, RequestStatus, StaffRequest};
use crate::repositories::{PartRepository, RequestRepository};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitRequestInput {
    pub part_number: String,
    pub quantity: u32,
    pub ship: String,
    pub priority: RequestPriority,
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecideRequestInput {
    pub decision: Decision,
    /// Required when rejecting
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RequestFilter {
    pub search: Option<String>,
    pub status: Option<RequestStatus>,
    pub priority: Option<RequestPriority>,
    /// Restrict to requests submitted by this staff id (staff see their own)
    #[serde(skip)]
    pub staff_id: Option<String>,
}

/// Service for the staff part-request workflow
#[derive(Clone)]
pub struct RequestService {
    requests: Arc<dyn RequestRepository>,
    parts: Arc<dyn PartRepository>,
    event_sender: EventSender,
}

impl RequestService {
    pub fn new(
        requests: Arc<dyn RequestRepository>,
        parts: Arc<dyn PartRepository>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            requests,
            parts,
            event_sender,
        }
    }

    /// Submits a new request on behalf of a staff member. Always Pending.
    #[instrument(skip(self, input, staff), fields(staff = %staff.id, part = %input.part_number))]
    pub async fn submit_request(
        &self,
        staff: &AuthUser,
        input: SubmitRequestInput,
    ) -> Result<StaffRequest, ServiceError> {
        if input.quantity == 0 {
            return Err(ServiceError::InvalidInput(
                "quantity must be greater than zero".into(),
            ));
        }
        if input.ship.trim().is_empty() {
            return Err(ServiceError::InvalidInput("ship is required".into()));
        }
        if input.reason.trim().is_empty() {
            return Err(ServiceError::InvalidInput("reason is required".into()));
        }

        let part = self
            .parts
            .find(&input.part_number)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Part {} not found", input.part_number))
            })?;

        let request = StaffRequest {
            id: self.requests.next_id(),
            staff_id: staff.id.clone(),
            staff_name: staff.name.clone(),
            part_number: part.part_number.clone(),
            part_name: part.name.clone(),
            quantity: input.quantity,
            ship: input.ship,
            priority: input.priority,
            reason: input.reason,
            notes: input.notes,
            requested_at: Utc::now(),
            status: RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
        };
        let request = self.requests.insert(request).await?;

        info!(id = %request.id, "staff request submitted");
        self.event_sender
            .send(Event::RequestSubmitted {
                request_id: request.id.clone(),
                staff_id: request.staff_id.clone(),
                part_number: request.part_number.clone(),
                priority: request.priority,
            })
            .await;
        Ok(request)
    }

    #[instrument(skip(self))]
    pub async fn get_request(&self, id: &str) -> Result<StaffRequest, ServiceError> {
        self.requests
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Request {id} not found")))
    }

    /// Applies a manager decision. One-way and terminal: a decided request
    /// can never be decided again. Rejection requires non-empty notes.
    #[instrument(skip(self, input, manager), fields(manager = %manager.id))]
    pub async fn decide_request(
        &self,
        id: &str,
        input: DecideRequestInput,
        manager: &AuthUser,
    ) -> Result<StaffRequest, ServiceError> {
        let mut request = self.get_request(id).await?;
        if !request.is_pending() {
            return Err(ServiceError::AlreadyDecided(id.to_string()));
        }

        let notes = input.notes.filter(|n| !n.trim().is_empty());
        match input.decision {
            Decision::Approve => {
                request.status = RequestStatus::Approved;
            }
            Decision::Reject => {
                if notes.is_none() {
                    return Err(ServiceError::MissingRejectionReason);
                }
                request.status = RequestStatus::Rejected;
            }
        }
        request.notes = notes;
        request.decided_by = Some(manager.name.clone());
        request.decided_at = Some(Utc::now());

        let request = self.requests.update(request).await?;
        match request.status {
            RequestStatus::Approved => {
                self.event_sender
                    .send(Event::RequestApproved {
                        request_id: request.id.clone(),
                        decided_by: manager.name.clone(),
                    })
                    .await;
            }
            RequestStatus::Rejected => {
                self.event_sender
                    .send(Event::RequestRejected {
                        request_id: request.id.clone(),
                        decided_by: manager.name.clone(),
                        reason: request.notes.clone().unwrap_or_default(),
                    })
                    .await;
            }
            RequestStatus::Pending => unreachable!("decision always resolves the request"),
        }
        Ok(request)
    }

    /// Resubmits a rejected request as a brand-new Pending record copying
    /// part, quantity, ship, priority and reason. The original stays as-is.
    #[instrument(skip(self, staff), fields(staff = %staff.id))]
    pub async fn resubmit(
        &self,
        id: &str,
        staff: &AuthUser,
    ) -> Result<StaffRequest, ServiceError> {
        let original = self.get_request(id).await?;
        if original.status != RequestStatus::Rejected {
            return Err(ServiceError::InvalidInput(format!(
                "only rejected requests can be resubmitted, {} is {}",
                id, original.status
            )));
        }

        let request = StaffRequest {
            id: self.requests.next_id(),
            staff_id: original.staff_id.clone(),
            staff_name: original.staff_name.clone(),
            part_number: original.part_number.clone(),
            part_name: original.part_name.clone(),
            quantity: original.quantity,
            ship: original.ship.clone(),
            priority: original.priority,
            reason: original.reason.clone(),
            notes: None,
            requested_at: Utc::now(),
            status: RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
        };
        let request = self.requests.insert(request).await?;

        info!(original = %id, resubmitted = %request.id, "request resubmitted");
        self.event_sender
            .send(Event::RequestResubmitted {
                original_id: id.to_string(),
                request_id: request.id.clone(),
            })
            .await;
        Ok(request)
    }

    /// Lists requests newest-first. Search is an OR of case-insensitive
    /// substring matches over staff name, part name, part number, ship and
    /// request id; status and priority narrow by exact match.
    #[instrument(skip(self))]
    pub async fn list_requests(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<StaffRequest>, ServiceError> {
        let mut requests = self.requests.list().await?;

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            requests.retain(|r| {
                r.staff_name.to_lowercase().contains(&needle)
                    || r.part_name.to_lowercase().contains(&needle)
                    || r.part_number.to_lowercase().contains(&needle)
                    || r.ship.to_lowercase().contains(&needle)
                    || r.id.to_lowercase().contains(&needle)
            });
        }
        if let Some(status) = filter.status {
            requests.retain(|r| r.status == status);
        }
        if let Some(priority) = filter.priority {
            requests.retain(|r| r.priority == priority);
        }
        if let Some(staff_id) = filter.staff_id.as_deref() {
            requests.retain(|r| r.staff_id == staff_id);
        }

        requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(requests)
    }
}
