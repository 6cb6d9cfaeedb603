//! Part catalog: the source of truth for stock levels shown everywhere else.

use crate::auth::{consts, AuthUser};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::Part;
use crate::repositories::PartRepository;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Listing filter. `category` of `"all"` (or absent) means no category filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PartFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePartInput {
    #[validate(length(min = 1))]
    pub part_number: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub ship: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub min_quantity: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub critical: bool,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePartInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub ship: Option<String>,
    pub quantity: Option<u32>,
    pub min_quantity: Option<u32>,
    pub location: Option<String>,
    pub supplier: Option<String>,
    pub unit_price: Option<Decimal>,
    pub critical: Option<bool>,
}

/// Service for managing the part catalog
#[derive(Clone)]
pub struct CatalogService {
    parts: Arc<dyn PartRepository>,
    event_sender: EventSender,
}

impl CatalogService {
    pub fn new(parts: Arc<dyn PartRepository>, event_sender: EventSender) -> Self {
        Self {
            parts,
            event_sender,
        }
    }

    /// Lists parts matching the filter, in stable insertion order.
    /// The search term is a case-insensitive substring match against part
    /// number, name and description.
    #[instrument(skip(self))]
    pub async fn list_parts(&self, filter: &PartFilter) -> Result<Vec<Part>, ServiceError> {
        let mut parts = self.parts.list().await?;

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            parts.retain(|p| {
                p.part_number.to_lowercase().contains(&needle)
                    || p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            });
        }
        if let Some(category) = filter
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
        {
            parts.retain(|p| p.category == category);
        }

        Ok(parts)
    }

    #[instrument(skip(self))]
    pub async fn get_part(&self, part_number: &str) -> Result<Part, ServiceError> {
        self.parts
            .find(part_number)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Part {part_number} not found")))
    }

    /// Parts at or below their minimum quantity.
    #[instrument(skip(self))]
    pub async fn list_low_stock(&self) -> Result<Vec<Part>, ServiceError> {
        let parts = self.parts.list().await?;
        Ok(parts.into_iter().filter(Part::is_low_stock).collect())
    }

    #[instrument(skip(self, input), fields(part_number = %input.part_number))]
    pub async fn create_part(&self, input: CreatePartInput) -> Result<Part, ServiceError> {
        input.validate()?;

        let part = Part {
            part_number: input.part_number.trim().to_string(),
            name: input.name,
            description: input.description,
            category: input.category,
            ship: input.ship,
            quantity: input.quantity,
            min_quantity: input.min_quantity,
            location: input.location,
            supplier: input.supplier,
            unit_price: input.unit_price,
            critical: input.critical,
            last_updated: Utc::now(),
        };
        if part.part_number.is_empty() {
            return Err(ServiceError::InvalidInput("part number is required".into()));
        }

        let part = self.parts.insert(part).await?;
        info!(part_number = %part.part_number, "part created");
        self.event_sender
            .send(Event::PartCreated {
                part_number: part.part_number.clone(),
            })
            .await;
        Ok(part)
    }

    #[instrument(skip(self, input))]
    pub async fn update_part(
        &self,
        part_number: &str,
        input: UpdatePartInput,
    ) -> Result<Part, ServiceError> {
        let mut part = self.get_part(part_number).await?;

        if let Some(name) = input.name {
            part.name = name;
        }
        if let Some(description) = input.description {
            part.description = description;
        }
        if let Some(category) = input.category {
            part.category = category;
        }
        if let Some(ship) = input.ship {
            part.ship = ship;
        }
        if let Some(quantity) = input.quantity {
            part.quantity = quantity;
        }
        if let Some(min_quantity) = input.min_quantity {
            part.min_quantity = min_quantity;
        }
        if let Some(location) = input.location {
            part.location = location;
        }
        if let Some(supplier) = input.supplier {
            part.supplier = supplier;
        }
        if let Some(unit_price) = input.unit_price {
            part.unit_price = unit_price;
        }
        if let Some(critical) = input.critical {
            part.critical = critical;
        }
        part.last_updated = Utc::now();

        let part = self.parts.update(part).await?;
        self.event_sender
            .send(Event::PartUpdated {
                part_number: part.part_number.clone(),
            })
            .await;
        Ok(part)
    }

    /// Deletes a part. The route is capability-gated, and the check is
    /// repeated here so a misrouted caller still fails closed.
    #[instrument(skip(self, acting_user), fields(user = %acting_user.id))]
    pub async fn delete_part(
        &self,
        part_number: &str,
        acting_user: &AuthUser,
    ) -> Result<(), ServiceError> {
        if !acting_user.has_capability(consts::INVENTORY_DELETE) {
            return Err(ServiceError::Forbidden(format!(
                "role {} lacks capability {}",
                acting_user.role,
                consts::INVENTORY_DELETE
            )));
        }

        self.parts.delete(part_number).await?;
        info!(part_number, "part deleted");
        self.event_sender
            .send(Event::PartDeleted {
                part_number: part_number.to_string(),
            })
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::repositories::memory::InMemoryPartRepository;
    use assert_matches::assert_matches;
    use tokio::sync::mpsc;

    fn service() -> CatalogService {
        let (tx, _rx) = mpsc::channel(16);
        CatalogService::new(
            Arc::new(InMemoryPartRepository::default()),
            EventSender::new(tx),
        )
    }

    fn manager() -> AuthUser {
        AuthUser {
            id: "USR-002".into(),
            name: "Jane Smith".into(),
            role: Role::Manager,
        }
    }

    fn staff() -> AuthUser {
        AuthUser {
            id: "USR-003".into(),
            name: "Mike Johnson".into(),
            role: Role::Staff,
        }
    }

    fn engine_filter() -> CreatePartInput {
        CreatePartInput {
            part_number: "EF-2024".into(),
            name: "Engine Filter".into(),
            description: "High-performance engine filter for marine diesel engines".into(),
            category: "Engine".into(),
            ship: "FastCat M1".into(),
            quantity: 15,
            min_quantity: 10,
            location: "A1-B2".into(),
            supplier: "Marine Parts Co.".into(),
            unit_price: Decimal::new(4599, 2),
            critical: false,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let svc = service();
        svc.create_part(engine_filter()).await.unwrap();
        let part = svc.get_part("EF-2024").await.unwrap();
        assert_eq!(part.name, "Engine Filter");
        assert_eq!(part.quantity, 15);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_and_blank_part_number() {
        let svc = service();
        svc.create_part(engine_filter()).await.unwrap();
        assert_matches!(
            svc.create_part(engine_filter()).await,
            Err(ServiceError::DuplicatePartNumber(_))
        );

        let mut blank = engine_filter();
        blank.part_number = "   ".into();
        assert_matches!(
            svc.create_part(blank).await,
            Err(ServiceError::ValidationError(_)) | Err(ServiceError::InvalidInput(_))
        );
    }

    #[tokio::test]
    async fn search_matches_number_name_and_description_case_insensitively() {
        let svc = service();
        svc.create_part(engine_filter()).await.unwrap();
        let mut other = engine_filter();
        other.part_number = "NL-LED".into();
        other.name = "Navigation Light LED".into();
        other.description = "LED navigation light for marine vessels".into();
        other.category = "Electrical".into();
        svc.create_part(other).await.unwrap();

        let hits = svc
            .list_parts(&PartFilter {
                search: Some("ef-20".into()),
                category: None,
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].part_number, "EF-2024");

        let hits = svc
            .list_parts(&PartFilter {
                search: Some("navigation".into()),
                category: None,
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        // "all" category means no filtering
        let hits = svc
            .list_parts(&PartFilter {
                search: None,
                category: Some("all".into()),
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);

        let hits = svc
            .list_parts(&PartFilter {
                search: None,
                category: Some("Electrical".into()),
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].part_number, "NL-LED");
    }

    #[tokio::test]
    async fn partial_update_keeps_unpatched_fields() {
        let svc = service();
        svc.create_part(engine_filter()).await.unwrap();
        let updated = svc
            .update_part(
                "EF-2024",
                UpdatePartInput {
                    quantity: Some(42),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quantity, 42);
        assert_eq!(updated.name, "Engine Filter");
        assert_eq!(updated.location, "A1-B2");
    }

    #[tokio::test]
    async fn update_unknown_part_is_not_found() {
        let svc = service();
        assert_matches!(
            svc.update_part("ZZ-0000", UpdatePartInput::default()).await,
            Err(ServiceError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn delete_requires_capability_and_fails_closed() {
        let svc = service();
        svc.create_part(engine_filter()).await.unwrap();

        assert_matches!(
            svc.delete_part("EF-2024", &staff()).await,
            Err(ServiceError::Forbidden(_))
        );
        // still present
        assert!(svc.get_part("EF-2024").await.is_ok());

        svc.delete_part("EF-2024", &manager()).await.unwrap();
        assert_matches!(
            svc.get_part("EF-2024").await,
            Err(ServiceError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn low_stock_listing_uses_threshold() {
        let svc = service();
        let mut low = engine_filter();
        low.quantity = 5;
        low.min_quantity = 10;
        svc.create_part(low).await.unwrap();
        let mut ok = engine_filter();
        ok.part_number = "HP-150".into();
        ok.quantity = 9;
        ok.min_quantity = 2;
        svc.create_part(ok).await.unwrap();

        let low_stock = svc.list_low_stock().await.unwrap();
        assert_eq!(low_stock.len(), 1);
        assert_eq!(low_stock[0].part_number, "EF-2024");
    }
}
