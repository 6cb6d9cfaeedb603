//! User directory. Records are never deleted; deactivation sets Inactive.

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{Role, User, UserStatus};
use crate::repositories::UserRepository;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub ship: String,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
    pub ship: Option<String>,
    pub status: Option<UserStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

/// Service for the user directory
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    event_sender: EventSender,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, event_sender: EventSender) -> Self {
        Self {
            users,
            event_sender,
        }
    }

    /// Lists directory entries; search matches name, email and department.
    #[instrument(skip(self))]
    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, ServiceError> {
        let mut users = self.users.list().await?;

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            users.retain(|u| {
                u.name.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
                    || u.department.to_lowercase().contains(&needle)
            });
        }
        if let Some(role) = filter.role {
            users.retain(|u| u.role == role);
        }
        if let Some(status) = filter.status {
            users.retain(|u| u.status == status);
        }

        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> Result<User, ServiceError> {
        self.users
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {id} not found")))
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let user = User {
            id: self.users.next_id(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            role: input.role,
            department: input.department,
            ship: input.ship,
            status: UserStatus::Active,
            last_login: now,
            created_at: now,
        };
        let user = self.users.insert(user).await?;

        info!(id = %user.id, "directory user created");
        self.event_sender
            .send(Event::UserCreated {
                user_id: user.id.clone(),
            })
            .await;
        Ok(user)
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        id: &str,
        input: UpdateUserInput,
    ) -> Result<User, ServiceError> {
        let mut user = self.get_user(id).await?;

        if let Some(name) = input.name {
            user.name = name;
        }
        if let Some(phone) = input.phone {
            user.phone = phone;
        }
        if let Some(role) = input.role {
            user.role = role;
        }
        if let Some(department) = input.department {
            user.department = department;
        }
        if let Some(ship) = input.ship {
            user.ship = ship;
        }
        if let Some(status) = input.status {
            user.status = status;
        }

        let user = self.users.update(user).await?;
        self.event_sender
            .send(Event::UserUpdated {
                user_id: user.id.clone(),
            })
            .await;
        Ok(user)
    }

    /// Marks a user Inactive. Directory entries are never deleted.
    #[instrument(skip(self))]
    pub async fn deactivate_user(&self, id: &str) -> Result<User, ServiceError> {
        let mut user = self.get_user(id).await?;
        user.status = UserStatus::Inactive;
        let user = self.users.update(user).await?;

        self.event_sender
            .send(Event::UserDeactivated {
                user_id: user.id.clone(),
            })
            .await;
        Ok(user)
    }
}
