//! Session tokens and capability enforcement.
//!
//! Login verifies credentials against the user directory and issues an HS256
//! session token. Every protected route runs two layers: `auth_middleware`
//! resolves the bearer token into an [`AuthUser`], and `capability_middleware`
//! checks the route's required capability against the user's role. Handlers
//! and services treat the capability check as the enforcement point; hiding a
//! button client-side is never sufficient.

pub mod capabilities;

pub use capabilities::{consts, has_capability};

use crate::errors::ServiceError;
use crate::models::{Role, User};
use crate::repositories::UserRepository;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
    Json,
};
use chrono::Utc;
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// JWT claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub name: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Token id
    pub jti: String,
}

/// The authenticated identity attached to a request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl AuthUser {
    pub fn has_capability(&self, capability: &str) -> bool {
        has_capability(self.role, capability)
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ServiceError::Unauthorized("missing or invalid session token".into()))
    }
}

/// Issues and validates session tokens and verifies directory credentials.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    users: Arc<dyn UserRepository>,
    /// argon2 password hashes keyed by email
    credentials: DashMap<String, String>,
}

impl AuthService {
    pub fn new(secret: &str, token_ttl: Duration, users: Arc<dyn UserRepository>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
            users,
            credentials: DashMap::new(),
        }
    }

    /// Registers a credential for a directory user. Called by seeding and by
    /// staff-management flows; the plaintext is hashed immediately.
    pub fn register_credential(&self, email: &str, password: &str) -> Result<(), ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::InternalError(format!("password hash failed: {e}")))?
            .to_string();
        self.credentials.insert(email.to_lowercase(), hash);
        Ok(())
    }

    fn verify_password(&self, email: &str, password: &str) -> bool {
        let Some(stored) = self.credentials.get(&email.to_lowercase()) else {
            return false;
        };
        let Ok(parsed) = PasswordHash::new(stored.value()) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    pub fn generate_token(&self, user: &User) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            role: user.role.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::from_std(self.token_ttl).unwrap_or_default())
                .timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::AuthError(format!("token encoding failed: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthUser, ServiceError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| ServiceError::Unauthorized(format!("invalid token: {e}")))?;
        let role = Role::from_str(&data.claims.role)
            .map_err(|_| ServiceError::Unauthorized("unknown role in token".into()))?;
        Ok(AuthUser {
            id: data.claims.sub,
            name: data.claims.name,
            role,
        })
    }

    /// Validates credentials and issues a session. Inactive users are refused.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), ServiceError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("invalid email or password".into()))?;

        if !user.is_active() {
            return Err(ServiceError::Unauthorized("account is inactive".into()));
        }
        if !self.verify_password(email, password) {
            return Err(ServiceError::Unauthorized("invalid email or password".into()));
        }

        let token = self.generate_token(&user)?;
        let user = self.users.touch_last_login(&user.id, Utc::now()).await?;
        Ok((token, user))
    }
}

fn bearer_token(parts: &http::HeaderMap) -> Option<&str> {
    parts
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Resolves the bearer token into an [`AuthUser`] request extension.
/// Expects an `Arc<AuthService>` injected into request extensions upstream.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, ServiceError> {
    let auth = request
        .extensions()
        .get::<Arc<AuthService>>()
        .cloned()
        .ok_or_else(|| ServiceError::InternalError("auth service not configured".into()))?;

    let token = bearer_token(request.headers())
        .ok_or_else(|| ServiceError::Unauthorized("missing bearer token".into()))?;

    let user = auth.validate_token(token)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Denies the request unless the authenticated user holds the capability.
pub async fn capability_middleware(
    State(capability): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ServiceError::Unauthorized("missing or invalid session token".into()))?;

    if !user.has_capability(&capability) {
        warn!(user = %user.id, role = %user.role, %capability, "capability denied");
        return Err(ServiceError::Forbidden(format!(
            "role {} lacks capability {}",
            user.role, capability
        )));
    }
    Ok(next.run(request).await)
}

/// Extension methods for Router to attach auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_capability(self, capability: &str) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_capability(self, capability: &str) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            capability.to_string(),
            capability_middleware,
        ))
        .with_auth()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginCredentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Login handler
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<LoginResponse>, ServiceError> {
    credentials.validate()?;
    let (token, user) = auth_service
        .login(&credentials.email, &credentials.password)
        .await?;
    Ok(Json(LoginResponse { token, user }))
}

/// Authentication routes
pub fn auth_routes() -> axum::Router<Arc<AuthService>> {
    axum::Router::new().route("/login", axum::routing::post(login_handler))
}
