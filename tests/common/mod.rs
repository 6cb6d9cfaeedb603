use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request},
    middleware, Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use fleetparts_api::{
    auth::AuthService,
    config::AppConfig,
    events::{self, EventSender},
    handlers::AppServices,
    repositories::{
        memory::{
            InMemoryPartRepository, InMemoryRequestRepository, InMemoryTransactionRepository,
            InMemoryUserRepository,
        },
        PartRepository, RequestRepository, TransactionRepository, UserRepository,
    },
    seed, AppState,
};

const TEST_JWT_SECRET: &str =
    "integration_test_secret_key_with_plenty_of_entropy_0123456789abcdef";

/// Harness spinning up the full router over seeded in-memory state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    auth_service: Arc<AuthService>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a test application with the demo fleet loaded.
    pub async fn new() -> Self {
        let parts: Arc<dyn PartRepository> = Arc::new(InMemoryPartRepository::default());
        let requests: Arc<dyn RequestRepository> =
            Arc::new(InMemoryRequestRepository::default());
        let transactions: Arc<dyn TransactionRepository> =
            Arc::new(InMemoryTransactionRepository::default());
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::default());

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let auth_service = Arc::new(AuthService::new(
            TEST_JWT_SECRET,
            Duration::from_secs(3600),
            users.clone(),
        ));

        seed::load_demo_data(&parts, &requests, &transactions, &users, &auth_service)
            .await
            .expect("demo data loads");

        let services = AppServices::new(
            parts,
            requests,
            transactions,
            users,
            event_sender.clone(),
        );

        let cfg = AppConfig {
            host: "127.0.0.1".into(),
            port: 18_080,
            environment: "test".into(),
            log_level: "info".into(),
            log_json: false,
            jwt_secret: TEST_JWT_SECRET.into(),
            jwt_expiration: 3600,
            cors_allowed_origins: None,
            cors_allow_any_origin: true,
            cors_allow_credentials: false,
            seed_demo_data: true,
            event_channel_capacity: 256,
        };

        let state = AppState {
            config: cfg,
            event_sender,
            services,
        };

        let auth_for_layer = auth_service.clone();
        let router = Router::new()
            .nest("/api/v1", fleetparts_api::api_v1_routes())
            .nest(
                "/auth",
                fleetparts_api::auth::auth_routes().with_state(auth_service.clone()),
            )
            .layer(middleware::from_fn_with_state(
                auth_for_layer,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: Request<Body>,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            auth_service,
            _event_task: event_task,
        }
    }

    /// Log in through the HTTP surface and return the bearer token.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/auth/login",
                Some(serde_json::json!({
                    "email": email,
                    "password": seed::DEMO_PASSWORD,
                })),
                None,
            )
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::OK, "login failed");
        let body = read_json(response).await;
        body["token"].as_str().expect("token in response").into()
    }

    #[allow(dead_code)]
    pub fn auth_service(&self) -> Arc<AuthService> {
        self.auth_service.clone()
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

/// Collect a response body as JSON.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body is json")
}

/// Collect a response body as a UTF-8 string.
#[allow(dead_code)]
pub async fn read_text(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read response body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("response body is utf-8")
}
