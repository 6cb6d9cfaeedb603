use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{routing::get, Router};
use clap::Parser;
use http::HeaderValue;
use tokio::{signal, sync::mpsc};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use fleetparts_api as api;
use fleetparts_api::repositories::{
    memory::{
        InMemoryPartRepository, InMemoryRequestRepository, InMemoryTransactionRepository,
        InMemoryUserRepository,
    },
    PartRepository, RequestRepository, TransactionRepository, UserRepository,
};

/// Ship-parts inventory API for a ferry fleet
#[derive(Debug, Parser)]
#[command(name = "fleetparts-api", version)]
struct Cli {
    /// Override the listen port from configuration
    #[arg(long)]
    port: Option<u16>,

    /// Load the demo fleet regardless of configuration
    #[arg(long)]
    seed_demo_data: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut cfg = api::config::load_config()?;
    if let Some(port) = cli.port {
        cfg.port = port;
    }
    if cli.seed_demo_data {
        cfg.seed_demo_data = true;
    }
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // In-memory stores behind the repository traits
    let parts: Arc<dyn PartRepository> = Arc::new(InMemoryPartRepository::default());
    let requests: Arc<dyn RequestRepository> = Arc::new(InMemoryRequestRepository::default());
    let transactions: Arc<dyn TransactionRepository> =
        Arc::new(InMemoryTransactionRepository::default());
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::default());

    // Domain event channel and consumer
    let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
    let event_sender = api::events::EventSender::new(event_tx);
    tokio::spawn(api::events::process_events(event_rx));

    let auth_service = Arc::new(api::auth::AuthService::new(
        &cfg.jwt_secret,
        Duration::from_secs(cfg.jwt_expiration),
        users.clone(),
    ));

    if cfg.seed_demo_data {
        api::seed::load_demo_data(&parts, &requests, &transactions, &users, &auth_service)
            .await?;
    }

    let services = api::handlers::AppServices::new(
        parts,
        requests,
        transactions,
        users,
        event_sender.clone(),
    );

    let app_state = api::AppState {
        config: cfg.clone(),
        event_sender,
        services,
    };

    // Build CORS layer from config
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    let cors_layer = if let Some(origins) = configured_origins {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(cfg.cors_allow_credentials)
    } else if cfg.should_allow_permissive_cors() {
        info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        error!("Missing CORS configuration; set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true");
        return Err("Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true".into());
    };

    let app = Router::<api::AppState>::new()
        .route("/", get(|| async { "fleetparts-api up" }))
        .nest("/api/v1", api::api_v1_routes())
        .nest(
            "/auth",
            api::auth::auth_routes().with_state(auth_service.clone()),
        )
        .merge(api::openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        // Inject AuthService into request extensions for auth middleware
        .layer(axum::middleware::from_fn_with_state(
            auth_service.clone(),
            |axum::extract::State(auth): axum::extract::State<Arc<api::auth::AuthService>>,
             mut req: axum::http::Request<axum::body::Body>,
             next: axum::middleware::Next| async move {
                req.extensions_mut().insert(auth);
                next.run(req).await
            },
        ))
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port).parse()?;
    info!("fleetparts-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
