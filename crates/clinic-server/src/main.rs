//! Clinic backend server
//!
//! Wires configuration, stores, the attachment gateway and the mailer into
//! the API router and serves it until Ctrl-C or SIGTERM.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_api::AppState;
use clinic_attachments::{
    AttachmentGateway, AttachmentLifecycle, CloudinaryGateway, MemoryGateway, UploadPolicy,
};
use clinic_auth::JwtService;
use clinic_core::config::{AppConfig, StoreBackend};
use clinic_db::{Database, PoolSettings, Stores};
use clinic_notifications::{sender_for, AppointmentMailer};
use clinic_services::ClinicServices;

mod health;

use health::HealthChecker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        clinic = %config.instance.clinic_name,
        "Starting clinic backend"
    );

    let (stores, db) = open_stores(&config).await;
    let gateway = open_gateway(&config);
    let health = Arc::new(HealthChecker::new(stores.clone(), gateway.name()));
    let services = build_services(&config, stores, gateway);
    let jwt = JwtService::from_config(&config.auth);

    let addr = config.server_addr();
    let max_body = config.server.max_body_size_bytes;
    let app = build_router(AppState::new(services, jwt, config), health, max_body);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await;
    }
    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,clinic_server=debug,clinic_api=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Postgres stores, or in-memory ones when configured or unreachable
async fn open_stores(config: &AppConfig) -> (Stores, Option<Database>) {
    if config.database.backend == StoreBackend::Memory {
        info!("Using in-memory document store");
        return (Stores::memory(), None);
    }

    let db = match Database::connect(&PoolSettings::from_config(&config.database)).await {
        Ok(db) => db,
        Err(e) => {
            warn!("Failed to connect to database: {}. Running with in-memory store.", e);
            return (Stores::memory(), None);
        }
    };

    match Stores::postgres(&db).await {
        Ok(stores) => (stores, Some(db)),
        Err(e) => {
            warn!("Failed to prepare collections: {}. Running with in-memory store.", e);
            db.close().await;
            (Stores::memory(), None)
        }
    }
}

/// Cloudinary when credentials are configured, in-memory otherwise
fn open_gateway(config: &AppConfig) -> Arc<dyn AttachmentGateway> {
    match CloudinaryGateway::from_config(&config.gateway) {
        Ok(gateway) => {
            info!(base_url = %config.gateway.base_url, "Using Cloudinary attachment gateway");
            Arc::new(gateway)
        }
        Err(e) => {
            warn!("{}. Attachments are kept in memory.", e);
            Arc::new(MemoryGateway::new())
        }
    }
}

/// Services over the given stores and gateway, with mail and upload
/// limits taken from the configuration
fn build_services(
    config: &AppConfig,
    stores: Stores,
    gateway: Arc<dyn AttachmentGateway>,
) -> ClinicServices {
    let mailer = Arc::new(AppointmentMailer::new(
        sender_for(&config.email),
        &config.email,
        &config.instance.clinic_name,
    ));
    let attachments =
        AttachmentLifecycle::new(gateway).with_policy(UploadPolicy::from_config(&config.gateway));

    ClinicServices::new(stores, attachments, mailer, &config.gateway.folders)
}

/// Build the application router
fn build_router(state: AppState, health: Arc<HealthChecker>, max_body: usize) -> Router {
    let health_routes = Router::new()
        .route("/", get(health::liveness))
        .route("/health", get(health::health))
        .with_state(health);

    Router::new()
        .merge(health_routes)
        .merge(clinic_api::router().with_state(state))
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(DefaultBodyLimit::max(max_body)),
        )
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app(max_body: usize) -> Router {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Memory;

        let stores = Stores::memory();
        let gateway = open_gateway(&config);
        let services = build_services(&config, stores.clone(), gateway);
        let jwt = JwtService::from_config(&config.auth);
        let health = Arc::new(HealthChecker::new(stores, "memory"));

        build_router(AppState::new(services, jwt, config), health, max_body)
    }

    #[tokio::test]
    async fn test_root_is_alive() {
        let response = test_app(1024)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_app(1024)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let report: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(report["status"], "degraded");
        assert_eq!(report["components"][1]["backend"], "memory");
    }

    #[tokio::test]
    async fn test_api_routes_mounted() {
        let response = test_app(1024)
            .oneshot(
                Request::builder()
                    .uri("/guidance_list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let response = test_app(16)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/book_appointment")
                    .header("content-type", "application/json")
                    .header("content-length", "64")
                    .body(Body::from(vec![b' '; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
