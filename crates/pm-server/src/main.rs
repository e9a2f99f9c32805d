//! Property Manager RS server
//!
//! Serves the JSON API, uploaded files and health checks.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pm_api::AppState;
use pm_auth::{Authenticator, JwtService};
use pm_core::config::AppConfig;
use pm_db::{Database, DatabaseConfig};
use pm_uploads::{LocalStore, UploadPolicy, UploadService};

mod health;

use health::{HealthChecker, HealthConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting Property Manager RS"
    );

    // An unreachable database still lets the server start; the dashboard
    // then reports zeros and readiness fails until it comes back
    let db_config = DatabaseConfig::from(&config.database).with_env_overrides();
    let db = match Database::connect(&db_config).await {
        Ok(db) => {
            info!("Connected to database");
            db
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to database, connecting lazily");
            Database::connect_lazy(&db_config)?
        }
    };

    let store = LocalStore::new(&config.storage.local_path, &config.storage.base_url);
    let uploads = UploadService::new(Arc::new(store), UploadPolicy::default());
    let auth = Authenticator::new(JwtService::from_config(&config.auth));
    let state = AppState::new(db.pool().clone(), auth, uploads);

    let health = HealthChecker::new(HealthConfig::default())
        .with_pool(db.pool().clone())
        .with_uploads_dir(&config.storage.local_path);

    let app = build_router(state, Arc::new(health), &config);

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Human-readable output by default, JSON lines with `LOG_FORMAT=json`
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,pm_server=debug,pm_api=debug,tower_http=debug".into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_target(true)))
        .with((!json).then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
        }))
        .init();
}

fn build_router(state: AppState, health: Arc<HealthChecker>, config: &AppConfig) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::liveness))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    let mut app = Router::new()
        .merge(health_routes)
        .merge(pm_api::router(config.server.max_body_size_bytes));

    // Absolute base URLs point at some other host serving the files
    let base_url = config.storage.base_url.trim_end_matches('/');
    if base_url.starts_with('/') {
        app = app.nest(base_url, pm_api::files_router());
    }

    app.with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
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
