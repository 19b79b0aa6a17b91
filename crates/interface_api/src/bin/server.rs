//! `insurance-exporter` server binary
//!
//! # Usage
//!
//! ```bash
//! # In-memory store with the fixture policies
//! cargo run --bin insurance-exporter
//!
//! # PostgreSQL store
//! API_PORT=8080 DATABASE_URL=postgres://... cargo run --bin insurance-exporter
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` / `DATABASE_URL` - PostgreSQL connection string (default: in-memory store)
//! * `API_SEED_FIXTURES` - Load the fixture policies on start (default: true)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_JSON` - Emit JSON log lines (default: false)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use domain_policy::{InMemoryPolicyStore, PolicyService, PolicyStore};
use infra_db::{create_pool, ensure_schema, seed_fixtures, DatabaseConfig, PostgresPolicyStore};
use interface_api::{config::ApiConfig, create_router, AppState};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fails on invalid configuration, an unreachable database or a busy port.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_config();
    config.validate()?;

    init_tracing(&config.log_level, config.log_json);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = if config.database_url.is_some() { "postgres" } else { "memory" },
        "Starting policy exporter"
    );

    let store = build_store(&config).await?;
    let service = PolicyService::new(store);

    let shutdown = CancellationToken::new();
    let app = create_router(AppState::new(service, shutdown.clone()));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration, falling back to defaults when the environment
/// cannot be parsed.
fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|err| {
        eprintln!("Invalid API_ environment ({err}), using defaults");
        ApiConfig {
            database_url: std::env::var("DATABASE_URL").ok(),
            ..ApiConfig::default()
        }
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over `log_level`.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Builds the PostgreSQL store when a database URL is configured, the
/// in-memory store otherwise.
async fn build_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn PolicyStore>> {
    let Some(url) = config.database_url.as_deref() else {
        let store = if config.seed_fixtures {
            InMemoryPolicyStore::seeded()
        } else {
            InMemoryPolicyStore::new()
        };
        return Ok(Arc::new(store));
    };

    let pool = create_pool(DatabaseConfig::new(url))
        .await
        .context("connecting to the database")?;
    ensure_schema(&pool).await.context("creating the schema")?;
    if config.seed_fixtures {
        seed_fixtures(&pool).await.context("loading fixtures")?;
    }

    Ok(Arc::new(PostgresPolicyStore::new(pool)))
}

/// Resolves on Ctrl+C or SIGTERM and cancels `shutdown`, which every
/// in-flight request observes through its child token.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let source = tokio::select! {
        _ = ctrl_c => "ctrl_c",
        _ = terminate => "sigterm",
    };
    tracing::info!(signal = source, "Shutting down, cancelling in-flight requests");

    shutdown.cancel();
}
