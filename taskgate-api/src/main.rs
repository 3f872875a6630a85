//! # TaskGate API Server
//!
//! HTTP front end for the TaskGate project/task management service.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env` if present)
//! 2. Initialize tracing (pretty or JSON, per `LOG_FORMAT`)
//! 3. Open the store: PostgreSQL with bounded connection retries and
//!    migrations, or the in-memory backend
//! 4. Serve until `Ctrl-C`/`SIGTERM`, drain in-flight requests, close the store
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskgate-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use taskgate_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat, StoreBackend},
};
use taskgate_shared::{
    db::{
        migrations::run_migrations,
        pool::{create_pool, DatabaseConfig},
    },
    store::{memory::MemoryStore, postgres::PgStore, Store},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    tracing::info!(
        "TaskGate API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let store = open_store(&config).await?;
    let bind_address = config.bind_address();

    let state = AppState::new(store.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskgate_api=debug,taskgate_shared=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Creates the configured store; PostgreSQL is migrated before use
async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match config.store.backend {
        StoreBackend::Postgres => {
            let pool = create_pool(DatabaseConfig {
                url: config.store.database_url.clone(),
                max_connections: config.store.max_connections,
                connect_retries: config.store.connect_retries,
                retry_delay_seconds: config.store.retry_delay_seconds,
                ..Default::default()
            })
            .await
            .context("Failed to connect to PostgreSQL")?;

            run_migrations(&pool).await.context("Failed to run migrations")?;

            let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
            Ok(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
            Ok(store)
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
