use std::{sync::Arc, time::Duration};

use anyhow::Result;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use userhub_user::{
    Command,
    publisher::{ChannelPublisher, LogPublisher, OutboxPublisher, Publisher, Relay},
    repository::{MemoryStore, SqliteStore, Store},
};

use crate::config::{Config, PublisherKind, StoreKind};
use crate::routes::AppState;

const RELAY_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Wires the configured store and publisher into a [`Command`].
///
/// The publisher always sits behind a bounded channel so request handlers
/// never wait on it; the returned [`Relay`] must be driven for events to
/// leave the process.
pub fn build_command(config: &Config, pool: &SqlitePool) -> (Command, Relay) {
    let store: Arc<dyn Store> = match config.store.kind {
        StoreKind::Sqlite => Arc::new(SqliteStore::new(pool.clone())),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    };

    let inner: Arc<dyn Publisher> = match config.publisher.kind {
        PublisherKind::Outbox => Arc::new(OutboxPublisher::new(pool.clone())),
        PublisherKind::Log => Arc::new(LogPublisher),
    };

    let (publisher, relay) = ChannelPublisher::new(inner, config.publisher.buffer);

    tracing::info!(
        store = ?config.store.kind,
        publisher = ?config.publisher.kind,
        buffer = config.publisher.buffer,
        "User command wired"
    );

    (Command::new(store, Arc::new(publisher)), relay)
}

pub async fn serve(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting userhub server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    let pool = crate::db::prepare(&config.database.url, config.database.max_connections).await?;

    let (user_command, relay) = build_command(&config, &pool);
    let relay = tokio::spawn(relay.run());

    let state = AppState {
        config,
        user_command,
        pool: pool.clone(),
    };

    let app = crate::create_app(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Every command clone went away with the router, which closes the queue.
    tracing::info!("Draining user event relay...");
    match tokio::time::timeout(RELAY_DRAIN_TIMEOUT, relay).await {
        Ok(Ok(forwarded)) => tracing::info!(forwarded, "User event relay drained"),
        Ok(Err(e)) => tracing::error!("User event relay failed: {e}"),
        Err(_) => tracing::warn!("User event relay did not drain in time"),
    }

    tracing::info!("Closing database pool...");
    pool.close().await;

    tracing::info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}
