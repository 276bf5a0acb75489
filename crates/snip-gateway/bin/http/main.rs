mod cli;

use crate::cli::{Cli, LogFormatArg, StorageBackendArg};
use anyhow::Context;
use clap::Parser;
use snip_core::LinkManager;
use snip_encoder::Encoder;
use snip_gateway::{App, AppState};
use snip_service::{IdStrategy, LinkService};
use snip_storage::{InMemoryRepository, PostgresRepository, Repository};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    init_tracing(config.log_format);

    let strategy = IdStrategy::from(config.id_strategy);
    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        id_strategy = %strategy,
        "starting snip gateway"
    );

    let manager = match config.storage {
        StorageBackendArg::InMemory => build_manager(InMemoryRepository::new(), strategy),
        StorageBackendArg::Postgres => {
            let database_url = config
                .database_url
                .context("database url is required when storage backend is postgres")?;
            let repository =
                PostgresRepository::connect(&database_url, config.database_max_connections)
                    .await
                    .context("failed to connect to postgres")?;
            repository
                .ensure_schema()
                .await
                .context("failed to prepare postgres schema")?;
            build_manager(repository, strategy)
        }
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(AppState::new(manager)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("gateway stopped");
    Ok(())
}

fn build_manager<R: Repository>(repository: R, strategy: IdStrategy) -> Arc<dyn LinkManager> {
    Arc::new(LinkService::new(repository, Encoder::default()).with_strategy(strategy))
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormatArg::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormatArg::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
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
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
