use std::net::SocketAddr;
use std::sync::Arc;

use catalog_api_service::config::Config;
use catalog_api_service::database::DatabaseManager;
use catalog_api_service::{CatalogEngine, HttpServer};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_api_service=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Catalog API v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    info!("Configuration loaded:");
    info!("  HTTP Port: {}", config.port);
    info!("  CORS Origin: {}", config.cors_origin);
    info!("  Database URL: {}", config.redacted_database_url());
    info!("  Database Pool Size: {}", config.database_pool_size);

    let database = DatabaseManager::new(&config.database_url, config.database_pool_size)?;
    let engine = Arc::new(CatalogEngine::new(Arc::new(database)));
    info!("Catalog engine initialized successfully");

    let http_server = HttpServer::new(engine, config.cors_origin.clone());
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();

    if let Err(e) = http_server.start(addr, shutdown_signal()).await {
        error!("HTTP server error: {}", e);
        return Err(e.into());
    }

    info!("Catalog API shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!("Unable to install SIGTERM handler: {}", err);
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
}
