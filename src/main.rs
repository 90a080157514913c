use anyhow::{Context, Result};
use order_query_service::api;
use order_query_service::core::logging::init_logging;
use order_query_service::core::{Config, HealthChecker};
use order_query_service::monitoring::ApiMetrics;
use order_query_service::orders::{InMemoryOrderStore, OrderStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config.monitoring.log_level);

    tracing::info!("🚀 Order query service starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Auto-register traders: {}",
        config.store.auto_register_traders
    );

    let health_checker = HealthChecker::new();

    let store = match &config.store.seed_path {
        Some(path) => {
            InMemoryOrderStore::from_seed_file(path, config.store.auto_register_traders).await?
        }
        None => InMemoryOrderStore::new(config.store.auto_register_traders),
    };
    let store: Arc<dyn OrderStore> = Arc::new(store);
    tracing::info!(
        "✅ Order store ready ({} traders)",
        store.trader_ids().await.len()
    );
    health_checker.update_component("order_store", true).await;

    let metrics = ApiMetrics::new().context("failed to create API metrics")?;
    let routes = api::handle_all_routes(store, health_checker.clone(), metrics);

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(config.server.socket_addr(), async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("🛑 Shutdown signal received");
        })
        .with_context(|| format!("failed to bind {}", config.server.socket_addr()))?;

    health_checker.update_component("http_api", true).await;
    tracing::info!("✅ HTTP API listening on {}", addr);

    server.await;

    tracing::info!("👋 Order query service stopped");
    Ok(())
}
