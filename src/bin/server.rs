//! Tradewind API Server
//!
//! HTTP surface with health check, metrics, and the manual refresh
//! endpoint. Stateless; the periodic scheduler runs in the worker binary.

use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use tradewind::core::http::{start_server, AppState, HealthStatus};
use tradewind::db::store::StrategyStore;
use tradewind::db::PostgresStore;
use tradewind::engine::{ExecutionEngine, StrategyEvaluator};
use tradewind::logging;
use tradewind::market::{BirdeyeClient, MarketDataGateway};
use tradewind::metrics::Metrics;
use tradewind::swap::{
    AggregatorClient, EnvWalletProvider, LedgerClient, RpcLedgerClient, SwapGateway, SwapService,
    WalletProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let port = tradewind::config::get_http_port();
    let env = tradewind::config::get_environment();
    info!("Starting Tradewind API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let metrics = Arc::new(Metrics::new()?);

    // Store connection is optional here: health and metrics stay up
    // without it, the user-facing endpoints return 503.
    let database_url = tradewind::config::get_database_url();
    let (engine, store): (
        Option<Arc<ExecutionEngine>>,
        Option<Arc<dyn StrategyStore>>,
    ) = match PostgresStore::connect(&database_url).await {
        Ok(db) => {
            info!("Postgres connected for API server");
            metrics.database_connected.set(1.0);
            let store: Arc<dyn StrategyStore> = Arc::new(db);

            let market = Arc::new(MarketDataGateway::new(Arc::new(BirdeyeClient::new())));
            let ledger: Arc<dyn LedgerClient> = Arc::new(RpcLedgerClient::new());
            let swap: Arc<dyn SwapService> = Arc::new(
                SwapGateway::new(AggregatorClient::new(), ledger).with_metrics(metrics.clone()),
            );
            let wallets: Arc<dyn WalletProvider> = Arc::new(EnvWalletProvider);

            let evaluator = StrategyEvaluator::new(market, swap, wallets, store.clone());
            let engine = Arc::new(
                ExecutionEngine::new(evaluator, store.clone()).with_metrics(metrics.clone()),
            );

            (Some(engine), Some(store))
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to Postgres - user endpoints will be unavailable");
            (None, None)
        }
    };

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: Arc::new(Instant::now()),
        engine,
        store,
    };

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    // Graceful shutdown
    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
