//! Tradewind Worker
//!
//! Processes per-user evaluation jobs from the Redis queue and runs the
//! cron scheduler that enqueues them. Can be run as a separate
//! process/instance from the API server.

use apalis_redis::RedisStorage;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tradewind::core::runtime::EngineRuntime;
use tradewind::core::scheduler::CycleScheduler;
use tradewind::db::store::StrategyStore;
use tradewind::db::PostgresStore;
use tradewind::engine::{ExecutionEngine, StrategyEvaluator};
use tradewind::jobs::context::JobContext;
use tradewind::jobs::types::EvaluateUserJob;
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

    let eval_interval = tradewind::config::get_eval_interval_seconds();
    let env = tradewind::config::get_environment();
    info!("Starting Tradewind Worker");
    info!(environment = %env, "Environment");

    if eval_interval == 0 {
        return Err("EVAL_INTERVAL_SECONDS must be > 0 for worker".into());
    }
    info!(
        interval = eval_interval,
        "Strategy evaluation: every {} seconds", eval_interval
    );

    let metrics = Arc::new(Metrics::new()?);

    // Postgres is required: the worker cannot evaluate without strategies.
    info!("Initializing Postgres connection...");
    let store: Arc<dyn StrategyStore> = match PostgresStore::connect(
        &tradewind::config::get_database_url(),
    )
    .await
    {
        Ok(db) => {
            info!("Postgres connected");
            metrics.database_connected.set(1.0);
            Arc::new(db)
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to Postgres");
            return Err(format!("Postgres connection required for worker: {}", e).into());
        }
    };

    let owners = store.owners_with_active_strategies().await?;
    if owners.is_empty() {
        warn!("No owners with active strategies - scheduler will idle until strategies exist");
    } else {
        info!(
            owner_count = owners.len(),
            "Found {} owners with active strategies",
            owners.len()
        );
    }

    // Engine collaborators
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

    // Apalis storage backend
    info!("Initializing Apalis Redis storage...");
    let redis_url = tradewind::config::get_redis_url();
    let conn = apalis_redis::connect(redis_url.clone()).await?;
    let eval_storage: Arc<RedisStorage<EvaluateUserJob>> = Arc::new(RedisStorage::new(conn));
    info!("Apalis Redis storage initialized");

    let job_context = Arc::new(JobContext::new(engine));

    info!("Starting Apalis workers...");
    let runtime = EngineRuntime::new(job_context, eval_storage.clone());
    let worker_handles = runtime
        .start_workers()
        .await
        .map_err(|e| format!("Failed to start workers: {}", e))?;

    info!("Starting cycle scheduler...");
    let scheduler = CycleScheduler::new(eval_storage, store.clone(), eval_interval)
        .map_err(|e| format!("Failed to create scheduler: {}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| format!("Failed to start scheduler: {}", e))?;

    // Graceful shutdown
    info!("Worker started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
            scheduler.stop().await;
            for handle in worker_handles {
                handle.abort();
            }
            info!("Worker stopped");
        }
    }

    Ok(())
}
