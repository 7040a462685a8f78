//! Environment-based configuration

use std::env;

/// Current deployment environment (`production`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_database_url() -> String {
    env::var("DATABASE_URL")
        .unwrap_or_else(|_| "host=localhost port=5432 user=tradewind dbname=tradewind".to_string())
}

pub fn get_redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

/// Base URL of the market data provider (Birdeye-compatible API).
pub fn get_market_data_url() -> String {
    env::var("MARKET_DATA_URL").unwrap_or_else(|_| "https://public-api.birdeye.so".to_string())
}

pub fn get_market_data_api_key() -> String {
    env::var("MARKET_DATA_API_KEY").unwrap_or_default()
}

/// Base URL of the swap aggregator (Jupiter-compatible API).
pub fn get_aggregator_url() -> String {
    env::var("AGGREGATOR_URL").unwrap_or_else(|_| "https://quote-api.jup.ag/v6".to_string())
}

/// JSON-RPC endpoint of the ledger/broadcast layer.
pub fn get_rpc_url() -> String {
    env::var("RPC_URL").unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".to_string())
}

pub fn get_http_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

/// Evaluation interval for the cycle scheduler, in seconds. 0 disables it.
pub fn get_eval_interval_seconds() -> u64 {
    env::var("EVAL_INTERVAL_SECONDS")
        .ok()
        .and_then(|i| i.parse().ok())
        .unwrap_or(0)
}

/// Base58 signing key for an owner, looked up from the process environment.
/// Key custody at rest is outside the engine; deployments inject decrypted
/// keys through the environment of the worker process.
pub fn get_wallet_secret(owner_id: &str) -> Option<String> {
    let sanitized: String = owner_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    env::var(format!("WALLET_KEY_{}", sanitized)).ok()
}
