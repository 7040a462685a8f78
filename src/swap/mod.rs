//! Swap Gateway
//!
//! Quote and execution against the external swap aggregator plus the
//! on-chain confirmation protocol: quote → build → sign → broadcast →
//! confirm by polling.

pub mod aggregator;
pub mod confirm;
pub mod gateway;
pub mod ledger;
pub mod wallet;

pub use aggregator::{AggregatorClient, Quote, SwapTransaction};
pub use confirm::{confirm_transaction, ConfirmConfig};
pub use gateway::SwapGateway;
pub use ledger::{BlockhashInfo, LedgerClient, RpcLedgerClient, SignatureStatus};
pub use wallet::{EnvWalletProvider, StaticWalletProvider, Wallet, WalletProvider};

use crate::errors::Result;
use serde::{Deserialize, Serialize};

/// Wrapped native asset mint.
pub const NATIVE_MINT: &str = "So11111111111111111111111111111111111111112";
pub const NATIVE_DECIMALS: u32 = 9;

/// Decimal counts for mints the engine knows about. Anything else falls
/// back to 9, which is wrong for some tokens; an authoritative on-chain
/// lookup should replace this table.
pub fn token_decimals(mint: &str) -> u32 {
    match mint {
        NATIVE_MINT => NATIVE_DECIMALS,
        // USDC
        "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v" => 6,
        // USDT
        "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB" => 6,
        // BONK
        "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263" => 5,
        _ => 9,
    }
}

pub fn to_base_units(amount: f64, decimals: u32) -> u64 {
    (amount * 10f64.powi(decimals as i32)).round() as u64
}

pub fn from_base_units(amount: u64, decimals: u32) -> f64 {
    amount as f64 / 10f64.powi(decimals as i32)
}

/// One swap to perform, amounts in whole token units.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub input_token: String,
    pub output_token: String,
    pub amount: f64,
    pub input_decimals: u32,
    pub output_decimals: u32,
    pub slippage_bps: u16,
}

/// Result of a confirmed swap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub signature: String,
    pub input_amount: f64,
    pub output_amount: f64,
    pub price_impact_pct: f64,
}

/// Seam between the evaluator and the concrete swap pipeline.
#[async_trait::async_trait]
pub trait SwapService: Send + Sync {
    /// Stateless price quote, no side effects.
    async fn quote(&self, request: &SwapRequest) -> Result<Quote>;

    /// Full pipeline: quote, build, sign with the owner's key, broadcast,
    /// confirm. The wallet is borrowed only for the duration of the call.
    async fn execute(&self, wallet: &Wallet, request: &SwapRequest) -> Result<SwapReceipt>;
}
