//! Store interface consumed by the engine.

use crate::errors::Result;
use crate::models::strategy::Strategy;
use crate::models::trade::Trade;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait StrategyStore: Send + Sync {
    /// Active strategies for one owner, oldest first.
    async fn active_strategies(&self, owner_id: &str) -> Result<Vec<Strategy>>;

    /// Owners that currently have at least one active strategy.
    async fn owners_with_active_strategies(&self) -> Result<Vec<String>>;

    /// Trades for an owner executed at or after `cutoff`.
    async fn trades_since(&self, owner_id: &str, cutoff: DateTime<Utc>) -> Result<Vec<Trade>>;

    /// Persist a confirmed trade.
    async fn record_trade(&self, trade: &Trade) -> Result<i64>;

    /// Persist a confirmed trade and flip the strategy inactive in one
    /// transaction. The two writes must not be observably split.
    async fn record_trade_and_deactivate(&self, trade: &Trade, strategy_id: i64) -> Result<i64>;
}
