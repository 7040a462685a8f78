//! In-memory store used by the engine tests and local tooling.

use crate::db::store::StrategyStore;
use crate::errors::{EngineError, Result};
use crate::models::strategy::Strategy;
use crate::models::trade::Trade;
use chrono::{DateTime, Utc};
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    strategies: Vec<Strategy>,
    trades: Vec<Trade>,
    next_trade_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_strategy(&self, strategy: Strategy) {
        let mut inner = self.inner.write().expect("store lock");
        inner.strategies.push(strategy);
    }

    pub fn insert_trade(&self, trade: Trade) {
        let mut inner = self.inner.write().expect("store lock");
        inner.trades.push(trade);
    }

    pub fn strategy(&self, id: i64) -> Option<Strategy> {
        let inner = self.inner.read().expect("store lock");
        inner.strategies.iter().find(|s| s.id == Some(id)).cloned()
    }

    pub fn trades(&self) -> Vec<Trade> {
        let inner = self.inner.read().expect("store lock");
        inner.trades.clone()
    }

    fn push_trade(inner: &mut Inner, trade: &Trade) -> i64 {
        inner.next_trade_id += 1;
        let mut trade = trade.clone();
        trade.id = Some(inner.next_trade_id);
        inner.trades.push(trade);
        inner.next_trade_id
    }
}

#[async_trait::async_trait]
impl StrategyStore for MemoryStore {
    async fn active_strategies(&self, owner_id: &str) -> Result<Vec<Strategy>> {
        let inner = self.inner.read().expect("store lock");
        Ok(inner
            .strategies
            .iter()
            .filter(|s| s.owner_id == owner_id && s.is_active)
            .cloned()
            .collect())
    }

    async fn owners_with_active_strategies(&self) -> Result<Vec<String>> {
        let inner = self.inner.read().expect("store lock");
        let mut owners: Vec<String> = inner
            .strategies
            .iter()
            .filter(|s| s.is_active)
            .map(|s| s.owner_id.clone())
            .collect();
        owners.sort();
        owners.dedup();
        Ok(owners)
    }

    async fn trades_since(&self, owner_id: &str, cutoff: DateTime<Utc>) -> Result<Vec<Trade>> {
        let inner = self.inner.read().expect("store lock");
        Ok(inner
            .trades
            .iter()
            .filter(|t| t.owner_id == owner_id && t.executed_at >= cutoff)
            .cloned()
            .collect())
    }

    async fn record_trade(&self, trade: &Trade) -> Result<i64> {
        let mut inner = self.inner.write().expect("store lock");
        Ok(Self::push_trade(&mut inner, trade))
    }

    async fn record_trade_and_deactivate(&self, trade: &Trade, strategy_id: i64) -> Result<i64> {
        let mut inner = self.inner.write().expect("store lock");
        let strategy = inner
            .strategies
            .iter_mut()
            .find(|s| s.id == Some(strategy_id))
            .ok_or_else(|| {
                EngineError::Store(format!("strategy {} not found for deactivation", strategy_id))
            })?;
        strategy.is_active = false;
        strategy.updated_at = Utc::now();
        Ok(Self::push_trade(&mut inner, trade))
    }
}
