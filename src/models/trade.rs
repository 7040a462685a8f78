//! Trade records and per-strategy evaluation outcomes.

use crate::models::strategy::TradeDirection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Confirmed,
}

/// A confirmed, persisted trade. Feeds the trailing-window dedup set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: Option<i64>,
    pub owner_id: String,
    pub signature: String,
    pub strategy_type: String,
    pub direction: TradeDirection,
    pub input_token: String,
    pub output_token: String,
    pub input_amount: f64,
    pub output_amount: f64,
    pub price: f64,
    pub status: TradeStatus,
    pub executed_at: DateTime<Utc>,
}

/// Compact trade view returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSummary {
    pub signature: String,
    pub input_token: String,
    pub output_token: String,
    pub input_amount: f64,
    pub output_amount: f64,
    pub price: f64,
}

impl From<&Trade> for TradeSummary {
    fn from(trade: &Trade) -> Self {
        Self {
            signature: trade.signature.clone(),
            input_token: trade.input_token.clone(),
            output_token: trade.output_token.clone(),
            input_amount: trade.input_amount,
            output_amount: trade.output_amount,
            price: trade.price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationStatus {
    TradeExecuted,
    NoOpportunities,
    AlreadyBought,
    Error,
}

/// Exactly one outcome per strategy per cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub strategy_id: i64,
    pub strategy_name: String,
    pub status: EvaluationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade: Option<TradeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EvaluationOutcome {
    pub fn new(strategy_id: i64, strategy_name: &str, status: EvaluationStatus) -> Self {
        Self {
            strategy_id,
            strategy_name: strategy_name.to_string(),
            status,
            trade: None,
            message: None,
        }
    }

    pub fn with_trade(mut self, trade: TradeSummary) -> Self {
        self.trade = Some(trade);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
