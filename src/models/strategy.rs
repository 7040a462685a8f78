//! Strategy entity and its type-tagged configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's standing trading strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub id: Option<i64>,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub config: StrategyConfig,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Type-tagged configuration. Each variant carries only the fields its
/// strategy type actually reads, so illegal combinations are
/// unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyConfig {
    Sniper(SniperConfig),
    Conditional(ConditionalConfig),
    Spot(SpotConfig),
}

impl StrategyConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyConfig::Sniper(_) => "SNIPER",
            StrategyConfig::Conditional(_) => "CONDITIONAL",
            StrategyConfig::Spot(_) => "SPOT",
        }
    }
}

/// New-listing screener configuration. Sniper strategies stay active
/// indefinitely and fire at most once per candidate token per dedup window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SniperConfig {
    /// Amount of the native asset to spend, in whole units.
    pub amount: f64,
    pub slippage_bps: u16,
    pub max_age_minutes: i64,
    pub min_liquidity: Option<f64>,
    pub max_liquidity: Option<f64>,
    pub min_volume: Option<f64>,
    pub min_market_cap: Option<f64>,
    pub max_market_cap: Option<f64>,
    pub name_filter: Option<String>,
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
}

/// Indicator-trigger configuration. A conditional strategy deactivates
/// itself atomically with the single trade it fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalConfig {
    pub amount: f64,
    pub slippage_bps: u16,
    pub input_token: Option<String>,
    pub output_token: Option<String>,
    pub direction: TradeDirection,
    pub condition: Option<Condition>,
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
}

/// Immediate one-off swap configuration, executed by the chat layer rather
/// than the periodic engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotConfig {
    pub amount: f64,
    pub slippage_bps: u16,
    pub input_token: String,
    pub output_token: String,
    pub direction: TradeDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// Indicator condition evaluated against candle history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub indicator: IndicatorKind,
    pub period: usize,
    pub timeframe: String,
    pub trigger: TriggerKind,
    /// Explicit threshold. For RSI triggers this is an RSI level
    /// (default 30); for PRICE it is the target price.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorKind {
    Ema,
    Rsi,
    Sma,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    PriceAbove,
    PriceBelow,
    PriceTouches,
    CrossesAbove,
    CrossesBelow,
}
