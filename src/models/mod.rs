//! Shared data models spanning the engine layers.

pub mod market;
pub mod strategy;
pub mod trade;

pub use market::{Candle, CandidatePair, PairCriteria, TokenOverview};
pub use strategy::{
    Condition, ConditionalConfig, IndicatorKind, SniperConfig, Strategy, StrategyConfig,
    TradeDirection, TriggerKind,
};
pub use trade::{
    EvaluationOutcome, EvaluationStatus, Trade, TradeStatus, TradeSummary,
};
