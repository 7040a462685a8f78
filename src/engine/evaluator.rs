//! Per-strategy evaluation state machine.
//!
//! Every call maps one strategy to exactly one [`EvaluationOutcome`]; all
//! failure paths are folded into the outcome rather than surfaced as errors
//! so one broken strategy never aborts a user's cycle.

use crate::db::store::StrategyStore;
use crate::errors::EngineError;
use crate::indicators::{ema, rsi, sma};
use crate::market::MarketDataGateway;
use crate::models::market::PairCriteria;
use crate::models::strategy::{
    Condition, ConditionalConfig, IndicatorKind, SniperConfig, Strategy, StrategyConfig,
    TradeDirection, TriggerKind,
};
use crate::models::trade::{
    EvaluationOutcome, EvaluationStatus, Trade, TradeStatus,
};
use crate::swap::{
    token_decimals, SwapRequest, SwapService, Wallet, WalletProvider, NATIVE_DECIMALS, NATIVE_MINT,
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How many freshly listed pairs to pull per sniper evaluation.
const NEW_PAIR_LIMIT: usize = 50;

/// Default RSI threshold when a condition omits an explicit value.
const DEFAULT_RSI_THRESHOLD: f64 = 30.0;

/// "Touches" tolerance for RSI triggers, in RSI points.
const RSI_TOUCH_POINTS: f64 = 2.0;

/// "Touches" tolerance for price-vs-indicator triggers, relative.
const PRICE_TOUCH_RATIO: f64 = 0.005;

pub struct StrategyEvaluator {
    market: Arc<MarketDataGateway>,
    swap: Arc<dyn SwapService>,
    wallets: Arc<dyn WalletProvider>,
    store: Arc<dyn StrategyStore>,
}

impl StrategyEvaluator {
    pub fn new(
        market: Arc<MarketDataGateway>,
        swap: Arc<dyn SwapService>,
        wallets: Arc<dyn WalletProvider>,
        store: Arc<dyn StrategyStore>,
    ) -> Self {
        Self {
            market,
            swap,
            wallets,
            store,
        }
    }

    /// Evaluate one strategy. `bought` is the cycle's dedup set of token
    /// addresses; tokens bought here are folded into it before returning.
    pub async fn evaluate(
        &self,
        strategy: &Strategy,
        bought: &mut HashSet<String>,
    ) -> EvaluationOutcome {
        let id = strategy.id.unwrap_or_default();
        debug!(
            strategy_id = id,
            strategy_type = strategy.config.kind(),
            owner = %strategy.owner_id,
            "evaluating strategy"
        );

        match &strategy.config {
            StrategyConfig::Sniper(config) => {
                self.evaluate_sniper(strategy, config, bought).await
            }
            StrategyConfig::Conditional(config) => {
                self.evaluate_conditional(strategy, config, bought).await
            }
            // Spot strategies execute immediately at creation time and are
            // never part of the periodic cycle.
            StrategyConfig::Spot(_) => EvaluationOutcome::new(
                id,
                &strategy.name,
                EvaluationStatus::NoOpportunities,
            )
            .with_message("spot strategies are not evaluated by the engine"),
        }
    }

    async fn evaluate_sniper(
        &self,
        strategy: &Strategy,
        config: &SniperConfig,
        bought: &mut HashSet<String>,
    ) -> EvaluationOutcome {
        let id = strategy.id.unwrap_or_default();

        if !(config.amount.is_finite() && config.amount > 0.0) {
            return EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::Error)
                .with_message(
                    EngineError::Config("swap amount must be positive".to_string()).to_string(),
                );
        }

        // A strategy whose owner has no signing key is misconfigured; that
        // is surfaced every cycle, opportunity or not.
        let wallet = match self.wallets.wallet_for(&strategy.owner_id) {
            Ok(wallet) => wallet,
            Err(e) => {
                warn!(strategy_id = id, owner = %strategy.owner_id, error = %e, "wallet unavailable");
                return EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::Error)
                    .with_message(e.to_string());
            }
        };

        let criteria = PairCriteria {
            max_age_minutes: Some(config.max_age_minutes),
            min_liquidity: config.min_liquidity,
            max_liquidity: config.max_liquidity,
            min_volume_24h: config.min_volume,
            min_market_cap: config.min_market_cap,
            max_market_cap: config.max_market_cap,
        };

        let mut candidates = self
            .market
            .fetch_filtered_new_pairs(&criteria, NEW_PAIR_LIMIT)
            .await;
        if let Some(ref filter) = config.name_filter {
            candidates.retain(|pair| pair.matches_name_filter(filter));
        }

        if candidates.is_empty() {
            return EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::NoOpportunities);
        }

        let Some(candidate) = candidates.iter().find(|p| !bought.contains(&p.address)) else {
            debug!(strategy_id = id, "all candidates already bought in window");
            return EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::AlreadyBought);
        };

        let request = SwapRequest {
            input_token: NATIVE_MINT.to_string(),
            output_token: candidate.address.clone(),
            amount: config.amount,
            input_decimals: NATIVE_DECIMALS,
            output_decimals: token_decimals(&candidate.address),
            slippage_bps: config.slippage_bps,
        };

        let receipt = match self.swap.execute(&wallet, &request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(strategy_id = id, token = %candidate.address, error = %e, "sniper swap failed");
                return EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::Error)
                    .with_message(e.to_string());
            }
        };

        let trade = Trade {
            id: None,
            owner_id: strategy.owner_id.clone(),
            signature: receipt.signature.clone(),
            strategy_type: strategy.config.kind().to_string(),
            direction: TradeDirection::Buy,
            input_token: request.input_token.clone(),
            output_token: request.output_token.clone(),
            input_amount: receipt.input_amount,
            output_amount: receipt.output_amount,
            price: candidate.price,
            status: TradeStatus::Confirmed,
            executed_at: Utc::now(),
        };

        if let Err(e) = self.store.record_trade(&trade).await {
            warn!(strategy_id = id, signature = %trade.signature, error = %e, "trade executed but not persisted");
            return EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::Error)
                .with_message(format!("trade {} not persisted: {}", trade.signature, e));
        }

        bought.insert(candidate.address.clone());
        info!(
            strategy_id = id,
            token = %candidate.address,
            signature = %trade.signature,
            "sniper trade executed"
        );

        EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::TradeExecuted)
            .with_trade((&trade).into())
    }

    async fn evaluate_conditional(
        &self,
        strategy: &Strategy,
        config: &ConditionalConfig,
        bought: &mut HashSet<String>,
    ) -> EvaluationOutcome {
        let id = strategy.id.unwrap_or_default();

        // Configuration problems produce an error outcome without touching
        // the network.
        let (token, condition) = match validate_conditional(config) {
            Ok(parts) => parts,
            Err(e) => {
                return EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::Error)
                    .with_message(e.to_string())
            }
        };

        // Authorization problems likewise surface before any network call,
        // even on cycles where the condition would not have fired.
        let wallet = match self.wallets.wallet_for(&strategy.owner_id) {
            Ok(wallet) => wallet,
            Err(e) => {
                warn!(strategy_id = id, owner = %strategy.owner_id, error = %e, "wallet unavailable");
                return EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::Error)
                    .with_message(e.to_string());
            }
        };

        let limit = candle_limit(condition);
        let candles = self
            .market
            .fetch_candles(token, &condition.timeframe, limit)
            .await;
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        let triggered = match evaluate_condition(condition, &closes) {
            Some(triggered) => triggered,
            None => {
                debug!(strategy_id = id, token = %token, candles = closes.len(), "insufficient history");
                return EvaluationOutcome::new(
                    id,
                    &strategy.name,
                    EvaluationStatus::NoOpportunities,
                );
            }
        };

        if !triggered {
            return EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::NoOpportunities);
        }

        let request = match config.direction {
            TradeDirection::Buy => SwapRequest {
                input_token: NATIVE_MINT.to_string(),
                output_token: token.to_string(),
                amount: config.amount,
                input_decimals: NATIVE_DECIMALS,
                output_decimals: token_decimals(token),
                slippage_bps: config.slippage_bps,
            },
            TradeDirection::Sell => SwapRequest {
                input_token: token.to_string(),
                output_token: NATIVE_MINT.to_string(),
                amount: config.amount,
                input_decimals: token_decimals(token),
                output_decimals: NATIVE_DECIMALS,
                slippage_bps: config.slippage_bps,
            },
        };

        match self
            .execute_and_deactivate(strategy, config, &wallet, &request, &closes)
            .await
        {
            Ok(trade) => {
                if config.direction == TradeDirection::Buy {
                    bought.insert(trade.output_token.clone());
                }
                info!(
                    strategy_id = id,
                    token = %token,
                    signature = %trade.signature,
                    "conditional trade executed, strategy deactivated"
                );
                EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::TradeExecuted)
                    .with_trade((&trade).into())
            }
            Err(e) => {
                warn!(strategy_id = id, token = %token, error = %e, "conditional swap failed");
                EvaluationOutcome::new(id, &strategy.name, EvaluationStatus::Error)
                    .with_message(e.to_string())
            }
        }
    }

    async fn execute_and_deactivate(
        &self,
        strategy: &Strategy,
        config: &ConditionalConfig,
        wallet: &Wallet,
        request: &SwapRequest,
        closes: &[f64],
    ) -> crate::errors::Result<Trade> {
        let receipt = self.swap.execute(wallet, request).await?;

        let trade = Trade {
            id: None,
            owner_id: strategy.owner_id.clone(),
            signature: receipt.signature.clone(),
            strategy_type: strategy.config.kind().to_string(),
            direction: config.direction,
            input_token: request.input_token.clone(),
            output_token: request.output_token.clone(),
            input_amount: receipt.input_amount,
            output_amount: receipt.output_amount,
            price: closes.last().copied().unwrap_or_default(),
            status: TradeStatus::Confirmed,
            executed_at: Utc::now(),
        };

        let strategy_id = strategy.id.ok_or_else(|| {
            EngineError::Store("cannot deactivate an unpersisted strategy".to_string())
        })?;

        // Same transaction as the insert: a conditional strategy can never
        // fire twice.
        self.store
            .record_trade_and_deactivate(&trade, strategy_id)
            .await?;

        Ok(trade)
    }
}

/// Checks a conditional config for the fields the evaluator needs before
/// any network call is made.
fn validate_conditional(config: &ConditionalConfig) -> crate::errors::Result<(&str, &Condition)> {
    if !(config.amount.is_finite() && config.amount > 0.0) {
        return Err(EngineError::Config(
            "swap amount must be positive".to_string(),
        ));
    }
    let token = config
        .input_token
        .as_deref()
        .ok_or_else(|| EngineError::Config("conditional strategy has no input token".to_string()))?;
    let condition = config
        .condition
        .as_ref()
        .ok_or_else(|| EngineError::Config("conditional strategy has no condition".to_string()))?;
    if condition.period == 0 {
        return Err(EngineError::Config(
            "indicator period must be positive".to_string(),
        ));
    }
    if condition.indicator == IndicatorKind::Price && condition.value.is_none() {
        return Err(EngineError::Config(
            "price condition requires an explicit value".to_string(),
        ));
    }
    Ok((token, condition))
}

/// Candle count to request for one condition. Indicators need warmup
/// history beyond the period itself, EMA especially.
fn candle_limit(condition: &Condition) -> usize {
    (condition.period * 3).max(50)
}

/// Returns `Some(triggered)` or `None` when the series is too short to
/// define the indicator at the last two positions.
fn evaluate_condition(condition: &Condition, closes: &[f64]) -> Option<bool> {
    if closes.len() < 2 {
        return None;
    }
    let last = closes.len() - 1;
    let cur_close = closes[last];
    let prev_close = closes[last - 1];

    match condition.indicator {
        IndicatorKind::Rsi => {
            let series = rsi(closes, condition.period);
            let cur = series[last]?;
            let prev = series[last - 1]?;
            let threshold = condition.value.unwrap_or(DEFAULT_RSI_THRESHOLD);
            // RSI triggers compare the oscillator itself against the
            // threshold, not the price.
            Some(match condition.trigger {
                TriggerKind::PriceAbove => cur > threshold,
                TriggerKind::PriceBelow => cur < threshold,
                TriggerKind::PriceTouches => (cur - threshold).abs() <= RSI_TOUCH_POINTS,
                TriggerKind::CrossesAbove => prev <= threshold && cur > threshold,
                TriggerKind::CrossesBelow => prev >= threshold && cur < threshold,
            })
        }
        IndicatorKind::Ema | IndicatorKind::Sma => {
            let series = match condition.indicator {
                IndicatorKind::Ema => ema(closes, condition.period),
                _ => sma(closes, condition.period),
            };
            let cur = series[last]?;
            let prev = series[last - 1]?;
            Some(price_trigger(
                condition.trigger,
                prev_close,
                cur_close,
                prev,
                cur,
            ))
        }
        IndicatorKind::Price => {
            let target = condition.value?;
            Some(price_trigger(
                condition.trigger,
                prev_close,
                cur_close,
                target,
                target,
            ))
        }
    }
}

fn price_trigger(
    trigger: TriggerKind,
    prev_close: f64,
    cur_close: f64,
    prev_level: f64,
    cur_level: f64,
) -> bool {
    match trigger {
        TriggerKind::PriceAbove => cur_close > cur_level,
        TriggerKind::PriceBelow => cur_close < cur_level,
        TriggerKind::PriceTouches => {
            cur_level != 0.0 && ((cur_close - cur_level) / cur_level).abs() <= PRICE_TOUCH_RATIO
        }
        TriggerKind::CrossesAbove => prev_close <= prev_level && cur_close > cur_level,
        TriggerKind::CrossesBelow => prev_close >= prev_level && cur_close < cur_level,
    }
}
