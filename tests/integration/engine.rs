//! End-to-end engine cycles over in-memory collaborators.

use crate::test_utils::*;
use tradewind::models::strategy::{
    Condition, IndicatorKind, StrategyConfig, TradeDirection, TriggerKind,
};
use tradewind::models::trade::EvaluationStatus;
use tradewind::swap::NATIVE_MINT;

#[tokio::test]
async fn sniper_buys_first_matching_pair() {
    let market = FakeMarket::new().with_pairs(vec![candidate_pair("MintA", "DOGE")]);
    let t = TestEngine::new(market, FakeSwap::new());
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Sniper(sniper_config())));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, EvaluationStatus::TradeExecuted);

    let trade = outcomes[0].trade.as_ref().expect("trade summary");
    assert_eq!(trade.input_token, NATIVE_MINT);
    assert_eq!(trade.output_token, "MintA");
    assert_eq!(trade.input_amount, 0.1);

    let requests = t.swap.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].slippage_bps, 100);

    // Trade persisted with the buy recorded against the owner.
    let persisted = t.store.trades();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].owner_id, OWNER);
    assert_eq!(persisted[0].strategy_type, "SNIPER");
}

#[tokio::test]
async fn sniper_with_no_candidates_reports_no_opportunities() {
    let t = TestEngine::new(FakeMarket::new(), FakeSwap::new());
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Sniper(sniper_config())));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::NoOpportunities);
    assert!(t.swap.recorded_requests().is_empty());
}

#[tokio::test]
async fn upstream_failure_degrades_to_no_opportunities() {
    let t = TestEngine::new(FakeMarket::new().failing(), FakeSwap::new());
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Sniper(sniper_config())));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    // Market data outage is "nothing to do this cycle", never an error.
    assert_eq!(outcomes[0].status, EvaluationStatus::NoOpportunities);
}

#[tokio::test]
async fn sniper_skips_tokens_bought_in_trailing_window() {
    let market = FakeMarket::new().with_pairs(vec![candidate_pair("MintA", "DOGE")]);
    let t = TestEngine::new(market, FakeSwap::new());
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Sniper(sniper_config())));

    // A recent buy of the same mint puts it in the dedup set.
    let mut prior = tradewind::models::trade::Trade {
        id: Some(99),
        owner_id: OWNER.to_string(),
        signature: "prior-sig".to_string(),
        strategy_type: "SNIPER".to_string(),
        direction: TradeDirection::Buy,
        input_token: NATIVE_MINT.to_string(),
        output_token: "MintA".to_string(),
        input_amount: 0.1,
        output_amount: 1.0,
        price: 0.001,
        status: tradewind::models::trade::TradeStatus::Confirmed,
        executed_at: chrono::Utc::now(),
    };
    prior.executed_at = chrono::Utc::now() - chrono::Duration::hours(1);
    t.store.insert_trade(prior);

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::AlreadyBought);
    assert!(t.swap.recorded_requests().is_empty());
}

#[tokio::test]
async fn two_snipers_cannot_buy_the_same_token_in_one_cycle() {
    let market = FakeMarket::new().with_pairs(vec![candidate_pair("MintA", "DOGE")]);
    let t = TestEngine::new(market, FakeSwap::new());
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Sniper(sniper_config())));
    t.store
        .insert_strategy(strategy(2, OWNER, StrategyConfig::Sniper(sniper_config())));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::TradeExecuted);
    assert_eq!(outcomes[1].status, EvaluationStatus::AlreadyBought);
    assert_eq!(t.swap.recorded_requests().len(), 1);
}

#[tokio::test]
async fn sniper_name_filter_uses_prefix_for_single_character() {
    let market = FakeMarket::new().with_pairs(vec![
        candidate_pair("MintA", "ADOG"),
        candidate_pair("MintB", "DOGE"),
    ]);
    let t = TestEngine::new(market, FakeSwap::new());
    let mut config = sniper_config();
    config.name_filter = Some("d".to_string());
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Sniper(config)));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::TradeExecuted);
    // "ADOG" contains "d" but does not start with it.
    assert_eq!(
        outcomes[0].trade.as_ref().unwrap().output_token,
        "MintB"
    );
}

#[tokio::test]
async fn missing_wallet_yields_error_outcome() {
    let market = FakeMarket::new().with_pairs(vec![candidate_pair("MintA", "DOGE")]);
    let t = TestEngine::without_wallets(market, FakeSwap::new());
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Sniper(sniper_config())));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::Error);
    assert!(outcomes[0]
        .message
        .as_ref()
        .unwrap()
        .contains("no wallet available"));
    assert!(t.swap.recorded_requests().is_empty());
}

#[tokio::test]
async fn sniper_with_non_positive_amount_is_a_config_error() {
    let market = FakeMarket::new().with_pairs(vec![candidate_pair("MintA", "DOGE")]);
    let t = TestEngine::new(market, FakeSwap::new());
    let mut config = sniper_config();
    config.amount = 0.0;
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Sniper(config)));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::Error);
    assert!(outcomes[0]
        .message
        .as_ref()
        .unwrap()
        .contains("amount must be positive"));
    // Rejected before any market query or swap.
    assert_eq!(
        t.market
            .pair_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
    assert!(t.swap.recorded_requests().is_empty());
}

#[tokio::test]
async fn missing_wallet_surfaces_even_without_opportunities() {
    // No candidate pairs at all: the misconfiguration must still be
    // reported instead of a quiet NO_OPPORTUNITIES.
    let t = TestEngine::without_wallets(FakeMarket::new(), FakeSwap::new());
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Sniper(sniper_config())));
    let condition = Condition {
        indicator: IndicatorKind::Ema,
        period: 3,
        timeframe: "1h".to_string(),
        trigger: TriggerKind::CrossesAbove,
        value: None,
    };
    t.store.insert_strategy(strategy(
        2,
        OWNER,
        StrategyConfig::Conditional(conditional_config(Some(condition))),
    ));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        assert_eq!(outcome.status, EvaluationStatus::Error);
        assert!(outcome
            .message
            .as_ref()
            .unwrap()
            .contains("no wallet available"));
    }
    assert!(t.swap.recorded_requests().is_empty());
}

#[tokio::test]
async fn swap_failure_leaves_strategy_active() {
    let market = FakeMarket::new().with_pairs(vec![candidate_pair("MintA", "DOGE")]);
    let t = TestEngine::new(market, FakeSwap::new().failing());
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Sniper(sniper_config())));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::Error);
    assert!(t.store.trades().is_empty());
    assert!(t.store.strategy(1).unwrap().is_active);
}

#[tokio::test]
async fn conditional_fires_once_and_deactivates() {
    // Flat history, a dip, then a close clearly above the EMA.
    let mut closes = vec![100.0; 10];
    closes.push(95.0);
    closes.push(110.0);
    let market = FakeMarket::new().with_candles(candles(&closes));
    let t = TestEngine::new(market, FakeSwap::new());

    let condition = Condition {
        indicator: IndicatorKind::Ema,
        period: 3,
        timeframe: "1h".to_string(),
        trigger: TriggerKind::CrossesAbove,
        value: None,
    };
    t.store.insert_strategy(strategy(
        1,
        OWNER,
        StrategyConfig::Conditional(conditional_config(Some(condition))),
    ));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::TradeExecuted);
    assert!(!t.store.strategy(1).unwrap().is_active);

    let persisted = t.store.trades();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].strategy_type, "CONDITIONAL");
    // Recorded price is the last close.
    assert_eq!(persisted[0].price, 110.0);

    // Deactivated strategy never runs again.
    let next = t.engine.evaluate_user(OWNER).await.expect("cycle");
    assert!(next.is_empty());
    assert_eq!(t.swap.recorded_requests().len(), 1);
}

#[tokio::test]
async fn conditional_not_triggered_reports_no_opportunities() {
    // Price stays below a constant level.
    let market = FakeMarket::new().with_candles(candles(&[100.0, 101.0, 102.0, 103.0]));
    let t = TestEngine::new(market, FakeSwap::new());

    let condition = Condition {
        indicator: IndicatorKind::Price,
        period: 1,
        timeframe: "1h".to_string(),
        trigger: TriggerKind::PriceAbove,
        value: Some(500.0),
    };
    t.store.insert_strategy(strategy(
        1,
        OWNER,
        StrategyConfig::Conditional(conditional_config(Some(condition))),
    ));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::NoOpportunities);
    assert!(t.store.strategy(1).unwrap().is_active);
}

#[tokio::test]
async fn conditional_sell_routes_token_to_native() {
    let market = FakeMarket::new().with_candles(candles(&[100.0, 95.0, 120.0]));
    let t = TestEngine::new(market, FakeSwap::new());

    let condition = Condition {
        indicator: IndicatorKind::Price,
        period: 1,
        timeframe: "1h".to_string(),
        trigger: TriggerKind::PriceAbove,
        value: Some(110.0),
    };
    let mut config = conditional_config(Some(condition));
    config.direction = TradeDirection::Sell;
    t.store
        .insert_strategy(strategy(1, OWNER, StrategyConfig::Conditional(config)));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::TradeExecuted);
    let requests = t.swap.recorded_requests();
    assert_eq!(requests[0].input_token, TOKEN);
    assert_eq!(requests[0].output_token, NATIVE_MINT);
}

#[tokio::test]
async fn conditional_without_condition_is_a_config_error() {
    let t = TestEngine::new(FakeMarket::new(), FakeSwap::new());
    t.store.insert_strategy(strategy(
        1,
        OWNER,
        StrategyConfig::Conditional(conditional_config(None)),
    ));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::Error);
    // Config problems are rejected before any network call.
    assert_eq!(
        t.market
            .candle_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn insufficient_history_reports_no_opportunities() {
    let market = FakeMarket::new().with_candles(candles(&[100.0, 101.0]));
    let t = TestEngine::new(market, FakeSwap::new());

    let condition = Condition {
        indicator: IndicatorKind::Rsi,
        period: 14,
        timeframe: "1h".to_string(),
        trigger: TriggerKind::PriceBelow,
        value: None,
    };
    t.store.insert_strategy(strategy(
        1,
        OWNER,
        StrategyConfig::Conditional(conditional_config(Some(condition))),
    ));

    let outcomes = t.engine.evaluate_user(OWNER).await.expect("cycle");

    assert_eq!(outcomes[0].status, EvaluationStatus::NoOpportunities);
}

#[tokio::test]
async fn user_without_strategies_is_a_fast_no_op() {
    let t = TestEngine::new(FakeMarket::new(), FakeSwap::new());

    let outcomes = t.engine.evaluate_user("nobody").await.expect("cycle");

    assert!(outcomes.is_empty());
    assert_eq!(
        t.market
            .pair_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}
