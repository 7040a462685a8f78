//! Shared fakes and builders for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tradewind::db::MemoryStore;
use tradewind::engine::{ExecutionEngine, StrategyEvaluator};
use tradewind::errors::{EngineError, Result};
use tradewind::market::{MarketDataGateway, MarketDataProvider};
use tradewind::models::market::{Candle, CandidatePair, TokenOverview};
use tradewind::models::strategy::{
    Condition, ConditionalConfig, SniperConfig, Strategy, StrategyConfig, TradeDirection,
};
use tradewind::swap::{
    Quote, SwapReceipt, SwapRequest, SwapService, StaticWalletProvider, Wallet, WalletProvider,
};

pub const OWNER: &str = "user-1";
pub const TOKEN: &str = "TokenMint1111111111111111111111111111111111";

/// Valid base58 signing secret for test wallets.
pub fn test_secret() -> String {
    bs58::encode([7u8; 32]).into_string()
}

pub fn candle(close: f64) -> Candle {
    Candle::new(close, close + 1.0, close - 1.0, close, 1000.0, Utc::now())
}

pub fn candles(closes: &[f64]) -> Vec<Candle> {
    closes.iter().map(|&c| candle(c)).collect()
}

pub fn candidate_pair(address: &str, symbol: &str) -> CandidatePair {
    CandidatePair {
        address: address.to_string(),
        symbol: symbol.to_string(),
        name: format!("{} Token", symbol),
        price: 0.001,
        liquidity: 50_000.0,
        volume_24h: 100_000.0,
        market_cap: 250_000.0,
        listed_at: Utc::now() - Duration::minutes(5),
        age_minutes: 5,
    }
}

pub fn sniper_config() -> SniperConfig {
    SniperConfig {
        amount: 0.1,
        slippage_bps: 100,
        max_age_minutes: 60,
        min_liquidity: Some(10_000.0),
        max_liquidity: None,
        min_volume: None,
        min_market_cap: None,
        max_market_cap: None,
        name_filter: None,
        stop_loss_pct: None,
        take_profit_pct: None,
    }
}

pub fn conditional_config(condition: Option<Condition>) -> ConditionalConfig {
    ConditionalConfig {
        amount: 0.5,
        slippage_bps: 50,
        input_token: Some(TOKEN.to_string()),
        output_token: None,
        direction: TradeDirection::Buy,
        condition,
        stop_loss_pct: None,
        take_profit_pct: None,
    }
}

pub fn strategy(id: i64, owner: &str, config: StrategyConfig) -> Strategy {
    let now = Utc::now();
    Strategy {
        id: Some(id),
        owner_id: owner.to_string(),
        name: format!("strategy-{}", id),
        description: String::new(),
        config,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Market data provider with preset responses and call counters.
#[derive(Default)]
pub struct FakeMarket {
    pub candles: Mutex<Vec<Candle>>,
    pub pairs: Mutex<Vec<CandidatePair>>,
    pub fail: Mutex<bool>,
    pub candle_calls: AtomicUsize,
    pub pair_calls: AtomicUsize,
}

impl FakeMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candles(self, candles: Vec<Candle>) -> Self {
        *self.candles.lock().unwrap() = candles;
        self
    }

    pub fn with_pairs(self, pairs: Vec<CandidatePair>) -> Self {
        *self.pairs.lock().unwrap() = pairs;
        self
    }

    pub fn failing(self) -> Self {
        *self.fail.lock().unwrap() = true;
        self
    }
}

#[async_trait]
impl MarketDataProvider for FakeMarket {
    async fn fetch_candles(
        &self,
        _token: &str,
        _timeframe: &str,
        _limit: usize,
    ) -> Result<Vec<Candle>> {
        self.candle_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock().unwrap() {
            return Err(EngineError::MarketData("upstream down".to_string()));
        }
        Ok(self.candles.lock().unwrap().clone())
    }

    async fn fetch_new_pairs(&self, _limit: usize) -> Result<Vec<CandidatePair>> {
        self.pair_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock().unwrap() {
            return Err(EngineError::MarketData("upstream down".to_string()));
        }
        Ok(self.pairs.lock().unwrap().clone())
    }

    async fn token_overview(&self, token: &str) -> Result<TokenOverview> {
        Err(EngineError::MarketData(format!("no overview for {}", token)))
    }
}

/// Swap service that records requests and returns scripted receipts.
#[derive(Default)]
pub struct FakeSwap {
    pub requests: Mutex<Vec<SwapRequest>>,
    pub fail: Mutex<bool>,
    pub executed: AtomicUsize,
}

impl FakeSwap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(self) -> Self {
        *self.fail.lock().unwrap() = true;
        self
    }

    pub fn recorded_requests(&self) -> Vec<SwapRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SwapService for FakeSwap {
    async fn quote(&self, request: &SwapRequest) -> Result<Quote> {
        Ok(Quote {
            input_mint: request.input_token.clone(),
            output_mint: request.output_token.clone(),
            in_amount: 100_000_000,
            out_amount: 2_000_000,
            price_impact_pct: 0.05,
            raw: serde_json::json!({}),
        })
    }

    async fn execute(&self, _wallet: &Wallet, request: &SwapRequest) -> Result<SwapReceipt> {
        self.requests.lock().unwrap().push(request.clone());
        if *self.fail.lock().unwrap() {
            return Err(EngineError::Broadcast("node rejected".to_string()));
        }
        let n = self.executed.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SwapReceipt {
            signature: format!("sig-{}", n),
            input_amount: request.amount,
            output_amount: 2.0,
            price_impact_pct: 0.05,
        })
    }
}

/// Fully wired engine over in-memory fakes.
pub struct TestEngine {
    pub engine: ExecutionEngine,
    pub store: Arc<MemoryStore>,
    pub market: Arc<FakeMarket>,
    pub swap: Arc<FakeSwap>,
}

impl TestEngine {
    pub fn new(market: FakeMarket, swap: FakeSwap) -> Self {
        let store = Arc::new(MemoryStore::new());
        let market = Arc::new(market);
        let swap = Arc::new(swap);
        let wallets: Arc<dyn WalletProvider> =
            Arc::new(StaticWalletProvider::single(OWNER, &test_secret()));
        let evaluator = StrategyEvaluator::new(
            Arc::new(MarketDataGateway::new(market.clone())),
            swap.clone(),
            wallets,
            store.clone(),
        );
        let engine = ExecutionEngine::new(evaluator, store.clone());
        Self {
            engine,
            store,
            market,
            swap,
        }
    }

    /// Same wiring, but no wallet configured for any owner.
    pub fn without_wallets(market: FakeMarket, swap: FakeSwap) -> Self {
        let mut wired = Self::new(market, swap);
        let wallets: Arc<dyn WalletProvider> =
            Arc::new(StaticWalletProvider::new(Default::default()));
        let evaluator = StrategyEvaluator::new(
            Arc::new(MarketDataGateway::new(wired.market.clone())),
            wired.swap.clone(),
            wallets,
            wired.store.clone(),
        );
        wired.engine = ExecutionEngine::new(evaluator, wired.store.clone());
        wired
    }
}
