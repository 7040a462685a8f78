//! Market data provider interface.

use crate::errors::Result;
use crate::models::market::{Candle, CandidatePair, TokenOverview};

#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Historical candles for a token, oldest first.
    async fn fetch_candles(
        &self,
        token: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>>;

    /// Most recently listed pairs, newest first.
    async fn fetch_new_pairs(&self, limit: usize) -> Result<Vec<CandidatePair>>;

    /// Price/liquidity/volume snapshot for one token.
    async fn token_overview(&self, token: &str) -> Result<TokenOverview>;
}
