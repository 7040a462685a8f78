//! Caching gateway in front of the market data provider.

use crate::errors::Result;
use crate::market::cache::TtlCache;
use crate::market::provider::MarketDataProvider;
use crate::models::market::{Candle, CandidatePair, PairCriteria, TokenOverview};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// TTL applied to every query family. Short enough to stay fresh, long
/// enough to absorb upstream rate limits across strategies in one cycle.
pub const CACHE_TTL: Duration = Duration::from_secs(30);

pub struct MarketDataGateway {
    provider: Arc<dyn MarketDataProvider>,
    candle_cache: TtlCache<Vec<Candle>>,
    pair_cache: TtlCache<Vec<CandidatePair>>,
}

impl MarketDataGateway {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self::with_caches(
            provider,
            TtlCache::new(CACHE_TTL),
            TtlCache::new(CACHE_TTL),
        )
    }

    pub fn with_caches(
        provider: Arc<dyn MarketDataProvider>,
        candle_cache: TtlCache<Vec<Candle>>,
        pair_cache: TtlCache<Vec<CandidatePair>>,
    ) -> Self {
        Self {
            provider,
            candle_cache,
            pair_cache,
        }
    }

    /// Candle history, oldest first. A provider failure degrades to an
    /// empty series.
    pub async fn fetch_candles(
        &self,
        token: &str,
        timeframe: &str,
        limit: usize,
    ) -> Vec<Candle> {
        let key = format!("candles:{}:{}:{}", token, timeframe, limit);
        if let Some(cached) = self.candle_cache.get(&key) {
            return cached;
        }

        match self.provider.fetch_candles(token, timeframe, limit).await {
            Ok(candles) => {
                self.candle_cache.insert(key, candles.clone());
                candles
            }
            Err(e) => {
                warn!(token = %token, timeframe = %timeframe, error = %e, "candle fetch failed, degrading to empty");
                Vec::new()
            }
        }
    }

    /// Newly listed pairs. A provider failure degrades to an empty list.
    pub async fn fetch_new_pairs(&self, limit: usize) -> Vec<CandidatePair> {
        let key = format!("new_pairs:{}", limit);
        if let Some(cached) = self.pair_cache.get(&key) {
            return cached;
        }

        match self.provider.fetch_new_pairs(limit).await {
            Ok(pairs) => {
                self.pair_cache.insert(key, pairs.clone());
                pairs
            }
            Err(e) => {
                warn!(error = %e, "new pair fetch failed, degrading to empty");
                Vec::new()
            }
        }
    }

    /// New pairs screened by conjunctive criteria.
    pub async fn fetch_filtered_new_pairs(
        &self,
        criteria: &PairCriteria,
        limit: usize,
    ) -> Vec<CandidatePair> {
        self.fetch_new_pairs(limit)
            .await
            .into_iter()
            .filter(|pair| criteria.accepts(pair))
            .collect()
    }

    pub async fn token_overview(&self, token: &str) -> Result<TokenOverview> {
        self.provider.token_overview(token).await
    }
}
