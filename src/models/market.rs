//! Market data models: candles, candidate pairs, token overviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }

    /// Typical price used by VWAP.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// A newly listed tradable pair observed by the market data gateway.
///
/// Ephemeral: lives for one evaluation cycle and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatePair {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub liquidity: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    pub listed_at: DateTime<Utc>,
    pub age_minutes: i64,
}

impl CandidatePair {
    /// Case-insensitive name filter. A single-character filter is a prefix
    /// match on symbol or name; longer filters match anywhere. The length
    /// switch is preserved from the documented behavior of the upstream
    /// product.
    pub fn matches_name_filter(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let filter = filter.to_lowercase();
        let symbol = self.symbol.to_lowercase();
        let name = self.name.to_lowercase();
        if filter.chars().count() == 1 {
            symbol.starts_with(&filter) || name.starts_with(&filter)
        } else {
            symbol.contains(&filter) || name.contains(&filter)
        }
    }
}

/// Numeric bounds for candidate pair screening. Every bound given must be
/// satisfied; absent bounds are no-ops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairCriteria {
    pub max_age_minutes: Option<i64>,
    pub min_liquidity: Option<f64>,
    pub max_liquidity: Option<f64>,
    pub min_volume_24h: Option<f64>,
    pub min_market_cap: Option<f64>,
    pub max_market_cap: Option<f64>,
}

impl PairCriteria {
    pub fn accepts(&self, pair: &CandidatePair) -> bool {
        if let Some(max_age) = self.max_age_minutes {
            if pair.age_minutes > max_age {
                return false;
            }
        }
        if let Some(min) = self.min_liquidity {
            if pair.liquidity < min {
                return false;
            }
        }
        if let Some(max) = self.max_liquidity {
            if pair.liquidity > max {
                return false;
            }
        }
        if let Some(min) = self.min_volume_24h {
            if pair.volume_24h < min {
                return false;
            }
        }
        if let Some(min) = self.min_market_cap {
            if pair.market_cap < min {
                return false;
            }
        }
        if let Some(max) = self.max_market_cap {
            if pair.market_cap > max {
                return false;
            }
        }
        true
    }
}

/// Snapshot stats for a single token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenOverview {
    pub address: String,
    pub price: f64,
    pub liquidity: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    pub holder_count: Option<u64>,
}
