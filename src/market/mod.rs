//! Market Data Gateway
//!
//! Fetches candle series and newly listed pairs from the upstream data
//! provider, with short-lived caching to absorb rate limits. Upstream
//! failures degrade to empty results: "no opportunities this cycle" is the
//! safe default.

pub mod birdeye;
pub mod cache;
pub mod gateway;
pub mod provider;

pub use birdeye::BirdeyeClient;
pub use cache::{Clock, SystemClock, TtlCache};
pub use gateway::MarketDataGateway;
pub use provider::MarketDataProvider;
