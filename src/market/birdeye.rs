//! Birdeye-compatible market data client.

use crate::errors::{EngineError, Result};
use crate::models::market::{Candle, CandidatePair, TokenOverview};
use crate::market::provider::MarketDataProvider;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

pub struct BirdeyeClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct CandleItems {
    items: Vec<CandleItem>,
}

#[derive(Debug, Deserialize)]
struct CandleItem {
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
    #[serde(rename = "unixTime")]
    unix_time: i64,
}

#[derive(Debug, Deserialize)]
struct ListingItems {
    items: Vec<ListingItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingItem {
    address: String,
    symbol: String,
    name: String,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    liquidity: f64,
    #[serde(default, rename = "v24hUSD")]
    volume_24h: f64,
    #[serde(default, rename = "mc")]
    market_cap: f64,
    #[serde(rename = "listedAt")]
    listed_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverviewItem {
    address: String,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    liquidity: f64,
    #[serde(default, rename = "v24hUSD")]
    volume_24h: f64,
    #[serde(default, rename = "mc")]
    market_cap: f64,
    #[serde(rename = "holder")]
    holder_count: Option<u64>,
}

impl BirdeyeClient {
    pub fn new() -> Self {
        Self::with_client(
            crate::config::get_market_data_url(),
            crate::config::get_market_data_api_key(),
            reqwest::Client::new(),
        )
    }

    /// Base URL and client are injectable so tests can point at a mock
    /// server.
    pub fn with_client(base_url: String, api_key: String, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: url::Url) -> Result<T> {
        let fetch = || async {
            self.client
                .get(url.clone())
                .header("X-API-KEY", &self.api_key)
                .timeout(Duration::from_secs(10))
                .send()
                .await?
                .error_for_status()?
                .json::<T>()
                .await
        };

        // Transient upstream hiccups get a couple of quick retries; anything
        // beyond that is reported to the gateway, which degrades to empty.
        fetch
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(200))
                    .with_max_times(2),
            )
            .await
            .map_err(|e| EngineError::MarketData(e.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<url::Url> {
        url::Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| EngineError::MarketData(format!("invalid url: {}", e)))
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for BirdeyeClient {
    async fn fetch_candles(
        &self,
        token: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let mut url = self.endpoint("/defi/ohlcv")?;
        url.query_pairs_mut()
            .append_pair("address", token)
            .append_pair("type", timeframe)
            .append_pair("limit", &limit.to_string());

        let envelope: ApiEnvelope<CandleItems> = self.get_json(url).await?;
        let mut candles: Vec<Candle> = envelope
            .data
            .items
            .into_iter()
            .map(|item| {
                Candle::new(
                    item.o,
                    item.h,
                    item.l,
                    item.c,
                    item.v,
                    DateTime::from_timestamp(item.unix_time, 0).unwrap_or_else(Utc::now),
                )
            })
            .collect();
        candles.sort_by_key(|c| c.timestamp);
        Ok(candles)
    }

    async fn fetch_new_pairs(&self, limit: usize) -> Result<Vec<CandidatePair>> {
        let mut url = self.endpoint("/defi/v2/tokens/new_listing")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let envelope: ApiEnvelope<ListingItems> = self.get_json(url).await?;
        let now = Utc::now();
        Ok(envelope
            .data
            .items
            .into_iter()
            .map(|item| {
                let listed_at =
                    DateTime::from_timestamp(item.listed_at, 0).unwrap_or(now);
                CandidatePair {
                    age_minutes: (now - listed_at).num_minutes(),
                    address: item.address,
                    symbol: item.symbol,
                    name: item.name,
                    price: item.price,
                    liquidity: item.liquidity,
                    volume_24h: item.volume_24h,
                    market_cap: item.market_cap,
                    listed_at,
                }
            })
            .collect())
    }

    async fn token_overview(&self, token: &str) -> Result<TokenOverview> {
        let mut url = self.endpoint("/defi/token_overview")?;
        url.query_pairs_mut().append_pair("address", token);

        let envelope: ApiEnvelope<OverviewItem> = self.get_json(url).await?;
        let item = envelope.data;
        Ok(TokenOverview {
            address: item.address,
            price: item.price,
            liquidity: item.liquidity,
            volume_24h: item.volume_24h,
            market_cap: item.market_cap,
            holder_count: item.holder_count,
        })
    }
}

impl Default for BirdeyeClient {
    fn default() -> Self {
        Self::new()
    }
}
