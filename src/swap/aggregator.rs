//! Jupiter-compatible swap aggregator client.

use crate::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// A quote plus the raw response it came from. The raw value is passed back
/// verbatim to the build endpoint so the transaction is built against this
/// exact quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: u64,
    pub out_amount: u64,
    pub price_impact_pct: f64,
    pub raw: Value,
}

/// Signable transaction payload from the build endpoint.
#[derive(Debug, Clone)]
pub struct SwapTransaction {
    /// Base64-encoded serialized transaction with a placeholder signature.
    pub transaction: String,
    /// Not every aggregator reports this; callers fall back to a ledger
    /// blockhash query when absent.
    pub last_valid_block_height: Option<u64>,
}

pub struct AggregatorClient {
    base_url: String,
    client: reqwest::Client,
}

impl AggregatorClient {
    pub fn new() -> Self {
        Self::with_client(crate::config::get_aggregator_url(), reqwest::Client::new())
    }

    pub fn with_client(base_url: String, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub async fn quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        slippage_bps: u16,
    ) -> Result<Quote> {
        let mut url = url::Url::parse(&format!("{}/quote", self.base_url))
            .map_err(|e| EngineError::Quote(format!("invalid url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("inputMint", input_mint)
            .append_pair("outputMint", output_mint)
            .append_pair("amount", &amount.to_string())
            .append_pair("slippageBps", &slippage_bps.to_string());

        let raw: Value = self
            .client
            .get(url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| EngineError::Quote(e.to_string()))?
            .error_for_status()
            .map_err(|e| EngineError::Quote(e.to_string()))?
            .json()
            .await
            .map_err(|e| EngineError::Quote(e.to_string()))?;

        // Amount fields come back as decimal strings.
        let out_amount = raw
            .get("outAmount")
            .and_then(|v| v.as_str())
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| EngineError::Quote("missing outAmount".to_string()))?;
        let price_impact_pct = raw
            .get("priceImpactPct")
            .and_then(|v| v.as_str())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0);

        Ok(Quote {
            input_mint: input_mint.to_string(),
            output_mint: output_mint.to_string(),
            in_amount: amount,
            out_amount,
            price_impact_pct,
            raw,
        })
    }

    /// Build a signable transaction against the given quote.
    pub async fn build_swap(
        &self,
        quote: &Quote,
        user_public_key: &str,
    ) -> Result<SwapTransaction> {
        let body = json!({
            "quoteResponse": quote.raw,
            "userPublicKey": user_public_key,
            "wrapAndUnwrapSol": true,
        });

        let response: Value = self
            .client
            .post(format!("{}/swap", self.base_url))
            .timeout(Duration::from_secs(10))
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::SwapBuild(e.to_string()))?
            .error_for_status()
            .map_err(|e| EngineError::SwapBuild(e.to_string()))?
            .json()
            .await
            .map_err(|e| EngineError::SwapBuild(e.to_string()))?;

        let transaction = response
            .get("swapTransaction")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EngineError::SwapBuild("missing swapTransaction".to_string()))?
            .to_string();
        let last_valid_block_height = response
            .get("lastValidBlockHeight")
            .and_then(|v| v.as_u64());

        Ok(SwapTransaction {
            transaction,
            last_valid_block_height,
        })
    }
}

impl Default for AggregatorClient {
    fn default() -> Self {
        Self::new()
    }
}
