//! Ledger/broadcast layer: JSON-RPC submit, status, and height queries.

use crate::errors::{EngineError, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Status of a broadcast transaction as reported by the chain.
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureStatus {
    /// `processed`, `confirmed`, or `finalized`.
    pub confirmation_status: Option<String>,
    /// Present when the transaction failed on-chain.
    pub err: Option<Value>,
}

impl SignatureStatus {
    pub fn is_confirmed(&self) -> bool {
        self.err.is_none()
            && matches!(
                self.confirmation_status.as_deref(),
                Some("confirmed") | Some("finalized")
            )
    }
}

#[derive(Debug, Clone)]
pub struct BlockhashInfo {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

#[async_trait::async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a signed, base64-encoded transaction; returns the signature.
    async fn send_transaction(&self, tx_base64: &str) -> Result<String>;

    /// Status by signature; `None` while the chain has not seen it.
    async fn signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>>;

    async fn block_height(&self) -> Result<u64>;

    async fn latest_blockhash(&self) -> Result<BlockhashInfo>;
}

pub struct RpcLedgerClient {
    url: String,
    client: reqwest::Client,
    request_id: AtomicU64,
}

impl RpcLedgerClient {
    pub fn new() -> Self {
        Self::with_client(crate::config::get_rpc_url(), reqwest::Client::new())
    }

    pub fn with_client(url: String, client: reqwest::Client) -> Self {
        Self {
            url,
            client,
            request_id: AtomicU64::new(1),
        }
    }

    async fn execute_raw(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.request_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        let response: Value = self
            .client
            .post(&self.url)
            .timeout(Duration::from_secs(10))
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Broadcast(e.to_string()))?
            .error_for_status()
            .map_err(|e| EngineError::Broadcast(e.to_string()))?
            .json()
            .await
            .map_err(|e| EngineError::Broadcast(e.to_string()))?;

        if let Some(err) = response.get("error") {
            return Err(EngineError::Broadcast(format!("{}: {}", method, err)));
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| EngineError::Broadcast(format!("{}: missing result", method)))
    }
}

#[async_trait::async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn send_transaction(&self, tx_base64: &str) -> Result<String> {
        let params = json!([
            tx_base64,
            { "encoding": "base64", "skipPreflight": false, "maxRetries": 3 }
        ]);
        let result = self.execute_raw("sendTransaction", params).await?;
        result
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| EngineError::Broadcast("invalid signature response".to_string()))
    }

    async fn signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>> {
        let params = json!([[signature], { "searchTransactionHistory": false }]);
        let result = self.execute_raw("getSignatureStatuses", params).await?;

        let entry = result
            .get("value")
            .and_then(|v| v.as_array())
            .and_then(|v| v.first())
            .cloned()
            .unwrap_or(Value::Null);

        if entry.is_null() {
            return Ok(None);
        }

        let confirmation_status = entry
            .get("confirmationStatus")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let err = entry.get("err").filter(|v| !v.is_null()).cloned();

        Ok(Some(SignatureStatus {
            confirmation_status,
            err,
        }))
    }

    async fn block_height(&self) -> Result<u64> {
        let result = self.execute_raw("getBlockHeight", json!([])).await?;
        result
            .as_u64()
            .ok_or_else(|| EngineError::Broadcast("invalid block height".to_string()))
    }

    async fn latest_blockhash(&self) -> Result<BlockhashInfo> {
        let result = self.execute_raw("getLatestBlockhash", json!([])).await?;
        let value = result
            .get("value")
            .ok_or_else(|| EngineError::Broadcast("invalid blockhash response".to_string()))?;

        let blockhash = value
            .get("blockhash")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EngineError::Broadcast("missing blockhash".to_string()))?
            .to_string();
        let last_valid_block_height = value
            .get("lastValidBlockHeight")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| EngineError::Broadcast("missing lastValidBlockHeight".to_string()))?;

        Ok(BlockhashInfo {
            blockhash,
            last_valid_block_height,
        })
    }
}

impl Default for RpcLedgerClient {
    fn default() -> Self {
        Self::new()
    }
}
