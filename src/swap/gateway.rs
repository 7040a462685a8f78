//! Concrete swap pipeline: quote → build → sign → broadcast → confirm.

use crate::errors::{EngineError, Result};
use crate::metrics::Metrics;
use crate::swap::aggregator::{AggregatorClient, Quote};
use crate::swap::confirm::{confirm_transaction, ConfirmConfig};
use crate::swap::ledger::LedgerClient;
use crate::swap::wallet::Wallet;
use crate::swap::{from_base_units, to_base_units, SwapReceipt, SwapRequest, SwapService};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;
use tracing::info;

pub struct SwapGateway {
    aggregator: AggregatorClient,
    ledger: Arc<dyn LedgerClient>,
    confirm: ConfirmConfig,
    metrics: Option<Arc<Metrics>>,
}

impl SwapGateway {
    pub fn new(aggregator: AggregatorClient, ledger: Arc<dyn LedgerClient>) -> Self {
        Self::with_confirm_config(aggregator, ledger, ConfirmConfig::default())
    }

    pub fn with_confirm_config(
        aggregator: AggregatorClient,
        ledger: Arc<dyn LedgerClient>,
        confirm: ConfirmConfig,
    ) -> Self {
        Self {
            aggregator,
            ledger,
            confirm,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[async_trait::async_trait]
impl SwapService for SwapGateway {
    async fn quote(&self, request: &SwapRequest) -> Result<Quote> {
        let amount = to_base_units(request.amount, request.input_decimals);
        self.aggregator
            .quote(
                &request.input_token,
                &request.output_token,
                amount,
                request.slippage_bps,
            )
            .await
    }

    async fn execute(&self, wallet: &Wallet, request: &SwapRequest) -> Result<SwapReceipt> {
        let quote = self.quote(request).await?;

        let swap_tx = self
            .aggregator
            .build_swap(&quote, wallet.public_key())
            .await?;

        let mut tx_bytes = BASE64
            .decode(&swap_tx.transaction)
            .map_err(|e| EngineError::SwapBuild(format!("invalid transaction payload: {}", e)))?;
        wallet.sign_transaction(&mut tx_bytes)?;
        let signed_base64 = BASE64.encode(&tx_bytes);

        let last_valid_block_height = match swap_tx.last_valid_block_height {
            Some(height) => height,
            None => self.ledger.latest_blockhash().await?.last_valid_block_height,
        };

        let signature = self.ledger.send_transaction(&signed_base64).await?;
        info!(
            signature = %signature,
            input = %request.input_token,
            output = %request.output_token,
            "transaction broadcast, awaiting confirmation"
        );

        let polls = confirm_transaction(
            self.ledger.as_ref(),
            &signature,
            last_valid_block_height,
            &self.confirm,
        )
        .await?;
        if let Some(ref metrics) = self.metrics {
            metrics.confirmation_polls.observe(polls as f64);
        }

        Ok(SwapReceipt {
            signature,
            input_amount: request.amount,
            output_amount: from_base_units(quote.out_amount, request.output_decimals),
            price_impact_pct: quote.price_impact_pct,
        })
    }
}
