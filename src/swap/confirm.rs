//! Confirmation-by-polling protocol.
//!
//! Push subscriptions are unreliable under the target network conditions,
//! so a broadcast is resolved by polling its signature status. The caller
//! must treat the three terminal states differently: confirmed, definitely
//! failed on-chain (including blockhash expiry), and ambiguous timeout.

use crate::errors::{EngineError, Result};
use crate::swap::ledger::LedgerClient;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ConfirmConfig {
    pub max_polls: u32,
    pub poll_interval: Duration,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            max_polls: 30,
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Poll until the transaction resolves. Returns the number of polls used.
///
/// Terminal outcomes, checked in order each round:
/// - status carries an error → `OnChainFailure`;
/// - status confirmed/finalized with no error → success;
/// - chain height past `last_valid_block_height` while unresolved →
///   `BlockhashExpired` (provably unconfirmable, no point retrying);
/// - retry budget exhausted → `ConfirmationTimeout` (funds may still have
///   been spent).
pub async fn confirm_transaction(
    ledger: &dyn LedgerClient,
    signature: &str,
    last_valid_block_height: u64,
    config: &ConfirmConfig,
) -> Result<u32> {
    for poll in 1..=config.max_polls {
        match ledger.signature_status(signature).await {
            Ok(Some(status)) => {
                if let Some(err) = &status.err {
                    return Err(EngineError::OnChainFailure {
                        signature: signature.to_string(),
                        cause: err.to_string(),
                    });
                }
                if status.is_confirmed() {
                    debug!(signature = %signature, polls = poll, "transaction confirmed");
                    return Ok(poll);
                }
            }
            Ok(None) => {}
            // Transient status-query failure; keep polling.
            Err(e) => {
                debug!(signature = %signature, error = %e, "status query failed, continuing");
            }
        }

        // Still unresolved: a height past the validity ceiling means the
        // broadcast can never land.
        if let Ok(height) = ledger.block_height().await {
            if height > last_valid_block_height {
                return Err(EngineError::BlockhashExpired {
                    signature: signature.to_string(),
                    height,
                    last_valid: last_valid_block_height,
                });
            }
        }

        if poll < config.max_polls {
            tokio::time::sleep(config.poll_interval).await;
        }
    }

    Err(EngineError::ConfirmationTimeout {
        signature: signature.to_string(),
        polls: config.max_polls,
    })
}
