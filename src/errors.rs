//! Error taxonomy for the execution engine

use thiserror::Error;

/// Errors produced while evaluating and executing strategies.
///
/// Upstream data problems (`MarketData`, `Quote`) are recovered locally as
/// "no opportunity this cycle" by the evaluator and never abort a cycle.
/// Execution errors are surfaced per strategy with the strategy state left
/// unchanged.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("market data unavailable: {0}")]
    MarketData(String),

    #[error("quote unavailable: {0}")]
    Quote(String),

    #[error("swap build failed: {0}")]
    SwapBuild(String),

    #[error("broadcast failed: {0}")]
    Broadcast(String),

    #[error("transaction {signature} failed on-chain: {cause}")]
    OnChainFailure { signature: String, cause: String },

    #[error("transaction {signature} expired: block height {height} past last valid {last_valid}")]
    BlockhashExpired {
        signature: String,
        height: u64,
        last_valid: u64,
    },

    /// Retry budget exhausted with the transaction still unresolved. This is
    /// NOT equivalent to failure: funds may have been spent and the caller
    /// must reconcile out of band.
    #[error("confirmation timed out for {signature} after {polls} polls")]
    ConfirmationTimeout { signature: String, polls: u32 },

    #[error("invalid strategy configuration: {0}")]
    Config(String),

    #[error("no wallet available for owner {0}")]
    MissingWallet(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::MarketData(err.to_string())
    }
}

impl From<tokio_postgres::Error> for EngineError {
    fn from(err: tokio_postgres::Error) -> Self {
        EngineError::Store(err.to_string())
    }
}

impl EngineError {
    /// Whether this error means the swap may still land on-chain.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, EngineError::ConfirmationTimeout { .. })
    }
}
