//! Tradewind
//!
//! Strategy execution engine for user-defined trading strategies against
//! an on-chain swap market. Periodically evaluates each user's active
//! strategies over live market data, executes swaps through an external
//! aggregator, confirms them on chain, and records the results.

pub mod config;
pub mod core;
pub mod db;
pub mod engine;
pub mod errors;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod market;
pub mod metrics;
pub mod models;
pub mod swap;
