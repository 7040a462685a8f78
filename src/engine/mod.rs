//! Execution engine: the per-user evaluation cycle.
//!
//! Driven by an external periodic trigger (worker scheduler or the manual
//! refresh endpoint); owns no timers of its own and is re-entrant.

pub mod evaluator;

pub use evaluator::StrategyEvaluator;

use crate::db::store::StrategyStore;
use crate::errors::Result;
use crate::metrics::Metrics;
use crate::models::trade::{EvaluationOutcome, EvaluationStatus};
use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Trailing window during which a traded token is excluded from sniper
/// re-purchase.
pub const DEDUP_WINDOW_HOURS: i64 = 24;

pub struct ExecutionEngine {
    evaluator: StrategyEvaluator,
    store: Arc<dyn StrategyStore>,
    metrics: Option<Arc<Metrics>>,
}

impl ExecutionEngine {
    pub fn new(evaluator: StrategyEvaluator, store: Arc<dyn StrategyStore>) -> Self {
        Self {
            evaluator,
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Evaluate every active strategy of one user, sequentially.
    ///
    /// Sequential on purpose: tokens bought earlier in the cycle fold into
    /// the dedup set before later strategies run, so two sniper strategies
    /// cannot both buy the same brand-new token in one cycle.
    pub async fn evaluate_user(&self, owner_id: &str) -> Result<Vec<EvaluationOutcome>> {
        let strategies = self.store.active_strategies(owner_id).await?;
        if strategies.is_empty() {
            debug!(owner = %owner_id, "no active strategies, skipping cycle");
            return Ok(Vec::new());
        }

        if let Some(ref metrics) = self.metrics {
            metrics.cycles_total.inc();
        }

        let cutoff = Utc::now() - Duration::hours(DEDUP_WINDOW_HOURS);
        let recent_trades = self.store.trades_since(owner_id, cutoff).await?;
        let mut bought: HashSet<String> = recent_trades
            .iter()
            .map(|t| t.output_token.clone())
            .collect();

        let mut outcomes = Vec::with_capacity(strategies.len());
        for strategy in &strategies {
            let start = std::time::Instant::now();
            let outcome = self.evaluator.evaluate(strategy, &mut bought).await;

            if let Some(ref metrics) = self.metrics {
                metrics.evaluations_total.inc();
                metrics
                    .evaluation_duration_seconds
                    .observe(start.elapsed().as_secs_f64());
                match outcome.status {
                    EvaluationStatus::TradeExecuted => metrics.trades_executed_total.inc(),
                    EvaluationStatus::Error => metrics.evaluation_errors_total.inc(),
                    _ => {}
                }
            }

            outcomes.push(outcome);
        }

        info!(
            owner = %owner_id,
            strategies = strategies.len(),
            trades = outcomes
                .iter()
                .filter(|o| o.status == EvaluationStatus::TradeExecuted)
                .count(),
            "cycle complete"
        );

        Ok(outcomes)
    }
}
